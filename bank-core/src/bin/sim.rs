//! Seeded flip-session simulator
//!
//! Opens a ledger from the environment, plays a short wagering session
//! against the founding bank with a deterministic coin, and dumps the
//! settled-flip log as JSON. No network surface; this is a smoke harness
//! for the library.

use anyhow::Context;
use bank_core::{Address, Config, Ledger, SeededCoin, WAGER_CAP};

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let seed = env_u64("SIM_SEED", 7);
    let rounds = env_u64("SIM_ROUNDS", 20);

    let config = Config::from_env()?;
    let ledger = Ledger::open(config)?.with_coin(SeededCoin::new(seed));

    let bank = ledger
        .bank_list()
        .into_iter()
        .next()
        .context("no banks configured")?;
    let player = Address::new("player-1");

    tracing::info!(bank = %bank, seed, rounds, "Starting flip session");

    for round in 0..rounds {
        let balance = ledger.balance(&bank)?;
        let wager = (balance / 4).min(WAGER_CAP - 1);
        if wager == 0 {
            tracing::warn!(round, "Bank can no longer cover a wager, stopping");
            break;
        }

        match ledger.flip(&bank, &player, wager) {
            Ok(outcome) => {
                tracing::info!(round, wager = %wager, outcome = %outcome, "Flip settled")
            }
            Err(e) => tracing::warn!(round, wager = %wager, error = %e, "Flip rejected"),
        }
    }

    tracing::info!(
        balance = %ledger.balance(&bank)?,
        history = %ledger.history(&player),
        last_win = ledger.last_outcome(&player),
        "Session complete"
    );

    println!("{}", serde_json::to_string_pretty(&ledger.flips(&bank)?)?);
    Ok(())
}
