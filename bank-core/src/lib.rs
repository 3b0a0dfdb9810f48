//! FlipHouse Bank Core
//!
//! Betting ledger for immediately-resolved coin-flip wagers against a set of
//! bank accounts.
//!
//! # Architecture
//!
//! - **Per-bank serialization**: Each mutating operation holds its bank's
//!   store entry exclusively, so validation and settlement are one
//!   indivisible unit; distinct banks are mutated in parallel
//! - **Pluggable randomness**: Outcomes are drawn through the [`CoinSource`]
//!   seam; the OS RNG by default, seeded sources for tests
//! - **Append-only settlement log**: Every settled flip leaves an immutable
//!   [`FlipRecord`]
//!
//! # Invariants
//!
//! - Balances never go negative: a wager is capped at half the bank's
//!   pre-flip balance (floored) and at half a whole coin, absolutely
//! - Settlement moves balance and per-user history by exactly the wager, in
//!   opposite directions
//! - History is a faithful ledger of flip-attributable balance deltas:
//!   rejected operations leave no partial effect

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod bank;
pub mod coin;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod types;

// Re-exports
pub use coin::{CoinSource, FixedCoin, OsCoin, SeededCoin};
pub use config::{BankConfig, Config};
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use types::{Address, Amount, BankOption, FlipOutcome, FlipRecord, Net, COIN, WAGER_CAP};
