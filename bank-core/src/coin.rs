//! Coin toss sources
//!
//! Randomness enters the ledger only through [`CoinSource`]; settlement is
//! deterministic given the toss. The contract is a fair coin: `toss` must
//! return `true` with probability 1/2 and must not be predictable by
//! callers, so they cannot bias outcomes.

use parking_lot::Mutex;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

/// Fair coin toss provider (`true` = the user wins)
pub trait CoinSource: Send + Sync {
    /// Draw one uniform boolean
    fn toss(&self) -> bool;
}

/// Default coin: draws from the operating-system RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsCoin;

impl CoinSource for OsCoin {
    fn toss(&self) -> bool {
        let mut rng = OsRng;
        rng.gen_bool(0.5)
    }
}

/// Deterministic coin for tests and simulations
///
/// Same seed, same toss sequence. Still statistically fair, but predictable
/// by anyone holding the seed, so never the default.
#[derive(Debug)]
pub struct SeededCoin {
    rng: Mutex<StdRng>,
}

impl SeededCoin {
    /// Create from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl CoinSource for SeededCoin {
    fn toss(&self) -> bool {
        self.rng.lock().gen_bool(0.5)
    }
}

/// Coin pinned to one outcome, for exercising settlement paths in tests
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin {
    won: bool,
}

impl FixedCoin {
    /// Coin that always resolves to the given outcome
    pub fn new(won: bool) -> Self {
        Self { won }
    }
}

impl CoinSource for FixedCoin {
    fn toss(&self) -> bool {
        self.won
    }
}
