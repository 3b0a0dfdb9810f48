//! Core types for the betting ledger
//!
//! All amounts are integers in the smallest currency unit so that the
//! half-balance and absolute-cap comparisons never pass through floating
//! point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Amount in the smallest currency unit (non-negative by construction)
pub type Amount = u128;

/// Signed running net result of a user's flips
pub type Net = i128;

/// Base units per whole coin
pub const COIN: Amount = 1_000_000_000_000_000_000;

/// Absolute wager cap: half a whole coin, independent of any bank's balance
pub const WAGER_CAP: Amount = COIN / 2;

/// Bank or user identifier (public key, account number, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create new address
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a settled flip, from the user's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    /// The user won; the bank paid out the wager
    Win,
    /// The user lost; the bank kept the wager
    Loss,
}

impl FlipOutcome {
    /// Build from a coin toss (`true` = user wins)
    pub fn from_win(won: bool) -> Self {
        if won {
            FlipOutcome::Win
        } else {
            FlipOutcome::Loss
        }
    }

    /// Whether the user won
    pub fn is_win(&self) -> bool {
        matches!(self, FlipOutcome::Win)
    }
}

impl fmt::Display for FlipOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlipOutcome::Win => write!(f, "win"),
            FlipOutcome::Loss => write!(f, "loss"),
        }
    }
}

/// Immutable record of one settled flip
///
/// Appended to the bank on every successful flip; rejected flips leave no
/// record. The running per-user history always equals the signed sum of
/// these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipRecord {
    /// Unique flip ID (UUIDv7 for time-ordering)
    pub flip_id: Uuid,

    /// User who placed the wager
    pub user: Address,

    /// Wager amount
    pub wager: Amount,

    /// Settled outcome
    pub outcome: FlipOutcome,

    /// Settlement timestamp
    pub settled_at: DateTime<Utc>,
}

impl FlipRecord {
    /// Signed effect of this flip on the user's history
    pub fn signed_amount(&self) -> Net {
        let wager = self.wager as Net;
        match self.outcome {
            FlipOutcome::Win => wager,
            FlipOutcome::Loss => -wager,
        }
    }
}

/// Named bank entry for the external selection UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankOption {
    /// Bank address
    pub address: Address,
    /// Human-readable bank name
    pub name: String,
}
