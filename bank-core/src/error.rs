//! Error types for the betting ledger

use crate::types::Amount;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every wager and deposit error is a rejected operation: the ledger state
/// is guaranteed unchanged and the caller may re-issue the call.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown bank address
    #[error("Bank not found: {0}")]
    NotFound(String),

    /// Wager of zero (a bet must stake something)
    #[error("Invalid wager: zero is not a valid bet")]
    InvalidWager,

    /// Wager at or above the absolute cap
    #[error("Wager {wager} is at or above the absolute cap of {cap}")]
    WagerTooLarge {
        /// Rejected wager
        wager: Amount,
        /// Absolute cap
        cap: Amount,
    },

    /// Wager above half of the bank's balance
    #[error("Wager {wager} exceeds the bank limit of {limit}")]
    WagerExceedsBankLimit {
        /// Rejected wager
        wager: Amount,
        /// Half of the bank's balance, floored
        limit: Amount,
    },

    /// Deposit of zero
    #[error("Invalid deposit: amount must be positive")]
    InvalidDeposit,

    /// Arithmetic overflow on an amount
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Metrics(err.to_string())
    }
}
