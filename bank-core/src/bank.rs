//! Per-bank account state
//!
//! A [`Bank`] is one account: a balance, a per-user running history, a
//! per-user last-outcome flag, and the append-only record of settled flips.
//! All mutation goes through [`Bank::deposit`] and [`Bank::settle_flip`];
//! validation never leaves partial effects.
//!
//! # Invariants
//!
//! - `balance >= 0` at all times (unsigned by construction)
//! - A wager is accepted iff `0 < wager <= floor(balance / 2)` and
//!   `wager < WAGER_CAP`, against the balance as it stood before the flip
//! - Every settled flip moves `balance` and `history[user]` by exactly the
//!   wager, in opposite directions
//! - `history[user]` equals the signed sum of the user's flip records

use crate::error::{Error, Result};
use crate::types::{Address, Amount, FlipOutcome, FlipRecord, Net, WAGER_CAP};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Reject wagers that are malformed regardless of any bank's balance
///
/// Covers the first two validation steps: a wager must stake something and
/// must stay under the absolute cap. The balance-dependent limit is checked
/// by the bank itself.
pub fn check_wager_shape(wager: Amount) -> Result<()> {
    if wager == 0 {
        return Err(Error::InvalidWager);
    }
    if wager >= WAGER_CAP {
        return Err(Error::WagerTooLarge {
            wager,
            cap: WAGER_CAP,
        });
    }
    Ok(())
}

/// One bank account holding a balance against which wagers are placed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    address: Address,
    name: String,
    balance: Amount,
    history: HashMap<Address, Net>,
    last_flip: HashMap<Address, bool>,
    flips: Vec<FlipRecord>,
}

impl Bank {
    /// Create a bank with its initial deposit
    pub fn new(address: Address, name: impl Into<String>, initial_deposit: Amount) -> Self {
        Self {
            address,
            name: name.into(),
            balance: initial_deposit,
            history: HashMap::new(),
            last_flip: HashMap::new(),
            flips: Vec::new(),
        }
    }

    /// Bank address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Largest wager this bank currently accepts: half the balance, floored
    ///
    /// Odd balances round down, in the bank's favor.
    pub fn wager_limit(&self) -> Amount {
        self.balance / 2
    }

    /// Running net result for a user (0 for users who never flipped)
    pub fn history_for(&self, user: &Address) -> Net {
        self.history.get(user).copied().unwrap_or(0)
    }

    /// Whether the user's most recent flip was a win (`false` before any flip)
    pub fn last_outcome_for(&self, user: &Address) -> bool {
        self.last_flip.get(user).copied().unwrap_or(false)
    }

    /// Settled flips against this bank, in settlement order
    pub fn flips(&self) -> &[FlipRecord] {
        &self.flips
    }

    /// Validate a wager against this bank without settling it
    pub fn check_wager(&self, wager: Amount) -> Result<()> {
        check_wager_shape(wager)?;
        let limit = self.wager_limit();
        if wager > limit {
            return Err(Error::WagerExceedsBankLimit { wager, limit });
        }
        Ok(())
    }

    /// Add funds to the bank
    ///
    /// Purely additive: repeated deposits accumulate, and neither history
    /// nor last-outcome is touched.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(Error::InvalidDeposit);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::AmountOverflow(format!("deposit of {} to {}", amount, self.address)))?;
        Ok(())
    }

    /// Validate and settle one flip as an indivisible unit
    ///
    /// On a win the bank pays the wager out; on a loss the caller's escrowed
    /// wager stays with the bank (the balance update is the net of escrow
    /// plus settlement). Any rejection leaves balance, history, last-outcome
    /// and the flip log untouched.
    pub fn settle_flip(&mut self, user: &Address, wager: Amount, won: bool) -> Result<FlipRecord> {
        self.check_wager(wager)?;

        // Compute every new value before committing any of them
        let delta = wager as Net;
        let prior = self.history_for(user);
        let (new_balance, new_history) = if won {
            let balance = self.balance - wager; // wager <= balance / 2
            let history = prior
                .checked_add(delta)
                .ok_or_else(|| Error::AmountOverflow(format!("history of {}", user)))?;
            (balance, history)
        } else {
            let balance = self
                .balance
                .checked_add(wager)
                .ok_or_else(|| Error::AmountOverflow(format!("balance of {}", self.address)))?;
            let history = prior
                .checked_sub(delta)
                .ok_or_else(|| Error::AmountOverflow(format!("history of {}", user)))?;
            (balance, history)
        };

        self.balance = new_balance;
        self.history.insert(user.clone(), new_history);
        self.last_flip.insert(user.clone(), won);

        let record = FlipRecord {
            flip_id: Uuid::now_v7(),
            user: user.clone(),
            wager,
            outcome: FlipOutcome::from_win(won),
            settled_at: Utc::now(),
        };
        self.flips.push(record.clone());
        Ok(record)
    }
}
