//! Main ledger orchestration layer
//!
//! The [`Ledger`] owns the bank store and exposes the full operation
//! surface: roster queries, balance/history/last-outcome lookups, deposits,
//! and flip resolution.
//!
//! # Concurrency
//!
//! Banks live in a [`DashMap`]; a mutating operation holds the bank's map
//! entry exclusively for its whole validate-and-settle critical section, so
//! two flips against the same bank never interleave, while distinct banks
//! are mutated in parallel with no shared lock. Queries observe only
//! committed state.
//!
//! # Example
//!
//! ```
//! use bank_core::{Config, Ledger};
//!
//! fn main() -> bank_core::Result<()> {
//!     let ledger = Ledger::open(Config::default())?;
//!     let bank = ledger.bank_list()[0].clone();
//!     let balance = ledger.balance(&bank)?;
//!     assert_eq!(balance, 50_000);
//!     Ok(())
//! }
//! ```

use crate::bank::{check_wager_shape, Bank};
use crate::coin::{CoinSource, OsCoin};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::types::{Address, Amount, BankOption, FlipOutcome, FlipRecord, Net};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;

/// Main ledger interface
pub struct Ledger {
    /// Bank store, keyed by address
    banks: DashMap<Address, Bank>,

    /// Bank addresses in creation order
    roster: RwLock<Vec<Address>>,

    /// Coin toss source for flip resolution
    coin: Box<dyn CoinSource>,

    /// Metrics collector
    metrics: Metrics,
}

impl Ledger {
    /// Open a ledger, creating every configured bank with its initial deposit
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let metrics = Metrics::new()?;
        let banks = DashMap::new();
        let mut roster = Vec::with_capacity(config.banks.len());

        for entry in &config.banks {
            let address = Address::new(entry.address.clone());
            let bank = Bank::new(address.clone(), entry.name.clone(), entry.initial_deposit);
            metrics.set_bank_balance(&address, bank.balance());
            banks.insert(address.clone(), bank);
            roster.push(address);
        }

        tracing::info!(banks = roster.len(), "Opened betting ledger");

        Ok(Self {
            banks,
            roster: RwLock::new(roster),
            coin: Box::new(OsCoin),
            metrics,
        })
    }

    /// Override the coin toss source
    pub fn with_coin(mut self, coin: impl CoinSource + 'static) -> Self {
        self.coin = Box::new(coin);
        self
    }

    /// Every known bank address, in creation order
    pub fn bank_list(&self) -> Vec<Address> {
        self.roster.read().clone()
    }

    /// `{address, name}` pairs for the external selection UI, in creation order
    pub fn bank_options(&self) -> Vec<BankOption> {
        self.roster
            .read()
            .iter()
            .filter_map(|address| {
                self.banks.get(address).map(|bank| BankOption {
                    address: address.clone(),
                    name: bank.name().to_string(),
                })
            })
            .collect()
    }

    /// Current balance of a bank
    pub fn balance(&self, bank: &Address) -> Result<Amount> {
        self.banks
            .get(bank)
            .map(|b| b.balance())
            .ok_or_else(|| Error::NotFound(bank.to_string()))
    }

    /// Running net result of a user's flips against the founding bank
    ///
    /// Users who never flipped are 0, never an error.
    pub fn history(&self, user: &Address) -> Net {
        match self.founding() {
            Some(bank) => self
                .banks
                .get(&bank)
                .map(|b| b.history_for(user))
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Running net result of a user's flips against a specific bank
    pub fn history_at(&self, bank: &Address, user: &Address) -> Result<Net> {
        self.banks
            .get(bank)
            .map(|b| b.history_for(user))
            .ok_or_else(|| Error::NotFound(bank.to_string()))
    }

    /// Whether the user's most recent flip against the founding bank was a win
    ///
    /// `false` for users who never flipped.
    pub fn last_outcome(&self, user: &Address) -> bool {
        match self.founding() {
            Some(bank) => self
                .banks
                .get(&bank)
                .map(|b| b.last_outcome_for(user))
                .unwrap_or(false),
            None => false,
        }
    }

    /// Whether the user's most recent flip against a specific bank was a win
    pub fn last_outcome_at(&self, bank: &Address, user: &Address) -> Result<bool> {
        self.banks
            .get(bank)
            .map(|b| b.last_outcome_for(user))
            .ok_or_else(|| Error::NotFound(bank.to_string()))
    }

    /// Settled flips against a bank, in settlement order
    pub fn flips(&self, bank: &Address) -> Result<Vec<FlipRecord>> {
        self.banks
            .get(bank)
            .map(|b| b.flips().to_vec())
            .ok_or_else(|| Error::NotFound(bank.to_string()))
    }

    /// Add funds to a bank
    pub fn deposit(&self, bank: &Address, amount: Amount) -> Result<()> {
        let mut entry = self
            .banks
            .get_mut(bank)
            .ok_or_else(|| Error::NotFound(bank.to_string()))?;

        entry.deposit(amount)?;

        self.metrics.record_deposit();
        self.metrics.set_bank_balance(bank, entry.balance());
        tracing::debug!(bank = %bank, amount = %amount, "Deposit applied");
        Ok(())
    }

    /// Place a wager against a bank and settle it immediately
    ///
    /// Validation order, each failure a distinct error and a full no-op:
    /// a wager must be positive (`InvalidWager`), under the absolute cap
    /// (`WagerTooLarge`), against a known bank (`NotFound`), and at most
    /// half the bank's pre-flip balance (`WagerExceedsBankLimit`). On
    /// success a fair coin decides the outcome and settlement commits
    /// balance, history, last-outcome and the flip record as one unit.
    pub fn flip(&self, bank: &Address, user: &Address, wager: Amount) -> Result<FlipOutcome> {
        // Wager-shape checks precede the bank lookup; the balance-dependent
        // limit cannot be evaluated until the bank is held.
        if let Err(e) = check_wager_shape(wager) {
            self.metrics.record_flip_rejected();
            return Err(e);
        }

        let mut entry = match self.banks.get_mut(bank) {
            Some(entry) => entry,
            None => {
                self.metrics.record_flip_rejected();
                return Err(Error::NotFound(bank.to_string()));
            }
        };

        if let Err(e) = entry.check_wager(wager) {
            self.metrics.record_flip_rejected();
            return Err(e);
        }

        let won = self.coin.toss();
        let record = entry.settle_flip(user, wager, won)?;

        self.metrics.record_flip(record.outcome, wager);
        self.metrics.set_bank_balance(bank, entry.balance());
        tracing::debug!(
            bank = %bank,
            user = %user,
            wager = %wager,
            outcome = %record.outcome,
            "Flip settled"
        );
        Ok(record.outcome)
    }

    /// Get metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The founding bank: the first bank created at open
    fn founding(&self) -> Option<Address> {
        self.roster.read().first().cloned()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("banks", &self.banks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::{FixedCoin, SeededCoin};
    use crate::config::BankConfig;
    use crate::types::WAGER_CAP;

    fn single_bank_config(initial_deposit: Amount) -> Config {
        Config {
            banks: vec![BankConfig {
                address: "bank-1".to_string(),
                name: "Test Bank".to_string(),
                initial_deposit,
            }],
            ..Config::default()
        }
    }

    fn bank() -> Address {
        Address::new("bank-1")
    }

    fn user() -> Address {
        Address::new("user-1")
    }

    #[test]
    fn test_open_creates_banks_with_initial_deposit() {
        let ledger = Ledger::open(single_bank_config(50_000)).unwrap();

        assert_eq!(ledger.bank_list(), vec![bank()]);
        assert_eq!(ledger.balance(&bank()).unwrap(), 50_000);
        assert_eq!(ledger.history(&user()), 0);
        assert!(!ledger.last_outcome(&user()));
    }

    #[test]
    fn test_open_rejects_empty_roster() {
        let config = Config {
            banks: vec![],
            ..Config::default()
        };
        assert!(matches!(Ledger::open(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_bank_list_preserves_creation_order() {
        let config = Config {
            banks: vec![
                BankConfig {
                    address: "bank-c".to_string(),
                    name: "Bank C".to_string(),
                    initial_deposit: 1_000,
                },
                BankConfig {
                    address: "bank-a".to_string(),
                    name: "Bank A".to_string(),
                    initial_deposit: 2_000,
                },
                BankConfig {
                    address: "bank-b".to_string(),
                    name: "Bank B".to_string(),
                    initial_deposit: 3_000,
                },
            ],
            ..Config::default()
        };
        let ledger = Ledger::open(config).unwrap();

        let list: Vec<String> = ledger.bank_list().iter().map(Address::to_string).collect();
        assert_eq!(list, vec!["bank-c", "bank-a", "bank-b"]);

        let options = ledger.bank_options();
        assert_eq!(options[0].name, "Bank C");
        assert_eq!(options[2].address, Address::new("bank-b"));
    }

    #[test]
    fn test_balance_unknown_bank() {
        let ledger = Ledger::open(single_bank_config(50_000)).unwrap();
        assert!(matches!(
            ledger.balance(&Address::new("nobody")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_flip_win_settlement() {
        let ledger = Ledger::open(single_bank_config(50_000))
            .unwrap()
            .with_coin(FixedCoin::new(true));

        let outcome = ledger.flip(&bank(), &user(), 5_000).unwrap();
        assert_eq!(outcome, FlipOutcome::Win);
        assert_eq!(ledger.balance(&bank()).unwrap(), 45_000);
        assert_eq!(ledger.history(&user()), 5_000);
        assert!(ledger.last_outcome(&user()));
    }

    #[test]
    fn test_flip_loss_settlement() {
        let ledger = Ledger::open(single_bank_config(50_000))
            .unwrap()
            .with_coin(FixedCoin::new(false));

        let outcome = ledger.flip(&bank(), &user(), 5_000).unwrap();
        assert_eq!(outcome, FlipOutcome::Loss);
        assert_eq!(ledger.balance(&bank()).unwrap(), 55_000);
        assert_eq!(ledger.history(&user()), -5_000);
        assert!(!ledger.last_outcome(&user()));
    }

    #[test]
    fn test_flip_validation_precedes_bank_lookup() {
        let ledger = Ledger::open(single_bank_config(50_000)).unwrap();
        let nobody = Address::new("nobody");

        // Wager-shape failures fire even for unknown banks
        assert!(matches!(
            ledger.flip(&nobody, &user(), 0),
            Err(Error::InvalidWager)
        ));
        assert!(matches!(
            ledger.flip(&nobody, &user(), WAGER_CAP),
            Err(Error::WagerTooLarge { .. })
        ));
        // A well-formed wager against an unknown bank is NotFound
        assert!(matches!(
            ledger.flip(&nobody, &user(), 100),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_rejected_flip_leaves_state_unchanged() {
        let ledger = Ledger::open(single_bank_config(50_000))
            .unwrap()
            .with_coin(FixedCoin::new(true));

        ledger.flip(&bank(), &user(), 1_000).unwrap();
        let err = ledger.flip(&bank(), &user(), 30_000).unwrap_err();
        assert!(matches!(err, Error::WagerExceedsBankLimit { .. }));

        assert_eq!(ledger.balance(&bank()).unwrap(), 49_000);
        assert_eq!(ledger.history(&user()), 1_000);
        assert!(ledger.last_outcome(&user()));
        assert_eq!(ledger.flips(&bank()).unwrap().len(), 1);
    }

    #[test]
    fn test_flip_records_accumulate() {
        let ledger = Ledger::open(single_bank_config(100_000))
            .unwrap()
            .with_coin(SeededCoin::new(11));

        for _ in 0..10 {
            ledger.flip(&bank(), &user(), 1_000).unwrap();
        }

        let records = ledger.flips(&bank()).unwrap();
        assert_eq!(records.len(), 10);
        let recorded: Net = records.iter().map(FlipRecord::signed_amount).sum();
        assert_eq!(ledger.history(&user()), recorded);
    }

    #[test]
    fn test_deposit_and_metrics() {
        let ledger = Ledger::open(single_bank_config(50_000)).unwrap();

        ledger.deposit(&bank(), 5_000).unwrap();
        assert_eq!(ledger.balance(&bank()).unwrap(), 55_000);
        assert_eq!(ledger.metrics().deposits_total.get(), 1);

        assert!(matches!(
            ledger.deposit(&bank(), 0),
            Err(Error::InvalidDeposit)
        ));
        assert!(matches!(
            ledger.deposit(&Address::new("nobody"), 5_000),
            Err(Error::NotFound(_))
        ));
        assert_eq!(ledger.balance(&bank()).unwrap(), 55_000);
    }

    #[test]
    fn test_deposit_touches_neither_history_nor_last_outcome() {
        let ledger = Ledger::open(single_bank_config(50_000))
            .unwrap()
            .with_coin(FixedCoin::new(true));

        ledger.flip(&bank(), &user(), 2_000).unwrap();
        ledger.deposit(&bank(), 10_000).unwrap();

        assert_eq!(ledger.history(&user()), 2_000);
        assert!(ledger.last_outcome(&user()));
    }

    #[test]
    fn test_history_at_and_last_outcome_at() {
        let config = Config {
            banks: vec![
                BankConfig {
                    address: "bank-1".to_string(),
                    name: "Bank 1".to_string(),
                    initial_deposit: 50_000,
                },
                BankConfig {
                    address: "bank-2".to_string(),
                    name: "Bank 2".to_string(),
                    initial_deposit: 50_000,
                },
            ],
            ..Config::default()
        };
        let ledger = Ledger::open(config).unwrap().with_coin(FixedCoin::new(false));
        let other = Address::new("bank-2");

        ledger.flip(&other, &user(), 4_000).unwrap();

        // The single-bank forms answer for the founding bank only
        assert_eq!(ledger.history(&user()), 0);
        assert_eq!(ledger.history_at(&other, &user()).unwrap(), -4_000);
        assert!(!ledger.last_outcome_at(&other, &user()).unwrap());
        assert!(matches!(
            ledger.history_at(&Address::new("nobody"), &user()),
            Err(Error::NotFound(_))
        ));
    }
}
