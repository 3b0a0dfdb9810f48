//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring the betting ledger.
//!
//! # Metrics
//!
//! - `ledger_flips_total` - Total number of settled flips
//! - `ledger_flips_won_total` - Settled flips the user won
//! - `ledger_flips_rejected_total` - Flips rejected during validation
//! - `ledger_deposits_total` - Total number of deposits
//! - `ledger_wager_size_units` - Histogram of settled wager sizes
//! - `ledger_bank_balance_units` - Current balance per bank

use crate::types::{Address, Amount, FlipOutcome};
use prometheus::{Histogram, HistogramOpts, IntCounter, IntGaugeVec, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
///
/// Each ledger owns its own registry, so independent ledgers never collide
/// on metric names.
#[derive(Clone)]
pub struct Metrics {
    /// Total settled flips
    pub flips_total: IntCounter,

    /// Settled flips won by the user
    pub flips_won_total: IntCounter,

    /// Flips rejected during validation
    pub flips_rejected_total: IntCounter,

    /// Total deposits
    pub deposits_total: IntCounter,

    /// Settled wager sizes
    pub wager_size: Histogram,

    /// Balance per bank
    pub bank_balance: IntGaugeVec,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let flips_total = IntCounter::new("ledger_flips_total", "Total number of settled flips")?;
        registry.register(Box::new(flips_total.clone()))?;

        let flips_won_total = IntCounter::new(
            "ledger_flips_won_total",
            "Settled flips the user won",
        )?;
        registry.register(Box::new(flips_won_total.clone()))?;

        let flips_rejected_total = IntCounter::new(
            "ledger_flips_rejected_total",
            "Flips rejected during validation",
        )?;
        registry.register(Box::new(flips_rejected_total.clone()))?;

        let deposits_total = IntCounter::new("ledger_deposits_total", "Total number of deposits")?;
        registry.register(Box::new(deposits_total.clone()))?;

        let wager_size = Histogram::with_opts(
            HistogramOpts::new("ledger_wager_size_units", "Histogram of settled wager sizes")
                .buckets(vec![
                    1e2, 1e3, 1e4, 1e5, 1e6, 1e9, 1e12, 1e15, 1e17,
                ]),
        )?;
        registry.register(Box::new(wager_size.clone()))?;

        let bank_balance = IntGaugeVec::new(
            Opts::new("ledger_bank_balance_units", "Current balance per bank"),
            &["bank"],
        )?;
        registry.register(Box::new(bank_balance.clone()))?;

        Ok(Self {
            flips_total,
            flips_won_total,
            flips_rejected_total,
            deposits_total,
            wager_size,
            bank_balance,
            registry,
        })
    }

    /// Record a settled flip
    pub fn record_flip(&self, outcome: FlipOutcome, wager: Amount) {
        self.flips_total.inc();
        if outcome.is_win() {
            self.flips_won_total.inc();
        }
        self.wager_size.observe(wager as f64);
    }

    /// Record a rejected flip
    pub fn record_flip_rejected(&self) {
        self.flips_rejected_total.inc();
    }

    /// Record a deposit
    pub fn record_deposit(&self) {
        self.deposits_total.inc();
    }

    /// Update a bank's balance gauge
    ///
    /// Gauges are i64; balances beyond that saturate at `i64::MAX`.
    pub fn set_bank_balance(&self, bank: &Address, balance: Amount) {
        let clamped = balance.min(i64::MAX as Amount) as i64;
        self.bank_balance.with_label_values(&[bank.as_str()]).set(clamped);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
