//! # smartfolio
//!
//! A portfolio rebalancing engine for a four-class asset allocation
//! (stock, bond, gold, cash).
//!
//! Given current holdings and a target strategy it computes per-class
//! deviation, generates buy/sell trades that move the portfolio back to
//! target, checks those trades against trading-discipline rules and keeps a
//! persisted history of confirmed rebalances.
//!
//! ## Features
//!
//! - **Deviation**: current vs target percent per class, banded low/medium/high
//! - **Trades**: class gaps spread across holdings, with a 1% materiality floor
//! - **Discipline**: chasing-high, profit-take, gold and right-side rules
//! - **History**: newest-first ledger behind a pluggable store (JSON file or memory)
//! - **Config**: TOML file for history location and custom strategies
//!
//! ## Quick Start
//!
//! ```
//! use smartfolio::{AssetClass, ConfirmOptions, Holding, MemoryStore, Rebalancer, preset};
//!
//! let holdings = vec![
//!     Holding::new("1", "Global Tech ETF", "TECH", 6_000.0, AssetClass::Stock),
//!     Holding::new("2", "Treasury Fund", "TLT", 2_000.0, AssetClass::Bond),
//!     Holding::new("3", "Gold ETF", "GLD", 1_000.0, AssetClass::Gold),
//!     Holding::new("4", "Money Market", "MM", 1_000.0, AssetClass::Cash),
//! ];
//! let strategy = preset("harry-browne").unwrap();
//!
//! let mut rebalancer = Rebalancer::open(MemoryStore::new());
//! let plan = rebalancer.plan(&holdings, &strategy).unwrap();
//!
//! // Stock is 60% against a 25% target: sell 3 500, buy the rest back up.
//! assert_eq!(plan.deviation.get(AssetClass::Stock).deviation, 35.0);
//! assert_eq!(plan.summary.total_sell_amount, 3_500.0);
//! assert_eq!(plan.summary.total_buy_amount, 3_500.0);
//! assert!(plan.discipline.passed);
//!
//! let record = rebalancer.confirm(&plan, ConfirmOptions::default()).unwrap();
//! assert_eq!(record.pre_deviation, 35.0);
//! assert_eq!(rebalancer.ledger().summarize().total_count, 1);
//! ```
//!
//! ## Deviation bands
//!
//! | Level | Per class | Whole portfolio (max) |
//! |-------|-----------|-----------------------|
//! | **low** | \|d\| ≤ 5 | ≤ 10 |
//! | **medium** | ≤ 15 | ≤ 20 |
//! | **high** | > 15 | > 20 |
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod asset_class;
pub mod config;
pub mod deviation;
pub mod diff;
pub mod discipline;
pub mod engine;
pub mod error;
pub mod history;
pub mod holding;
pub mod strategy;
pub mod trade;

// Re-export public API
pub use asset_class::{AssetClass, ClassAllocation};
pub use config::Config;
pub use deviation::{
    Deviation, DeviationReport, Severity, compute_allocation, compute_deviations,
    compute_ratios, overall_deviation,
};
pub use diff::{RebalanceSummary, generate_trades, project_allocation, summarize_trades};
pub use discipline::{
    DisciplineCheckResult, DisciplineRule, DisciplineWarning, WarningLevel, check_all, check_trade,
};
pub use engine::{ConfirmOptions, RebalancePlan, Rebalancer, plan};
pub use error::{Error, Result, ValidationError};
pub use history::{
    HistoryStore, JsonFileStore, MemoryStore, RebalanceHistoryRecord, RebalanceHistorySummary,
    RebalanceLedger,
};
pub use holding::{Holding, recompute_ratios, total_value};
pub use strategy::{Strategy, preset, presets};
pub use trade::{Trade, TradeSide};
