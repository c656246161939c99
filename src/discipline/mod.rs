//! Trading-discipline checks over a rebalance.
//!
//! Stateless: each trade is joined to its holding and evaluated against a
//! fixed set of behavioral rules. Advisory warnings are kept apart from
//! blocking ones so callers can gate execution on `passed`.

pub mod checks;
pub mod report;

pub use checks::{check_all, check_trade};
pub use report::{DisciplineCheckResult, DisciplineRule, DisciplineWarning, WarningLevel};
