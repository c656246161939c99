//! Persisted rebalance records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trade::{Trade, TradeSide, total_amount};

/// One confirmed rebalance.
///
/// Immutable once created; the ledger only ever removes whole records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceHistoryRecord {
    /// Millisecond epoch at creation, as a string.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub strategy_id: String,
    pub strategy_name: String,
    pub trades: Vec<Trade>,
    /// Overall deviation before the trades, in percentage points.
    pub pre_deviation: f64,
    /// Projected overall deviation after the trades.
    pub post_deviation: f64,
    pub total_buy_amount: f64,
    pub total_sell_amount: f64,
}

impl RebalanceHistoryRecord {
    pub fn new(
        id: String,
        timestamp: DateTime<Utc>,
        strategy_id: impl Into<String>,
        strategy_name: impl Into<String>,
        trades: Vec<Trade>,
        pre_deviation: f64,
        post_deviation: f64,
    ) -> Self {
        Self {
            id,
            timestamp,
            strategy_id: strategy_id.into(),
            strategy_name: strategy_name.into(),
            total_buy_amount: total_amount(&trades, TradeSide::Buy),
            total_sell_amount: total_amount(&trades, TradeSide::Sell),
            trades,
            pre_deviation,
            post_deviation,
        }
    }

    /// Deviation removed by this rebalance; negative if it made things worse.
    pub fn deviation_saved(&self) -> f64 {
        self.pre_deviation - self.post_deviation
    }
}

/// Aggregate over the whole ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceHistorySummary {
    pub total_count: usize,
    pub total_deviation_saved: f64,
}
