//! Suggested rebalancing trades.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset_class::AssetClass;

/// Trade direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Side that closes a money gap: positive delta means the class is
    /// underweight and must be bought.
    pub fn for_delta(delta: f64) -> Self {
        if delta > 0.0 {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        }
    }

    /// +1 for buys, -1 for sells.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            TradeSide::Buy => 1.0,
            TradeSide::Sell => -1.0,
        }
    }

    /// Human-readable reason for moving `class` in this direction.
    pub fn reason(self, class: AssetClass) -> String {
        match self {
            TradeSide::Buy => format!("replenish {class} allocation"),
            TradeSide::Sell => format!("reduce {class} allocation"),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        })
    }
}

/// A single suggested buy or sell.
///
/// `holding_id` is the join key back to the holding. Trades without one are
/// either class-level aggregates (the class had no holding to trade) or
/// records persisted before ids were carried; those fall back to matching on
/// `asset_name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(rename = "type")]
    pub side: TradeSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<AssetClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding_id: Option<String>,
    pub asset_name: String,
    /// Money amount, always positive.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Profit percent of the holding being sold. Sell trades only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_profit: Option<f64>,
}

impl Trade {
    /// Amount signed by direction: buys positive, sells negative.
    pub fn signed_amount(&self) -> f64 {
        self.side.sign() * self.amount
    }

    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == TradeSide::Sell
    }
}

/// Sum of trade amounts on one side.
pub fn total_amount(trades: &[Trade], side: TradeSide) -> f64 {
    trades
        .iter()
        .filter(|t| t.side == side)
        .map(|t| t.amount)
        .sum()
}
