//! CURRENT→TARGET diff engine.
//!
//! Computes the trades needed to move each asset class from its current money
//! amount to the strategy's target share, then spreads each class's trade
//! across that class's holdings.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::asset_class::{AssetClass, ClassAllocation};
use crate::deviation::{DeviationReport, compute_allocation};
use crate::holding::{Holding, total_value};
use crate::strategy::Strategy;
use crate::trade::{Trade, TradeSide, total_amount};

/// Trades (and class gaps) smaller than this fraction are noise.
///
/// Applied three times: to the class gap against total value, to each
/// per-holding trade against that holding's value, and to every final trade
/// against total value.
pub const MATERIALITY: f64 = 0.01;

/// Compute rebalance trades from current holdings to strategy targets.
///
/// Output is grouped by class in canonical order, and by holding input order
/// within a class. A zero-value portfolio produces no trades.
///
/// Inputs are not validated here; [`crate::engine::plan`] runs
/// [`validate_holdings`](crate::holding::validate_holdings) and
/// [`Strategy::validate`] first. A non-finite total or class gap yields no
/// trades for that scope rather than arbitrary ones.
pub fn generate_trades(holdings: &[Holding], strategy: &Strategy) -> Vec<Trade> {
    let total = total_value(holdings);
    if !total.is_finite() || total <= 0.0 {
        if !total.is_finite() {
            warn!("portfolio total is {total}; no trades generated");
        }
        return Vec::new();
    }

    let allocation = compute_allocation(holdings);
    let floor = total * MATERIALITY;
    let mut trades = Vec::new();

    for class in AssetClass::ALL {
        let target_amount = total * strategy.target(class) / 100.0;
        let delta = target_amount - allocation[class];
        if !delta.is_finite() {
            warn!("{class}: target gap is {delta}; class skipped");
            continue;
        }
        if delta.abs() < floor {
            continue;
        }

        let members: Vec<&Holding> = holdings.iter().filter(|h| h.asset_class == class).collect();
        allocate_class(class, TradeSide::for_delta(delta), delta.abs(), &members, &mut trades);
    }

    trades.retain(|t| t.amount >= floor);
    trades
}

/// Spread `needed` across `members`, appending to `out`.
fn allocate_class(
    class: AssetClass,
    side: TradeSide,
    needed: f64,
    members: &[&Holding],
    out: &mut Vec<Trade>,
) {
    let start = out.len();
    let mut remaining = needed;

    for h in members {
        if remaining <= 0.0 {
            break;
        }
        let amount = remaining.min(h.value);
        // Dropped amounts still count as consumed.
        if amount > 0.0 && amount >= h.value * MATERIALITY {
            out.push(holding_trade(h, class, side, amount));
        }
        remaining -= amount;
    }

    // Buys are not bounded by what is already held: whatever the walk could
    // not place goes to the first holding, or to the class as a whole when
    // it has no holdings yet.
    if side == TradeSide::Buy && remaining > 0.0 {
        match members.first() {
            Some(first) => {
                let existing = out[start..]
                    .iter_mut()
                    .find(|t| t.holding_id.as_deref() == Some(first.id.as_str()));
                match existing {
                    Some(trade) => trade.amount += remaining,
                    None => out.insert(start, holding_trade(first, class, side, remaining)),
                }
            }
            None => out.push(Trade {
                side,
                asset_class: Some(class),
                holding_id: None,
                asset_name: class.aggregate_label(),
                amount: remaining,
                reason: Some(side.reason(class)),
                current_profit: None,
            }),
        }
    }
}

fn holding_trade(h: &Holding, class: AssetClass, side: TradeSide, amount: f64) -> Trade {
    Trade {
        side,
        asset_class: Some(class),
        holding_id: Some(h.id.clone()),
        asset_name: h.name.clone(),
        amount,
        reason: Some(side.reason(class)),
        current_profit: match side {
            TradeSide::Sell => Some(h.profit_percent),
            TradeSide::Buy => None,
        },
    }
}

/// Per-class money amounts after executing `trades`.
///
/// Trades without an asset class (legacy records) are ignored.
pub fn project_allocation(
    allocation: &ClassAllocation<f64>,
    trades: &[Trade],
) -> ClassAllocation<f64> {
    let mut projected = *allocation;
    for t in trades {
        if let Some(class) = t.asset_class {
            projected[class] += t.signed_amount();
        }
    }
    projected
}

/// Deviation report for the portfolio as it would look after `trades`.
pub fn projected_deviation(
    holdings: &[Holding],
    trades: &[Trade],
    strategy: &Strategy,
) -> DeviationReport {
    let projected = project_allocation(&compute_allocation(holdings), trades);
    DeviationReport::from_allocation(&projected, projected.total(), strategy)
}

/// Money totals and deviation before/after for one set of trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceSummary {
    pub total_buy_amount: f64,
    pub total_sell_amount: f64,
    /// Buys minus sells; positive means new money is needed.
    pub net_amount: f64,
    /// Current max deviation, rounded to 2 decimals.
    pub max_deviation: f64,
    /// Max deviation after the trades, rounded to 2 decimals.
    pub projected_max_deviation: f64,
}

impl RebalanceSummary {
    pub fn new(trades: &[Trade], current: &DeviationReport, projected: &DeviationReport) -> Self {
        let total_buy_amount = total_amount(trades, TradeSide::Buy);
        let total_sell_amount = total_amount(trades, TradeSide::Sell);
        Self {
            total_buy_amount,
            total_sell_amount,
            net_amount: total_buy_amount - total_sell_amount,
            max_deviation: round2(current.overall_deviation),
            projected_max_deviation: round2(projected.overall_deviation),
        }
    }
}

/// Summary of `trades` against the snapshot they were generated from.
pub fn summarize_trades(
    holdings: &[Holding],
    trades: &[Trade],
    strategy: &Strategy,
) -> RebalanceSummary {
    let current = DeviationReport::compute(holdings, strategy);
    let projected = projected_deviation(holdings, trades, strategy);
    RebalanceSummary::new(trades, &current, &projected)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl fmt::Display for RebalanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buy {:.2} / sell {:.2} (net {:+.2}); max deviation {:.2}% -> {:.2}%",
            self.total_buy_amount,
            self.total_sell_amount,
            self.net_amount,
            self.max_deviation,
            self.projected_max_deviation,
        )
    }
}
