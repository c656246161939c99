//! Individual discipline rule implementations.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::asset_class::AssetClass;
use crate::holding::Holding;
use crate::trade::{Trade, TradeSide};

use super::report::{DisciplineCheckResult, DisciplineRule, DisciplineWarning, WarningLevel};

/// Buying after a 5-day run-up above this percent is chasing.
pub const CHASING_HIGH_PERCENT: f64 = 5.0;
/// Selling above this profit percent triggers the take-half reminder.
pub const PROFIT_TAKE_PERCENT: f64 = 15.0;
/// Buying gold after a 3-day rise above this percent is blocked.
pub const GOLD_RULE_PERCENT: f64 = 6.0;

fn warning(
    holding: &Holding,
    rule: DisciplineRule,
    level: WarningLevel,
    message: String,
) -> DisciplineWarning {
    DisciplineWarning {
        rule,
        level,
        message,
        asset_id: Some(holding.id.clone()),
        asset_name: Some(holding.name.clone()),
    }
}

/// Evaluate every rule for one trade direction on one holding.
///
/// Rules fire in a fixed order: chasing_high, profit_take, gold_rule,
/// left_side.
pub fn check_trade(holding: &Holding, side: TradeSide) -> Vec<DisciplineWarning> {
    let mut out = Vec::new();

    // 1. Chasing highs
    if side == TradeSide::Buy {
        if let Some(change) = holding.recent_5_days_change {
            if change > CHASING_HIGH_PERCENT {
                out.push(warning(
                    holding,
                    DisciplineRule::ChasingHigh,
                    WarningLevel::Warning,
                    format!(
                        "{} is up {change:.1}% over 5 days; buying now may be chasing the high",
                        holding.name
                    ),
                ));
            }
        }
    }

    // 2. Take profit in halves
    if side == TradeSide::Sell && holding.profit_percent > PROFIT_TAKE_PERCENT {
        out.push(warning(
            holding,
            DisciplineRule::ProfitTake,
            WarningLevel::Warning,
            format!(
                "{} is up {:.1}%; consider trimming half first to lock in gains",
                holding.name, holding.profit_percent
            ),
        ));
    }

    // 3. Gold after a sharp rise: sell, don't buy
    if side == TradeSide::Buy && holding.asset_class == AssetClass::Gold {
        if let Some(change) = holding.recent_3_days_change {
            if change > GOLD_RULE_PERCENT {
                out.push(warning(
                    holding,
                    DisciplineRule::GoldRule,
                    WarningLevel::Blocking,
                    format!(
                        "{} is up {change:.1}% over 3 days; consider selling rather than buying",
                        holding.name
                    ),
                ));
            }
        }
    }

    // 4. Right-side confirmation on every buy
    if side == TradeSide::Buy {
        out.push(warning(
            holding,
            DisciplineRule::LeftSide,
            WarningLevel::Warning,
            "confirm this is a right-side entry (trend established), not bottom fishing".into(),
        ));
    }

    out
}

/// Join a trade to its holding: by id when the trade carries one.
///
/// A class-level aggregate (class set, no id) has no holding. Only trades
/// with neither id nor class, as stored by older records, fall back to the
/// display name.
fn find_holding<'a>(
    trade: &Trade,
    by_id: &FxHashMap<&str, &'a Holding>,
    holdings: &'a [Holding],
) -> Option<&'a Holding> {
    match (trade.holding_id.as_deref(), trade.asset_class) {
        (Some(id), _) => by_id.get(id).copied(),
        (None, Some(_)) => None,
        (None, None) => holdings.iter().find(|h| h.name == trade.asset_name),
    }
}

/// Run all rules over all trades.
///
/// Warnings are deduplicated by (rule, holding id), keeping the first. A
/// trade that matches no holding is skipped without a warning.
pub fn check_all(trades: &[Trade], holdings: &[Holding]) -> DisciplineCheckResult {
    let by_id: FxHashMap<&str, &Holding> =
        holdings.iter().map(|h| (h.id.as_str(), h)).collect();

    let mut seen: FxHashSet<(DisciplineRule, Option<String>)> = FxHashSet::default();
    let mut unique = Vec::new();

    for trade in trades {
        let Some(holding) = find_holding(trade, &by_id, holdings) else {
            debug!(
                "discipline: no holding for {} {} ({:?}), skipped",
                trade.side,
                trade.asset_name,
                trade.holding_id
            );
            continue;
        };
        for w in check_trade(holding, trade.side) {
            if seen.insert((w.rule, w.asset_id.clone())) {
                unique.push(w);
            }
        }
    }

    DisciplineCheckResult::from_warnings(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold(three_day: f64) -> Holding {
        Holding::new("g", "Gold ETF", "GLD", 1_000.0, AssetClass::Gold)
            .with_recent_changes(Some(three_day), Some(1.0))
    }

    fn stock() -> Holding {
        Holding::new("s", "Global Tech ETF", "TECH", 6_000.0, AssetClass::Stock)
            .with_profit(1_200.0, 20.0)
            .with_recent_changes(Some(2.0), Some(7.5))
    }

    fn trade_for(h: &Holding, side: TradeSide) -> Trade {
        Trade {
            side,
            asset_class: Some(h.asset_class),
            holding_id: Some(h.id.clone()),
            asset_name: h.name.clone(),
            amount: 500.0,
            reason: None,
            current_profit: None,
        }
    }

    fn rules(ws: &[DisciplineWarning]) -> Vec<DisciplineRule> {
        ws.iter().map(|w| w.rule).collect()
    }

    #[test]
    fn buy_rule_order() {
        let ws = check_trade(&stock(), TradeSide::Buy);
        assert_eq!(
            rules(&ws),
            vec![DisciplineRule::ChasingHigh, DisciplineRule::LeftSide]
        );
        assert!(ws[0].message.contains("7.5%"));
    }

    #[test]
    fn sell_profit_take_only() {
        let ws = check_trade(&stock(), TradeSide::Sell);
        assert_eq!(rules(&ws), vec![DisciplineRule::ProfitTake]);
        assert_eq!(ws[0].level, WarningLevel::Warning);
    }

    #[test]
    fn thresholds_are_strict() {
        let h = Holding::new("s", "S", "S", 100.0, AssetClass::Stock)
            .with_profit(15.0, 15.0)
            .with_recent_changes(None, Some(5.0));
        assert_eq!(rules(&check_trade(&h, TradeSide::Buy)), vec![DisciplineRule::LeftSide]);
        assert!(check_trade(&h, TradeSide::Sell).is_empty());
        assert_eq!(
            rules(&check_trade(&gold(6.0), TradeSide::Buy)),
            vec![DisciplineRule::LeftSide]
        );
    }

    #[test]
    fn missing_recent_change_never_fires() {
        let h = Holding::new("g", "Gold", "G", 100.0, AssetClass::Gold);
        assert_eq!(rules(&check_trade(&h, TradeSide::Buy)), vec![DisciplineRule::LeftSide]);
    }

    #[test]
    fn gold_rule_blocks() {
        let g = gold(7.2);
        let result = check_all(&[trade_for(&g, TradeSide::Buy)], &[g]);
        assert!(!result.passed);
        assert_eq!(rules(&result.blocking), vec![DisciplineRule::GoldRule]);
        assert_eq!(rules(&result.warnings), vec![DisciplineRule::LeftSide]);
    }

    #[test]
    fn gold_rule_ignores_other_classes() {
        let h = Holding::new("s", "S", "S", 100.0, AssetClass::Stock)
            .with_recent_changes(Some(9.0), None);
        let result = check_all(&[trade_for(&h, TradeSide::Buy)], &[h]);
        assert!(result.passed);
    }

    #[test]
    fn dedup_by_rule_and_holding() {
        let s = stock();
        let trades = vec![trade_for(&s, TradeSide::Buy), trade_for(&s, TradeSide::Buy)];
        let result = check_all(&trades, &[s]);
        assert_eq!(
            rules(&result.warnings),
            vec![DisciplineRule::ChasingHigh, DisciplineRule::LeftSide]
        );
    }

    #[test]
    fn left_side_per_holding() {
        let a = Holding::new("a", "A", "A", 100.0, AssetClass::Bond);
        let b = Holding::new("b", "B", "B", 100.0, AssetClass::Cash);
        let trades = vec![trade_for(&a, TradeSide::Buy), trade_for(&b, TradeSide::Buy)];
        let result = check_all(&trades, &[a, b]);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn name_fallback_without_id() {
        let g = gold(8.0);
        let mut t = trade_for(&g, TradeSide::Buy);
        t.holding_id = None;
        t.asset_class = None;
        let result = check_all(&[t], &[g]);
        assert!(!result.passed);
    }

    #[test]
    fn aggregate_trade_never_matches_by_name() {
        let g = Holding::new("g", "gold assets", "GLD", 1_000.0, AssetClass::Gold)
            .with_recent_changes(Some(8.0), None);
        let aggregate = Trade {
            side: TradeSide::Buy,
            asset_class: Some(AssetClass::Gold),
            holding_id: None,
            asset_name: "gold assets".into(),
            amount: 2_500.0,
            reason: None,
            current_profit: None,
        };
        let result = check_all(&[aggregate], &[g]);
        assert!(result.passed);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn id_join_survives_duplicate_names() {
        let quiet = Holding::new("g1", "Gold ETF", "GLD", 1_000.0, AssetClass::Gold);
        let hot = gold(8.0);
        let result = check_all(&[trade_for(&quiet, TradeSide::Buy)], &[hot, quiet]);
        assert!(result.passed);
    }

    #[test]
    fn unmatched_trade_skipped() {
        let g = gold(8.0);
        let mut t = trade_for(&g, TradeSide::Buy);
        t.holding_id = Some("gone".into());
        let result = check_all(&[t], &[g]);
        assert!(result.passed);
        assert!(result.warnings.is_empty());
    }
}
