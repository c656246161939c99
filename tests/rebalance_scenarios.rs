//! End-to-end rebalance scenarios: deviation, trades and discipline on
//! realistic portfolios.

use smartfolio::{
    AssetClass, ClassAllocation, ConfirmOptions, DisciplineRule, Error, Holding, MemoryStore,
    Rebalancer, Severity, Strategy, TradeSide, ValidationError, plan, preset,
};

fn permanent() -> Strategy {
    preset("harry-browne").unwrap()
}

fn lopsided() -> Vec<Holding> {
    vec![
        Holding::new("1", "Global Tech ETF", "513100", 6_000.0, AssetClass::Stock)
            .with_profit(1_080.0, 18.0),
        Holding::new("2", "Treasury Bond Fund", "511010", 2_000.0, AssetClass::Bond),
        Holding::new("3", "Gold ETF", "518880", 1_000.0, AssetClass::Gold)
            .with_recent_changes(Some(2.5), Some(3.0)),
        Holding::new("4", "Money Market", "511990", 1_000.0, AssetClass::Cash),
    ]
}

// === Deterministic plan ===

#[test]
fn lopsided_portfolio_against_permanent() {
    let p = plan(&lopsided(), &permanent()).unwrap();

    let levels: Vec<_> = p
        .deviation
        .deviations
        .iter()
        .map(|d| (d.asset_class, d.deviation, d.level))
        .collect();
    assert_eq!(
        levels,
        vec![
            (AssetClass::Stock, 35.0, Severity::High),
            (AssetClass::Bond, -5.0, Severity::Low),
            (AssetClass::Gold, -15.0, Severity::Medium),
            (AssetClass::Cash, -15.0, Severity::Medium),
        ]
    );
    assert_eq!(p.deviation.overall_level, Severity::High);

    let sells: Vec<_> = p.trades.iter().filter(|t| t.is_sell()).collect();
    assert_eq!(sells.len(), 1);
    assert_eq!(sells[0].asset_name, "Global Tech ETF");
    assert_eq!(sells[0].amount, 3_500.0);
    assert_eq!(sells[0].current_profit, Some(18.0));

    let buys: f64 = p.trades.iter().filter(|t| t.is_buy()).map(|t| t.amount).sum();
    assert_eq!(buys, 3_500.0);
    assert_eq!(p.summary.net_amount, 0.0);
}

#[test]
fn profit_take_reminder_on_winner() {
    let p = plan(&lopsided(), &permanent()).unwrap();
    assert!(p.discipline.passed);
    assert!(
        p.discipline
            .warnings
            .iter()
            .any(|w| w.rule == DisciplineRule::ProfitTake && w.asset_id.as_deref() == Some("1"))
    );
}

// === Edge cases ===

#[test]
fn empty_portfolio() {
    let p = plan(&[], &permanent()).unwrap();
    assert!(p.trades.is_empty());
    assert_eq!(p.total_value, 0.0);
    assert!(p.deviation.deviations.iter().all(|d| d.current == 0.0));
}

#[test]
fn unbalanced_strategy_is_accepted() {
    let heavy = Strategy::new("heavy", "Heavy", "", ClassAllocation::new(80.0, 30.0, 10.0, 10.0));
    let p = plan(&lopsided(), &heavy).unwrap();
    // Stock target 8 000 vs 6 000 held.
    let stock: f64 = p
        .trades
        .iter()
        .filter(|t| t.asset_class == Some(AssetClass::Stock))
        .map(|t| t.signed_amount())
        .sum();
    assert_eq!(stock, 2_000.0);
}

#[test]
fn liquidate_class_with_zero_target() {
    let stocks_and_gold = preset("golden-balance").unwrap();
    let p = plan(&lopsided(), &stocks_and_gold).unwrap();

    let sold: Vec<_> = p
        .trades
        .iter()
        .filter(|t| t.side == TradeSide::Sell)
        .map(|t| (t.asset_class, t.amount))
        .collect();
    assert!(sold.contains(&(Some(AssetClass::Bond), 2_000.0)));
    assert!(sold.contains(&(Some(AssetClass::Cash), 1_000.0)));
}

#[test]
fn new_class_gets_aggregate_buy() {
    let holdings = vec![Holding::new("1", "Tech", "T", 10_000.0, AssetClass::Stock)];
    let p = plan(&holdings, &permanent()).unwrap();

    let aggregates: Vec<_> = p.trades.iter().filter(|t| t.holding_id.is_none()).collect();
    assert_eq!(aggregates.len(), 3);
    assert_eq!(aggregates[0].asset_name, "bond assets");
    assert!(aggregates.iter().all(|t| t.amount == 2_500.0));
    // Aggregates have no holding, so no discipline warnings attach to them.
    assert!(p.discipline.warnings.is_empty());
}

#[test]
fn negative_value_rejected() {
    let mut holdings = lopsided();
    holdings[0].value = -10.0;
    assert!(matches!(plan(&holdings, &permanent()), Err(Error::Validation(_))));
}

#[test]
fn shared_holding_id_rejected() {
    let holdings = vec![
        Holding::new("x", "Gold ETF", "518880", 1_000.0, AssetClass::Gold)
            .with_recent_changes(Some(8.0), None),
        Holding::new("x", "Global Tech ETF", "513100", 9_000.0, AssetClass::Stock),
    ];
    let err = plan(&holdings, &preset("golden-balance").unwrap()).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::DuplicateId(ref id)) if id == "x"
    ));
}

// === Gold rule ===

#[test]
fn hot_gold_blocks_confirmation() {
    let mut holdings = lopsided();
    holdings[2] = holdings[2].clone().with_recent_changes(Some(6.5), Some(8.0));

    let mut rebalancer = Rebalancer::open(MemoryStore::new());
    let p = rebalancer.plan(&holdings, &permanent()).unwrap();

    assert!(!p.discipline.passed);
    assert_eq!(p.discipline.blocking.len(), 1);
    assert_eq!(p.discipline.blocking[0].rule, DisciplineRule::GoldRule);
    assert!(
        p.discipline
            .warnings
            .iter()
            .any(|w| w.rule == DisciplineRule::ChasingHigh)
    );

    let err = rebalancer.confirm(&p, ConfirmOptions::default()).unwrap_err();
    assert!(matches!(err, Error::DisciplineBlocked(1)));
    assert!(rebalancer.ledger().is_empty());
}

#[test]
fn rebalanced_portfolio_is_quiet() {
    let p = plan(&lopsided(), &permanent()).unwrap();
    let after: Vec<Holding> = lopsided()
        .into_iter()
        .map(|mut h| {
            let delta: f64 = p
                .trades
                .iter()
                .filter(|t| t.holding_id.as_deref() == Some(h.id.as_str()))
                .map(|t| t.signed_amount())
                .sum();
            h.value += delta;
            h
        })
        .collect();

    let again = plan(&after, &permanent()).unwrap();
    assert!(again.is_empty());
    assert_eq!(again.deviation.overall_level, Severity::Low);
}
