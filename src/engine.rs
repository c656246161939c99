//! Rebalance orchestrator: deviation → trades → discipline → confirm → record.
//!
//! This is the workflow that ties all components together. A plan is built
//! from one immutable snapshot of holdings and strategy; confirming it writes
//! a record to the history ledger.

use std::fmt;

use log::{info, warn};

use crate::config::Config;
use crate::deviation::DeviationReport;
use crate::diff::{self, RebalanceSummary};
use crate::discipline::{self, DisciplineCheckResult};
use crate::error::{Error, Result};
use crate::history::{HistoryStore, JsonFileStore, RebalanceHistoryRecord, RebalanceLedger};
use crate::holding::{self, Holding};
use crate::strategy::Strategy;
use crate::trade::Trade;

/// Everything computed for one rebalance, from one snapshot.
#[derive(Debug, Clone)]
pub struct RebalancePlan {
    pub strategy: Strategy,
    /// Input holdings with `current_ratio` recomputed.
    pub holdings: Vec<Holding>,
    pub total_value: f64,
    pub deviation: DeviationReport,
    pub trades: Vec<Trade>,
    pub discipline: DisciplineCheckResult,
    /// Deviation as it would be after executing `trades`.
    pub projected: DeviationReport,
    pub summary: RebalanceSummary,
}

impl RebalancePlan {
    /// True when the portfolio is already within tolerance of target.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// True when a blocking discipline rule fired.
    pub fn is_blocked(&self) -> bool {
        self.discipline.has_blocking()
    }
}

/// Options for confirming a plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmOptions {
    /// Record the plan even though a blocking rule fired.
    pub override_blocking: bool,
}

/// Build a rebalance plan for `holdings` against `strategy`.
pub fn plan(holdings: &[Holding], strategy: &Strategy) -> Result<RebalancePlan> {
    holding::validate_holdings(holdings)?;
    strategy.validate()?;
    if !strategy.is_balanced() {
        warn!(
            "strategy {} allocates {:.2}%, not 100%; using targets as given",
            strategy.id,
            strategy.allocation_total()
        );
    }

    let mut snapshot = holdings.to_vec();
    holding::recompute_ratios(&mut snapshot);
    let total_value = holding::total_value(&snapshot);

    let deviation = DeviationReport::compute(&snapshot, strategy);
    let trades = diff::generate_trades(&snapshot, strategy);
    let discipline = discipline::check_all(&trades, &snapshot);
    let projected = diff::projected_deviation(&snapshot, &trades, strategy);
    let summary = RebalanceSummary::new(&trades, &deviation, &projected);

    info!(
        "plan {}: {} holding(s), value {:.2}, max deviation {:.2}% ({}), {} trade(s), {} blocking",
        strategy.id,
        snapshot.len(),
        total_value,
        deviation.overall_deviation,
        deviation.overall_level,
        trades.len(),
        discipline.blocking.len(),
    );

    Ok(RebalancePlan {
        strategy: strategy.clone(),
        holdings: snapshot,
        total_value,
        deviation,
        trades,
        discipline,
        projected,
        summary,
    })
}

/// Plans rebalances and records the confirmed ones.
#[derive(Debug)]
pub struct Rebalancer<S: HistoryStore> {
    ledger: RebalanceLedger<S>,
}

impl Rebalancer<JsonFileStore> {
    /// Open the JSON history file named by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::open(JsonFileStore::new(config.history_path()))
    }
}

impl<S: HistoryStore> Rebalancer<S> {
    pub fn new(ledger: RebalanceLedger<S>) -> Self {
        Self { ledger }
    }

    /// Load history from `store`.
    pub fn open(store: S) -> Self {
        Self::new(RebalanceLedger::open(store))
    }

    pub fn ledger(&self) -> &RebalanceLedger<S> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut RebalanceLedger<S> {
        &mut self.ledger
    }

    pub fn plan(&self, holdings: &[Holding], strategy: &Strategy) -> Result<RebalancePlan> {
        plan(holdings, strategy)
    }

    /// Record `plan` as executed.
    ///
    /// Refuses an empty plan, and a blocked plan unless
    /// `opts.override_blocking` is set.
    pub fn confirm(
        &mut self,
        plan: &RebalancePlan,
        opts: ConfirmOptions,
    ) -> Result<RebalanceHistoryRecord> {
        if plan.is_empty() {
            return Err(Error::NothingToRebalance);
        }
        if plan.is_blocked() {
            if !opts.override_blocking {
                return Err(Error::DisciplineBlocked(plan.discipline.blocking.len()));
            }
            warn!(
                "confirming plan {} despite {} blocking rule(s)",
                plan.strategy.id,
                plan.discipline.blocking.len()
            );
        }

        Ok(self.ledger.record(
            &plan.strategy.id,
            &plan.strategy.name,
            plan.trades.clone(),
            plan.deviation.overall_deviation,
            plan.projected.overall_deviation,
        ))
    }
}

impl fmt::Display for RebalancePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "REBALANCE PLAN: {} ({})",
            self.strategy.name, self.strategy.id
        )?;
        writeln!(f, "  Portfolio value: {:.2}\n", self.total_value)?;
        writeln!(f, "{}", self.deviation)?;

        writeln!(f, "TRADES:")?;
        if self.trades.is_empty() {
            writeln!(f, "  no rebalancing needed")?;
        } else {
            for t in &self.trades {
                let class = t.asset_class.map(|c| c.as_str()).unwrap_or("-");
                writeln!(
                    f,
                    "  {:<4} {:6} {:<28} {:>12.2}  {}",
                    t.side,
                    class,
                    t.asset_name,
                    t.amount,
                    t.reason.as_deref().unwrap_or(""),
                )?;
            }
            writeln!(f, "\n  {}", self.summary)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.discipline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_class::AssetClass;
    use crate::history::MemoryStore;
    use crate::strategy::preset;

    fn holdings() -> Vec<Holding> {
        vec![
            Holding::new("s", "Global Tech ETF", "TECH", 6_000.0, AssetClass::Stock),
            Holding::new("b", "Treasury Fund", "TLT", 2_000.0, AssetClass::Bond),
            Holding::new("g", "Gold ETF", "GLD", 1_000.0, AssetClass::Gold),
            Holding::new("c", "Money Market", "MM", 1_000.0, AssetClass::Cash),
        ]
    }

    #[test]
    fn plan_from_one_snapshot() {
        let p = plan(&holdings(), &preset("harry-browne").unwrap()).unwrap();
        assert_eq!(p.total_value, 10_000.0);
        assert_eq!(p.holdings[0].current_ratio, 60.0);
        assert_eq!(p.trades.len(), 4);
        assert_eq!(p.summary.max_deviation, 35.0);
        assert!(p.projected.overall_deviation < 1e-9);
        assert!(p.discipline.passed);
        // One right-side reminder per bought holding.
        assert_eq!(p.discipline.warnings.len(), 3);
    }

    #[test]
    fn plan_rejects_bad_input() {
        let mut bad = holdings();
        bad[1].value = -1.0;
        assert!(matches!(
            plan(&bad, &preset("harry-browne").unwrap()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn confirm_records_deviation() {
        let mut r = Rebalancer::open(MemoryStore::new());
        let p = r.plan(&holdings(), &preset("harry-browne").unwrap()).unwrap();
        let record = r.confirm(&p, ConfirmOptions::default()).unwrap();
        assert_eq!(record.strategy_id, "harry-browne");
        assert_eq!(record.pre_deviation, 35.0);
        assert!(record.post_deviation < 1e-9);
        assert_eq!(record.total_sell_amount, 3_500.0);
        assert_eq!(r.ledger().len(), 1);
    }

    #[test]
    fn confirm_refuses_empty_plan() {
        let mut r = Rebalancer::open(MemoryStore::new());
        let balanced = vec![
            Holding::new("s", "S", "S", 2_500.0, AssetClass::Stock),
            Holding::new("b", "B", "B", 2_500.0, AssetClass::Bond),
            Holding::new("g", "G", "G", 2_500.0, AssetClass::Gold),
            Holding::new("c", "C", "C", 2_500.0, AssetClass::Cash),
        ];
        let p = r.plan(&balanced, &preset("harry-browne").unwrap()).unwrap();
        assert!(p.is_empty());
        assert!(matches!(
            r.confirm(&p, ConfirmOptions::default()),
            Err(Error::NothingToRebalance)
        ));
        assert!(r.ledger().is_empty());
    }

    #[test]
    fn blocked_plan_needs_override() {
        let mut hs = holdings();
        hs[2] = hs[2].clone().with_recent_changes(Some(7.0), None);
        let mut r = Rebalancer::open(MemoryStore::new());
        let p = r.plan(&hs, &preset("harry-browne").unwrap()).unwrap();
        assert!(p.is_blocked());

        assert!(matches!(
            r.confirm(&p, ConfirmOptions::default()),
            Err(Error::DisciplineBlocked(1))
        ));
        assert!(r.ledger().is_empty());

        let opts = ConfirmOptions {
            override_blocking: true,
        };
        assert!(r.confirm(&p, opts).is_ok());
        assert_eq!(r.ledger().len(), 1);
    }

    #[test]
    fn display_plan() {
        let p = plan(&holdings(), &preset("harry-browne").unwrap()).unwrap();
        let s = format!("{p}");
        assert!(s.contains("REBALANCE PLAN: Harry Browne Permanent Portfolio (harry-browne)"));
        assert!(s.contains("SELL"));
        assert!(s.contains("Global Tech ETF"));
        assert!(s.contains("DISCIPLINE CHECKS:"));
        assert!(s.contains("[WARN] left_side"));
    }
}
