//! Current allocation ratios and deviation from target.
//!
//! Everything here is a pure function of its inputs: there are no error
//! conditions, and a zero-value portfolio simply reports zero current ratios.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset_class::{AssetClass, ClassAllocation};
use crate::holding::{Holding, total_value};
use crate::strategy::Strategy;

/// Per-class band: `|d| <= 5` is low, `<= 15` medium.
const CLASS_LOW_MAX: f64 = 5.0;
const CLASS_MEDIUM_MAX: f64 = 15.0;

/// Whole-portfolio band: max `|d| <= 10` is low, `<= 20` medium.
const OVERALL_LOW_MAX: f64 = 10.0;
const OVERALL_MEDIUM_MAX: f64 = 20.0;

/// How far a class (or the whole portfolio) has drifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Band for a single class deviation.
    pub fn for_class(deviation: f64) -> Self {
        Self::banded(deviation.abs(), CLASS_LOW_MAX, CLASS_MEDIUM_MAX)
    }

    /// Band for the portfolio-wide max deviation.
    pub fn for_overall(max_abs_deviation: f64) -> Self {
        Self::banded(max_abs_deviation.abs(), OVERALL_LOW_MAX, OVERALL_MEDIUM_MAX)
    }

    fn banded(abs: f64, low_max: f64, medium_max: f64) -> Self {
        if abs <= low_max {
            Severity::Low
        } else if abs <= medium_max {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// One class's drift from target, in percentage points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    #[serde(rename = "type")]
    pub asset_class: AssetClass,
    pub current: f64,
    pub target: f64,
    /// `current - target`; positive means overweight.
    pub deviation: f64,
    pub level: Severity,
}

/// Sum of holding values per class.
pub fn compute_allocation(holdings: &[Holding]) -> ClassAllocation<f64> {
    let mut alloc = ClassAllocation::default();
    for h in holdings {
        alloc[h.asset_class] += h.value;
    }
    alloc
}

/// Percent of `total` held in each class; all zero when `total` is zero.
pub fn compute_ratios(allocation: &ClassAllocation<f64>, total: f64) -> ClassAllocation<f64> {
    allocation.map(|_, &amount| {
        if total == 0.0 {
            0.0
        } else {
            amount / total * 100.0
        }
    })
}

/// Deviation of each class from target, in canonical class order.
pub fn compute_deviations(
    current: &ClassAllocation<f64>,
    target: &ClassAllocation<f64>,
) -> [Deviation; 4] {
    AssetClass::ALL.map(|class| {
        let deviation = current[class] - target[class];
        Deviation {
            asset_class: class,
            current: current[class],
            target: target[class],
            deviation,
            level: Severity::for_class(deviation),
        }
    })
}

/// Largest absolute deviation across classes.
pub fn overall_deviation(deviations: &[Deviation]) -> f64 {
    deviations
        .iter()
        .map(|d| d.deviation.abs())
        .fold(0.0, f64::max)
}

/// Deviations plus the portfolio-wide summary, from one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationReport {
    pub deviations: [Deviation; 4],
    pub overall_deviation: f64,
    pub overall_level: Severity,
}

impl DeviationReport {
    /// Compare the current allocation of `holdings` with `strategy`.
    pub fn compute(holdings: &[Holding], strategy: &Strategy) -> Self {
        let allocation = compute_allocation(holdings);
        Self::from_allocation(&allocation, total_value(holdings), strategy)
    }

    /// Compare a per-class money allocation with `strategy`.
    pub fn from_allocation(
        allocation: &ClassAllocation<f64>,
        total: f64,
        strategy: &Strategy,
    ) -> Self {
        let ratios = compute_ratios(allocation, total);
        let deviations = compute_deviations(&ratios, &strategy.allocations);
        let overall = overall_deviation(&deviations);
        Self {
            deviations,
            overall_deviation: overall,
            overall_level: Severity::for_overall(overall),
        }
    }

    pub fn get(&self, class: AssetClass) -> &Deviation {
        &self.deviations[class.index()]
    }
}

impl fmt::Display for DeviationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DEVIATION:")?;
        writeln!(
            f,
            "  {:6} {:>9} {:>9} {:>9}  {}",
            "Class", "Current%", "Target%", "Diff%", "Level"
        )?;
        for d in &self.deviations {
            writeln!(
                f,
                "  {:6} {:>8.2}% {:>8.2}% {:>+8.2}%  {}",
                d.asset_class, d.current, d.target, d.deviation, d.level
            )?;
        }
        writeln!(
            f,
            "\n  Max deviation: {:.2}% ({})",
            self.overall_deviation, self.overall_level
        )
    }
}
