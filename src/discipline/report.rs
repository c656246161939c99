//! Discipline check report types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavioral trading rule that produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisciplineRule {
    /// Buying something that just ran up.
    ChasingHigh,
    /// Selling a winner: consider trimming half first.
    ProfitTake,
    /// Buying gold right after a sharp rise.
    GoldRule,
    /// Every buy: confirm the trend is established.
    LeftSide,
}

impl DisciplineRule {
    pub fn as_str(self) -> &'static str {
        match self {
            DisciplineRule::ChasingHigh => "chasing_high",
            DisciplineRule::ProfitTake => "profit_take",
            DisciplineRule::GoldRule => "gold_rule",
            DisciplineRule::LeftSide => "left_side",
        }
    }
}

impl fmt::Display for DisciplineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Advisory or blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Warning,
    Blocking,
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningLevel::Warning => write!(f, "WARN"),
            WarningLevel::Blocking => write!(f, "BLOCK"),
        }
    }
}

/// A single rule hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineWarning {
    #[serde(rename = "type")]
    pub rule: DisciplineRule,
    pub level: WarningLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
}

impl DisciplineWarning {
    pub fn is_blocking(&self) -> bool {
        self.level == WarningLevel::Blocking
    }
}

/// Result of checking a whole trade list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisciplineCheckResult {
    /// True iff `blocking` is empty.
    pub passed: bool,
    pub warnings: Vec<DisciplineWarning>,
    pub blocking: Vec<DisciplineWarning>,
}

impl DisciplineCheckResult {
    /// Partition deduplicated warnings by level.
    pub fn from_warnings(all: Vec<DisciplineWarning>) -> Self {
        let (blocking, warnings): (Vec<_>, Vec<_>) =
            all.into_iter().partition(DisciplineWarning::is_blocking);
        Self {
            passed: blocking.is_empty(),
            warnings,
            blocking,
        }
    }

    /// True if any rule blocks the rebalance.
    pub fn has_blocking(&self) -> bool {
        !self.blocking.is_empty()
    }

    /// True if any advisory warning fired.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Blocking first, then advisory.
    pub fn iter(&self) -> impl Iterator<Item = &DisciplineWarning> {
        self.blocking.iter().chain(self.warnings.iter())
    }
}

impl fmt::Display for DisciplineCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DISCIPLINE CHECKS:")?;
        if self.blocking.is_empty() && self.warnings.is_empty() {
            return writeln!(f, "  no rule triggered");
        }
        for w in self.iter() {
            writeln!(f, "  [{}] {}: {}", w.level, w.rule, w.message)?;
        }
        Ok(())
    }
}
