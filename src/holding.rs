//! Individual tracked positions.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::asset_class::AssetClass;
use crate::error::ValidationError;

/// An individual position (e.g. one fund) with a money value and asset class.
///
/// Holdings are owned by the caller; the engine only reads them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub asset_class: AssetClass,
    /// Share of the whole portfolio in percent. See [`recompute_ratios`].
    #[serde(default)]
    pub current_ratio: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub profit_percent: f64,
    /// Price change over the last 3 days, in percent.
    #[serde(default, rename = "recent3DaysChange", skip_serializing_if = "Option::is_none")]
    pub recent_3_days_change: Option<f64>,
    /// Price change over the last 5 days, in percent.
    #[serde(default, rename = "recent5DaysChange", skip_serializing_if = "Option::is_none")]
    pub recent_5_days_change: Option<f64>,
}

impl Holding {
    /// A holding with zero profit, no recent price history and ratio 0.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        value: f64,
        asset_class: AssetClass,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            value,
            asset_class,
            current_ratio: 0.0,
            profit: 0.0,
            profit_percent: 0.0,
            recent_3_days_change: None,
            recent_5_days_change: None,
        }
    }

    pub fn with_profit(mut self, profit: f64, profit_percent: f64) -> Self {
        self.profit = profit;
        self.profit_percent = profit_percent;
        self
    }

    pub fn with_recent_changes(mut self, three_days: Option<f64>, five_days: Option<f64>) -> Self {
        self.recent_3_days_change = three_days;
        self.recent_5_days_change = five_days;
        self
    }

    /// Reject values that would poison ratio or trade arithmetic.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId { kind: "holding" });
        }
        let owner = || format!("holding {}", self.id);
        if !self.value.is_finite() {
            return Err(ValidationError::NonFinite {
                owner: owner(),
                field: "value",
            });
        }
        if self.value < 0.0 {
            return Err(ValidationError::NegativeValue {
                id: self.id.clone(),
                value: self.value,
            });
        }
        let optional = [
            ("recent_3_days_change", self.recent_3_days_change),
            ("recent_5_days_change", self.recent_5_days_change),
        ];
        let required = [("profit", self.profit), ("profit_percent", self.profit_percent)];
        for (field, v) in required
            .into_iter()
            .chain(optional.into_iter().filter_map(|(f, v)| v.map(|v| (f, v))))
        {
            if !v.is_finite() {
                return Err(ValidationError::NonFinite {
                    owner: owner(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Validate every holding, stopping at the first bad one.
///
/// Ids must be unique: trades are joined back to holdings by id.
pub fn validate_holdings(holdings: &[Holding]) -> Result<(), ValidationError> {
    let mut ids = FxHashSet::default();
    for h in holdings {
        h.validate()?;
        if !ids.insert(h.id.as_str()) {
            return Err(ValidationError::DuplicateId(h.id.clone()));
        }
    }
    Ok(())
}

/// Sum of all holding values.
pub fn total_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(|h| h.value).sum()
}

/// Rewrite every holding's `current_ratio` as `value / total * 100`.
///
/// All ratios become 0 when the total is 0. No other field is touched, so
/// calling this twice gives the same result as calling it once.
pub fn recompute_ratios(holdings: &mut [Holding]) {
    let total = total_value(holdings);
    for h in holdings.iter_mut() {
        h.current_ratio = if total > 0.0 {
            h.value / total * 100.0
        } else {
            0.0
        };
    }
}
