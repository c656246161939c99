//! Target allocation strategies: presets, parsing and validation.

use serde::{Deserialize, Serialize};

use crate::asset_class::{AssetClass, ClassAllocation};
use crate::error::{Error, Result, ValidationError};

/// A named target allocation across the four asset classes, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub allocations: ClassAllocation<f64>,
}

/// Tolerance used when asking whether allocations add up to 100%.
const SUM_TOLERANCE: f64 = 0.01;

impl Strategy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        allocations: ClassAllocation<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            allocations,
        }
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let strategy: Strategy = serde_json::from_str(json)?;
        strategy.validate()?;
        Ok(strategy)
    }

    /// Target percent for one class.
    pub fn target(&self, class: AssetClass) -> f64 {
        self.allocations[class]
    }

    /// Sum of all four targets.
    pub fn allocation_total(&self) -> f64 {
        self.allocations.total()
    }

    /// True when the targets add up to 100 (within 0.01).
    pub fn is_balanced(&self) -> bool {
        (self.allocation_total() - 100.0).abs() <= SUM_TOLERANCE
    }

    /// True when the targets add up to more than 100. Editors warn on this;
    /// the engine still accepts it.
    pub fn is_over_allocated(&self) -> bool {
        self.allocation_total() > 100.0 + SUM_TOLERANCE
    }

    /// Validate the strategy.
    ///
    /// Sums other than 100 are degraded input, not errors: only an empty id,
    /// non-finite or negative targets are rejected.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId { kind: "strategy" });
        }
        for (class, &value) in self.allocations.iter() {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    owner: format!("strategy {}", self.id),
                    field: class.as_str(),
                });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeTarget {
                    id: self.id.clone(),
                    class: class.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// The built-in strategy catalog.
pub fn presets() -> Vec<Strategy> {
    vec![
        Strategy::new(
            "harry-browne",
            "Harry Browne Permanent Portfolio",
            "25% stocks + 25% bonds + 25% gold + 25% cash",
            ClassAllocation::new(25.0, 25.0, 25.0, 25.0),
        ),
        Strategy::new(
            "all-weather",
            "All Weather",
            "30% stocks + 40% bonds + 15% gold + 15% cash",
            ClassAllocation::new(30.0, 40.0, 15.0, 15.0),
        ),
        Strategy::new(
            "golden-balance",
            "Stock/Gold 60/40",
            "60% stocks + 40% gold",
            ClassAllocation::new(60.0, 0.0, 40.0, 0.0),
        ),
        Strategy::new(
            "custom",
            "Custom",
            "Set each asset class freely",
            ClassAllocation::default(),
        ),
    ]
}

/// Look up a preset by id.
pub fn preset(id: &str) -> Result<Strategy> {
    presets()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| Error::UnknownStrategy(id.to_string()))
}
