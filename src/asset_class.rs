//! Asset classes and per-class values.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The coarse bucket a strategy targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stock,
    Bond,
    Gold,
    Cash,
}

impl AssetClass {
    /// All classes in canonical order.
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Stock,
        AssetClass::Bond,
        AssetClass::Gold,
        AssetClass::Cash,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Stock => "stock",
            AssetClass::Bond => "bond",
            AssetClass::Gold => "gold",
            AssetClass::Cash => "cash",
        }
    }

    /// Position in [`AssetClass::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label used for class-level aggregate trades (no single holding).
    pub fn aggregate_label(self) -> String {
        format!("{} assets", self.as_str())
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(AssetClass::Stock),
            "bond" => Ok(AssetClass::Bond),
            "gold" => Ok(AssetClass::Gold),
            "cash" => Ok(AssetClass::Cash),
            _ => Err(ValidationError::UnknownAssetClass(s.to_string())),
        }
    }
}

/// One value per asset class.
///
/// A fixed record rather than a map, so every match over classes is
/// exhaustive and a missing class is a compile error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassAllocation<T> {
    #[serde(default)]
    pub stock: T,
    #[serde(default)]
    pub bond: T,
    #[serde(default)]
    pub gold: T,
    #[serde(default)]
    pub cash: T,
}

impl<T> ClassAllocation<T> {
    pub const fn new(stock: T, bond: T, gold: T, cash: T) -> Self {
        Self {
            stock,
            bond,
            gold,
            cash,
        }
    }

    /// Build by calling `f` once per class, in canonical order.
    pub fn from_fn(mut f: impl FnMut(AssetClass) -> T) -> Self {
        Self {
            stock: f(AssetClass::Stock),
            bond: f(AssetClass::Bond),
            gold: f(AssetClass::Gold),
            cash: f(AssetClass::Cash),
        }
    }

    /// `(class, &value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, &T)> {
        AssetClass::ALL.into_iter().map(move |class| (class, &self[class]))
    }

    pub fn map<U>(&self, mut f: impl FnMut(AssetClass, &T) -> U) -> ClassAllocation<U> {
        ClassAllocation::from_fn(|class| f(class, &self[class]))
    }
}

impl ClassAllocation<f64> {
    /// Sum over all four classes.
    pub fn total(&self) -> f64 {
        self.stock + self.bond + self.gold + self.cash
    }
}

impl<T> Index<AssetClass> for ClassAllocation<T> {
    type Output = T;

    fn index(&self, class: AssetClass) -> &T {
        match class {
            AssetClass::Stock => &self.stock,
            AssetClass::Bond => &self.bond,
            AssetClass::Gold => &self.gold,
            AssetClass::Cash => &self.cash,
        }
    }
}

impl<T> IndexMut<AssetClass> for ClassAllocation<T> {
    fn index_mut(&mut self, class: AssetClass) -> &mut T {
        match class {
            AssetClass::Stock => &mut self.stock,
            AssetClass::Bond => &mut self.bond,
            AssetClass::Gold => &mut self.gold,
            AssetClass::Cash => &mut self.cash,
        }
    }
}
