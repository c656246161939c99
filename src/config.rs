//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use log::warn;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::strategy::{Strategy, presets};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

/// Where the rebalance history lives.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_dir")]
    pub dir: String,
    #[serde(default = "default_history_file")]
    pub file: String,
}

fn default_history_dir() -> String {
    "./data".into()
}
fn default_history_file() -> String {
    "rebalance_history.json".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: default_history_dir(),
            file: default_history_file(),
        }
    }
}

/// Active strategy and user-defined additions to the preset catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    #[serde(default = "default_active")]
    pub active: String,
    #[serde(default)]
    pub custom: Vec<Strategy>,
}

fn default_active() -> String {
    "harry-browne".into()
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            active: default_active(),
            custom: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        if self.history.file.trim().is_empty() {
            return Err(Error::Config("history file must not be empty".into()));
        }
        let mut ids = FxHashSet::default();
        for s in &self.strategy.custom {
            s.validate()?;
            if !ids.insert(s.id.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate custom strategy id: {}",
                    s.id
                )));
            }
            if !s.is_balanced() {
                warn!(
                    "custom strategy {} allocates {:.2}%, not 100%",
                    s.id,
                    s.allocation_total()
                );
            }
        }
        if !self.strategies().iter().any(|s| s.id == self.strategy.active) {
            return Err(Error::UnknownStrategy(self.strategy.active.clone()));
        }
        Ok(())
    }

    /// Full path to the history file.
    pub fn history_path(&self) -> PathBuf {
        Path::new(&self.history.dir).join(&self.history.file)
    }

    /// Presets followed by custom strategies; a custom entry replaces the
    /// preset with the same id in place.
    pub fn strategies(&self) -> Vec<Strategy> {
        let mut all = presets();
        for custom in &self.strategy.custom {
            match all.iter_mut().find(|s| s.id == custom.id) {
                Some(slot) => *slot = custom.clone(),
                None => all.push(custom.clone()),
            }
        }
        all
    }

    /// Look up any configured strategy by id.
    pub fn strategy(&self, id: &str) -> Result<Strategy> {
        self.strategies()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownStrategy(id.to_string()))
    }

    /// The strategy named by `[strategy] active`.
    pub fn active_strategy(&self) -> Result<Strategy> {
        self.strategy(&self.strategy.active)
    }
}
