//! Error types for the rebalancing engine.

use std::path::PathBuf;

/// Malformed engine input.
///
/// Raised before any computation runs so that a bad holding never turns into
/// NaN ratios or negative trades further down the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A holding's money value is below zero.
    #[error("holding {id}: value must be non-negative, got {value}")]
    NegativeValue { id: String, value: f64 },

    /// A numeric field is NaN or infinite.
    #[error("{owner}: {field} must be finite")]
    NonFinite { owner: String, field: &'static str },

    /// A strategy target percentage is below zero.
    #[error("strategy {id}: target for {class} must be non-negative, got {value}")]
    NegativeTarget {
        id: String,
        class: &'static str,
        value: f64,
    },

    /// Holdings and strategies need a stable identifier.
    #[error("{kind} id must not be empty")]
    EmptyId { kind: &'static str },

    /// Two holdings share an id, so trades could not be joined back to one.
    #[error("duplicate holding id: {0}")]
    DuplicateId(String),

    /// Asset class name outside {stock, bond, gold, cash}.
    #[error("unknown asset class: {0:?}")]
    UnknownAssetClass(String),
}

/// All errors that can occur while planning or recording a rebalance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("history store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rebalance blocked by {0} discipline rule(s)")]
    DisciplineBlocked(usize),

    #[error("nothing to rebalance: plan has no trades")]
    NothingToRebalance,
}

pub type Result<T> = std::result::Result<T, Error>;
