use crate::banner::{ConfigViolation, Rarity};
use thiserror::Error;

/// One or more field-level violations found while validating a banner.
///
/// Raised only by the validator, never at draw time.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Banner config invalid ({} violation(s)): {}", .violations.len(), summarize(.violations))]
pub struct ConfigValidationError {
    pub violations: Vec<ConfigViolation>,
}

impl ConfigValidationError {
    pub fn new(violations: Vec<ConfigViolation>) -> Self {
        Self { violations }
    }

    /// Field paths of every violation, in discovery order
    pub fn fields(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.field()).collect()
    }
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ")
}

/// Which subset of a tier the selector was asked to pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    RateUp,
    Standard,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolKind::RateUp => write!(f, "rate-up"),
            PoolKind::Standard => write!(f, "standard"),
        }
    }
}

/// The selector was handed an empty pool. Validation makes this unreachable,
/// so hitting it means an invariant was broken upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Empty {kind} pool for {rarity}")]
pub struct EmptyPoolError {
    pub rarity: Rarity,
    pub kind: PoolKind,
}

/// A supplied `PityState` that no sequence of draws could have produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("{rarity} pity counter {count} is at or beyond hard pity {hard_pity_pull}")]
    CounterBeyondHardPity { rarity: Rarity, count: u32, hard_pity_pull: u32 },

    #[error("{rarity} guarantee flag is set but the banner has no rate-up items for that tier")]
    GuaranteeWithoutRateUp { rarity: Rarity },

    #[error("Malformed pity state: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum GachaError {
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    #[error(transparent)]
    EmptyPool(#[from] EmptyPoolError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    #[error("Pull count must be at least 1, got {0}")]
    InvalidPullCount(u32),

    #[error("Pull count {count} exceeds the batch limit of {max}")]
    PullCountExceedsLimit { count: u32, max: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GachaError {
    /// Errors the caller can fix by changing its input, as opposed to engine defects.
    pub fn is_caller_error(&self) -> bool {
        match self {
            GachaError::Config(_) => true,
            GachaError::InvalidState(_) => true,
            GachaError::InvalidPullCount(_) => true,
            GachaError::PullCountExceedsLimit { .. } => true,
            GachaError::Serialization(_) => true,
            GachaError::Yaml(_) => true,
            GachaError::EmptyPool(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GachaError>;
