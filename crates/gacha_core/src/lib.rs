//! # gacha_core - Deterministic Gacha Draw Engine
//!
//! Banner configuration, pity state machine and weighted item selection for
//! gacha draws, plus the pieces around it: validation, Monte Carlo checks,
//! ledger persistence and a JSON API for game clients.
//!
//! ## Features
//! - Pure draws: `(banner, state, random source) -> (result, next state)`
//! - Soft and hard pity per tier, 50/50 rate-up with carry-over guarantee
//! - Same seed = same result
//! - Banner validation that reports every violation at once

pub mod api;
pub mod banner;
pub mod error;
pub mod gacha;
pub mod ledger;
pub mod simulation;

// Re-export main API functions
pub use api::{banner_schema_json, draw_json, rate_table_json, validate_banner_json};

pub use banner::{
    BannerConfig, BannerValidator, CatalogItem, ConfigViolation, ItemCatalog, ItemId, ItemType,
    Rarity, ValidatedConfig,
};
pub use error::{ConfigValidationError, EmptyPoolError, GachaError, InvalidStateError, Result};
pub use gacha::{
    draw, seeded, BatchOutcome, DrawEngine, DrawResult, PityState, RandomSource, SequenceSource,
    TEN_PULL,
};
pub use ledger::{GachaLedger, LedgerStore, PullStatistics, StoreError};
pub use simulation::{simulate, SimulationConfig, SimulationReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
