//! Banner definitions: configuration model, item catalog and validation.

pub mod catalog;
pub mod config;
pub mod validation;

pub use catalog::{CatalogItem, ItemCatalog, ItemType};
pub use config::{
    derive_banner_id, BannerConfig, IncludedItemIds, ItemId, ProbabilityProgression,
    ProbabilitySettings, Rarity, RateUpItemIds, SoftPityInterval, TierProgression,
};
pub use validation::{BannerValidator, ConfigViolation, TierPools, ValidatedConfig, RATE_SUM_TOLERANCE};
