//! Banner validation
//!
//! Collects every violation in a banner (rather than stopping at the first)
//! so an authoring UI can highlight all offending fields at once. A banner
//! that passes is wrapped in `ValidatedConfig`, the only form the draw engine
//! accepts.

use super::catalog::ItemCatalog;
use super::config::{BannerConfig, ItemId, Rarity, TierProgression};
use crate::error::ConfigValidationError;
use std::collections::BTreeMap;
use std::fmt;

/// Allowed deviation of the base-rate sum from 1.0
pub const RATE_SUM_TOLERANCE: f64 = 0.01;

/// Float noise allowed before the derived 3★ rate counts as negative
const DERIVED_RATE_EPSILON: f64 = 1e-9;

/// A single field-level problem in a banner
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigViolation {
    /// Probability outside [0, 1] (or NaN)
    RateOutOfRange { field: String, value: f64 },

    /// base_5star_rate + base_4star_rate leaves no room for 3★
    RateSumExceedsOne { sum: f64 },

    /// Explicit base_3star_rate does not complete the other two to 1
    RateSumMismatch { sum: f64 },

    /// hard_pity_pull must be at least 1
    InvalidHardPityPull { rarity: Rarity },

    /// Interval with start_pull == 0 or start_pull >= end_pull
    MalformedSoftPity { rarity: Rarity, index: usize, start_pull: u32, end_pull: u32 },

    /// Interval starts at or before the previous interval's end
    OverlappingSoftPity { rarity: Rarity, index: usize, previous_end: u32, start_pull: u32 },

    /// hard_pity_pull must exceed every soft-pity end
    HardPityNotBeyondSoftPity { rarity: Rarity, hard_pity_pull: u32, end_pull: u32 },

    /// A tier that can be drawn has nothing to drop
    EmptyPool { rarity: Rarity },

    /// A failed rate-up roll would have no standard item to land on
    EmptyStandardPool { rarity: Rarity },

    /// Rate-up id missing from the tier's included ids
    RateUpNotIncluded { rarity: Rarity, item_id: ItemId },

    /// Same id listed under two tiers
    DuplicateItem { item_id: ItemId, first: Rarity, second: Rarity },

    /// Id not present in the supplied catalog
    UnknownItem { rarity: Rarity, item_id: ItemId },

    /// Catalog rarity differs from the tier the id is listed under
    RarityMismatch { item_id: ItemId, listed: Rarity, actual: Rarity },
}

impl ConfigViolation {
    /// Path of the offending field, in banner-file notation
    pub fn field(&self) -> String {
        match self {
            ConfigViolation::RateOutOfRange { field, .. } => field.clone(),
            ConfigViolation::RateSumExceedsOne { .. } => {
                "probability_settings.base_4star_rate".to_string()
            }
            ConfigViolation::RateSumMismatch { .. } => {
                "probability_settings.base_3star_rate".to_string()
            }
            ConfigViolation::InvalidHardPityPull { rarity } => {
                format!("probability_progression.{}.hard_pity_pull", rarity)
            }
            ConfigViolation::MalformedSoftPity { rarity, index, .. }
            | ConfigViolation::OverlappingSoftPity { rarity, index, .. } => {
                format!("probability_progression.{}.soft_pity[{}]", rarity, index)
            }
            ConfigViolation::HardPityNotBeyondSoftPity { rarity, .. } => {
                format!("probability_progression.{}.hard_pity_pull", rarity)
            }
            ConfigViolation::EmptyPool { rarity } | ConfigViolation::EmptyStandardPool { rarity } => {
                format!("included_item_ids.{}", rarity)
            }
            ConfigViolation::RateUpNotIncluded { rarity, .. } => {
                format!("rate_up_item_ids.{}", rarity)
            }
            ConfigViolation::DuplicateItem { second, .. } => {
                format!("included_item_ids.{}", second)
            }
            ConfigViolation::UnknownItem { rarity, .. } => format!("included_item_ids.{}", rarity),
            ConfigViolation::RarityMismatch { listed, .. } => {
                format!("included_item_ids.{}", listed)
            }
        }
    }

    /// Short machine-readable name of the broken constraint
    pub fn constraint(&self) -> &'static str {
        match self {
            ConfigViolation::RateOutOfRange { .. } => "rate_range",
            ConfigViolation::RateSumExceedsOne { .. } => "rate_sum",
            ConfigViolation::RateSumMismatch { .. } => "rate_sum",
            ConfigViolation::InvalidHardPityPull { .. } => "hard_pity_min",
            ConfigViolation::MalformedSoftPity { .. } => "soft_pity_bounds",
            ConfigViolation::OverlappingSoftPity { .. } => "soft_pity_order",
            ConfigViolation::HardPityNotBeyondSoftPity { .. } => "hard_pity_after_soft_pity",
            ConfigViolation::EmptyPool { .. } => "pool_non_empty",
            ConfigViolation::EmptyStandardPool { .. } => "standard_pool_non_empty",
            ConfigViolation::RateUpNotIncluded { .. } => "rate_up_subset",
            ConfigViolation::DuplicateItem { .. } => "item_unique_tier",
            ConfigViolation::UnknownItem { .. } => "catalog_known",
            ConfigViolation::RarityMismatch { .. } => "catalog_rarity",
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigViolation::RateOutOfRange { field, value } => {
                write!(f, "{} = {} must be within [0, 1]", field, value)
            }
            ConfigViolation::RateSumExceedsOne { sum } => {
                write!(f, "5★ and 4★ base rates sum to {:.4}, leaving a negative 3★ rate", sum)
            }
            ConfigViolation::RateSumMismatch { sum } => {
                write!(
                    f,
                    "Base rates sum to {:.4}; must equal 1 within {}",
                    sum, RATE_SUM_TOLERANCE
                )
            }
            ConfigViolation::InvalidHardPityPull { rarity } => {
                write!(f, "{} hard_pity_pull must be at least 1", rarity)
            }
            ConfigViolation::MalformedSoftPity { rarity, index, start_pull, end_pull } => {
                write!(
                    f,
                    "{} soft pity interval {} ({}..{}) needs 1 <= start_pull < end_pull",
                    rarity, index, start_pull, end_pull
                )
            }
            ConfigViolation::OverlappingSoftPity { rarity, index, previous_end, start_pull } => {
                write!(
                    f,
                    "{} soft pity interval {} starts at {} but the previous one ends at {}",
                    rarity, index, start_pull, previous_end
                )
            }
            ConfigViolation::HardPityNotBeyondSoftPity { rarity, hard_pity_pull, end_pull } => {
                write!(
                    f,
                    "{} hard_pity_pull {} must exceed soft pity end_pull {}",
                    rarity, hard_pity_pull, end_pull
                )
            }
            ConfigViolation::EmptyPool { rarity } => {
                write!(f, "{} can be drawn but included_item_ids is empty", rarity)
            }
            ConfigViolation::EmptyStandardPool { rarity } => {
                write!(
                    f,
                    "{} rate-up rate is below 1 but every included item is rate-up",
                    rarity
                )
            }
            ConfigViolation::RateUpNotIncluded { rarity, item_id } => {
                write!(f, "{} rate-up item '{}' is not in included_item_ids", rarity, item_id)
            }
            ConfigViolation::DuplicateItem { item_id, first, second } => {
                write!(f, "Item '{}' is listed under both {} and {}", item_id, first, second)
            }
            ConfigViolation::UnknownItem { rarity, item_id } => {
                write!(f, "{} item '{}' is not in the catalog", rarity, item_id)
            }
            ConfigViolation::RarityMismatch { item_id, listed, actual } => {
                write!(f, "Item '{}' is listed as {} but the catalog says {}", item_id, listed, actual)
            }
        }
    }
}

/// Item pools of one tier, precomputed in stable (sorted) order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierPools {
    pub rate_up: Vec<ItemId>,
    pub standard: Vec<ItemId>,
}

impl TierPools {
    pub fn is_empty(&self) -> bool {
        self.rate_up.is_empty() && self.standard.is_empty()
    }
}

/// A banner that passed validation. Only constructible through `BannerValidator`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    config: BannerConfig,
    banner_id: String,
    five_star: TierPools,
    four_star: TierPools,
    three_star: TierPools,
}

impl ValidatedConfig {
    pub fn config(&self) -> &BannerConfig {
        &self.config
    }

    pub fn banner_id(&self) -> &str {
        &self.banner_id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enable
    }

    pub fn pools(&self, rarity: Rarity) -> &TierPools {
        match rarity {
            Rarity::FiveStar => &self.five_star,
            Rarity::FourStar => &self.four_star,
            Rarity::ThreeStar => &self.three_star,
        }
    }

    /// Whether the tier has any rate-up items
    pub fn has_rate_up(&self, rarity: Rarity) -> bool {
        !self.pools(rarity).rate_up.is_empty()
    }

    pub fn base_rate(&self, rarity: Rarity) -> f64 {
        self.config.probability_settings.base_rate(rarity)
    }

    pub fn up_rate(&self, rarity: Rarity) -> f64 {
        self.config.probability_settings.up_rate(rarity)
    }

    pub fn progression(&self, rarity: Rarity) -> Option<&TierProgression> {
        self.config.probability_progression.tier(rarity)
    }

    pub fn four_star_character_rate(&self) -> Option<f64> {
        self.config.probability_settings.four_star_character_rate
    }
}

/// Banner validation utility
pub struct BannerValidator;

impl BannerValidator {
    /// Validate a banner on its own
    pub fn validate(config: BannerConfig) -> Result<ValidatedConfig, ConfigValidationError> {
        let violations = Self::collect_violations(&config);
        Self::finish(config, violations)
    }

    /// Validate a banner and cross-check its ids against a catalog
    pub fn validate_with_catalog(
        config: BannerConfig,
        catalog: &ItemCatalog,
    ) -> Result<ValidatedConfig, ConfigValidationError> {
        let mut violations = Self::collect_violations(&config);
        violations.extend(Self::check_catalog(&config, catalog));
        Self::finish(config, violations)
    }

    /// All violations of a banner, without consuming it
    pub fn collect_violations(config: &BannerConfig) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        Self::check_rates(config, &mut violations);
        for rarity in [Rarity::FiveStar, Rarity::FourStar] {
            if let Some(progression) = config.probability_progression.tier(rarity) {
                Self::check_progression(rarity, progression, &mut violations);
            }
        }
        Self::check_pools(config, &mut violations);
        violations
    }

    fn finish(
        config: BannerConfig,
        violations: Vec<ConfigViolation>,
    ) -> Result<ValidatedConfig, ConfigValidationError> {
        if !violations.is_empty() {
            log::debug!(
                "Banner '{}' rejected with {} violation(s)",
                config.name,
                violations.len()
            );
            return Err(ConfigValidationError::new(violations));
        }

        let pools = |rarity: Rarity| TierPools {
            rate_up: config.rate_up(rarity).into_iter().collect(),
            standard: config.standard_pool(rarity).into_iter().collect(),
        };

        Ok(ValidatedConfig {
            banner_id: config.resolved_id(),
            five_star: pools(Rarity::FiveStar),
            four_star: pools(Rarity::FourStar),
            three_star: pools(Rarity::ThreeStar),
            config,
        })
    }

    fn check_rate(field: &str, value: f64, violations: &mut Vec<ConfigViolation>) {
        if !(0.0..=1.0).contains(&value) {
            violations.push(ConfigViolation::RateOutOfRange { field: field.to_string(), value });
        }
    }

    fn check_rates(config: &BannerConfig, violations: &mut Vec<ConfigViolation>) {
        let settings = &config.probability_settings;
        Self::check_rate("probability_settings.base_5star_rate", settings.base_5star_rate, violations);
        Self::check_rate("probability_settings.base_4star_rate", settings.base_4star_rate, violations);
        Self::check_rate("probability_settings.up_5star_rate", settings.up_5star_rate, violations);
        Self::check_rate("probability_settings.up_4star_rate", settings.up_4star_rate, violations);
        if let Some(rate) = settings.four_star_character_rate {
            Self::check_rate("probability_settings.four_star_character_rate", rate, violations);
        }

        let pity_sum = settings.base_5star_rate + settings.base_4star_rate;
        // The 3★ rate is always derived from these two, so no tolerance applies here
        if pity_sum > 1.0 + DERIVED_RATE_EPSILON {
            violations.push(ConfigViolation::RateSumExceedsOne { sum: pity_sum });
        }

        if let Some(three_star) = settings.base_3star_rate {
            Self::check_rate("probability_settings.base_3star_rate", three_star, violations);
            let sum = pity_sum + three_star;
            if (sum - 1.0).abs() > RATE_SUM_TOLERANCE {
                violations.push(ConfigViolation::RateSumMismatch { sum });
            }
        }

        for rarity in [Rarity::FiveStar, Rarity::FourStar] {
            if let Some(progression) = config.probability_progression.tier(rarity) {
                Self::check_rate(
                    &format!("probability_progression.{}.hard_pity_rate", rarity),
                    progression.hard_pity_rate,
                    violations,
                );
                for (index, interval) in progression.soft_pity.iter().enumerate() {
                    Self::check_rate(
                        &format!("probability_progression.{}.soft_pity[{}].increment", rarity, index),
                        interval.increment,
                        violations,
                    );
                }
            }
        }
    }

    fn check_progression(
        rarity: Rarity,
        progression: &TierProgression,
        violations: &mut Vec<ConfigViolation>,
    ) {
        if progression.hard_pity_pull == 0 {
            violations.push(ConfigViolation::InvalidHardPityPull { rarity });
        }

        let mut previous_end: Option<u32> = None;
        for (index, interval) in progression.soft_pity.iter().enumerate() {
            if interval.start_pull == 0 || interval.start_pull >= interval.end_pull {
                violations.push(ConfigViolation::MalformedSoftPity {
                    rarity,
                    index,
                    start_pull: interval.start_pull,
                    end_pull: interval.end_pull,
                });
            }

            if let Some(end) = previous_end {
                if interval.start_pull <= end {
                    violations.push(ConfigViolation::OverlappingSoftPity {
                        rarity,
                        index,
                        previous_end: end,
                        start_pull: interval.start_pull,
                    });
                }
            }

            if progression.hard_pity_pull <= interval.end_pull {
                violations.push(ConfigViolation::HardPityNotBeyondSoftPity {
                    rarity,
                    hard_pity_pull: progression.hard_pity_pull,
                    end_pull: interval.end_pull,
                });
            }

            previous_end = Some(previous_end.map_or(interval.end_pull, |e| e.max(interval.end_pull)));
        }
    }

    /// Whether a draw can ever land on this tier
    fn is_reachable(config: &BannerConfig, rarity: Rarity) -> bool {
        let base = config.probability_settings.base_rate(rarity);
        match config.probability_progression.tier(rarity) {
            Some(progression) => {
                base > 0.0
                    || progression.hard_pity_rate > 0.0
                    || progression.soft_pity.iter().any(|interval| interval.increment > 0.0)
            }
            None => base > 0.0,
        }
    }

    fn check_pools(config: &BannerConfig, violations: &mut Vec<ConfigViolation>) {
        let mut seen: BTreeMap<&str, Rarity> = BTreeMap::new();

        for rarity in Rarity::ALL {
            let included = config.included_item_ids.tier(rarity);

            if included.is_empty() && Self::is_reachable(config, rarity) {
                violations.push(ConfigViolation::EmptyPool { rarity });
            }

            for item_id in included {
                if let Some(first) = seen.insert(item_id.as_str(), rarity) {
                    violations.push(ConfigViolation::DuplicateItem {
                        item_id: item_id.clone(),
                        first,
                        second: rarity,
                    });
                }
            }

            let Some(rate_up) = config.rate_up_item_ids.tier(rarity) else {
                continue;
            };

            for item_id in rate_up.difference(included) {
                violations.push(ConfigViolation::RateUpNotIncluded {
                    rarity,
                    item_id: item_id.clone(),
                });
            }

            let up_rate = config.probability_settings.up_rate(rarity);
            if !rate_up.is_empty()
                && !included.is_empty()
                && up_rate < 1.0
                && config.standard_pool(rarity).is_empty()
            {
                violations.push(ConfigViolation::EmptyStandardPool { rarity });
            }
        }
    }

    fn check_catalog(config: &BannerConfig, catalog: &ItemCatalog) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        for rarity in Rarity::ALL {
            for item_id in config.included_item_ids.tier(rarity) {
                match catalog.get(item_id) {
                    None => violations.push(ConfigViolation::UnknownItem {
                        rarity,
                        item_id: item_id.clone(),
                    }),
                    Some(item) if item.rarity != rarity => {
                        violations.push(ConfigViolation::RarityMismatch {
                            item_id: item_id.clone(),
                            listed: rarity,
                            actual: item.rarity,
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        violations
    }
}
