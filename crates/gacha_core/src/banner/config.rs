//! Banner configuration model
//!
//! Mirrors the authored banner file: probability settings, per-tier pity
//! progression, and the item-id sets that make up each pool. Everything here
//! is plain data; `BannerValidator` turns it into a `ValidatedConfig`.

use crate::error::GachaError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

/// Item identifier as it appears in banner files and the catalog
pub type ItemId = String;

/// Rarity tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Rarity {
    #[serde(rename = "3star")]
    ThreeStar = 3,
    #[serde(rename = "4star")]
    FourStar = 4,
    #[serde(rename = "5star")]
    FiveStar = 5,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::FiveStar, Rarity::FourStar, Rarity::ThreeStar];

    /// Key used in banner files ("5star", "4star", "3star")
    pub fn key(&self) -> &'static str {
        match self {
            Rarity::FiveStar => "5star",
            Rarity::FourStar => "4star",
            Rarity::ThreeStar => "3star",
        }
    }

    /// Tiers that carry pity counters and rate-up pools
    pub fn has_pity(&self) -> bool {
        !matches!(self, Rarity::ThreeStar)
    }

    pub fn from_stars(stars: u8) -> Option<Self> {
        match stars {
            3 => Some(Rarity::ThreeStar),
            4 => Some(Rarity::FourStar),
            5 => Some(Rarity::FiveStar),
            _ => None,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

fn default_config_group() -> String {
    "default".to_string()
}

fn default_enable() -> bool {
    true
}

fn default_hard_pity_rate() -> f64 {
    1.0
}

/// Full banner definition as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BannerConfig {
    /// Stable banner id; derived from group and name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_id: Option<String>,
    pub name: String,
    /// Item table the banner draws its catalog from
    #[serde(default = "default_config_group")]
    pub config_group: String,
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub probability_settings: ProbabilitySettings,
    pub probability_progression: ProbabilityProgression,
    #[serde(default)]
    pub rate_up_item_ids: RateUpItemIds,
    #[serde(default)]
    pub included_item_ids: IncludedItemIds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProbabilitySettings {
    pub base_5star_rate: f64,
    pub base_4star_rate: f64,
    /// Optional in authored files; checked against the other two when present.
    /// The runtime value is always derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_3star_rate: Option<f64>,
    pub up_5star_rate: f64,
    pub up_4star_rate: f64,
    /// Chance that a 4★ pick comes from the character sub-pool (needs a catalog)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_star_character_rate: Option<f64>,
}

impl ProbabilitySettings {
    /// 3★ rate derived from the other two tiers, floored at 0
    pub fn derived_3star_rate(&self) -> f64 {
        (1.0 - self.base_5star_rate - self.base_4star_rate).max(0.0)
    }

    pub fn base_rate(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::FiveStar => self.base_5star_rate,
            Rarity::FourStar => self.base_4star_rate,
            Rarity::ThreeStar => self.derived_3star_rate(),
        }
    }

    /// Rate-up share for a pity tier; 3★ has no rate-up concept
    pub fn up_rate(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::FiveStar => self.up_5star_rate,
            Rarity::FourStar => self.up_4star_rate,
            Rarity::ThreeStar => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProbabilityProgression {
    #[serde(rename = "5star")]
    pub five_star: TierProgression,
    #[serde(rename = "4star")]
    pub four_star: TierProgression,
}

impl ProbabilityProgression {
    /// Progression for a pity tier. 3★ has none.
    pub fn tier(&self, rarity: Rarity) -> Option<&TierProgression> {
        match rarity {
            Rarity::FiveStar => Some(&self.five_star),
            Rarity::FourStar => Some(&self.four_star),
            Rarity::ThreeStar => None,
        }
    }
}

/// Pity rules for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TierProgression {
    pub hard_pity_pull: u32,
    #[serde(default = "default_hard_pity_rate")]
    pub hard_pity_rate: f64,
    #[serde(default)]
    pub soft_pity: Vec<SoftPityInterval>,
}

impl TierProgression {
    /// Whether landing on hard pity is a certain hit
    pub fn hard_pity_is_certain(&self) -> bool {
        self.hard_pity_rate >= 1.0
    }
}

/// Additive escalation applied from `start_pull` onward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SoftPityInterval {
    pub start_pull: u32,
    pub end_pull: u32,
    pub increment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateUpItemIds {
    #[serde(rename = "5star", default)]
    pub five_star: BTreeSet<ItemId>,
    #[serde(rename = "4star", default)]
    pub four_star: BTreeSet<ItemId>,
}

impl RateUpItemIds {
    pub fn tier(&self, rarity: Rarity) -> Option<&BTreeSet<ItemId>> {
        match rarity {
            Rarity::FiveStar => Some(&self.five_star),
            Rarity::FourStar => Some(&self.four_star),
            Rarity::ThreeStar => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncludedItemIds {
    #[serde(rename = "5star", default)]
    pub five_star: BTreeSet<ItemId>,
    #[serde(rename = "4star", default)]
    pub four_star: BTreeSet<ItemId>,
    #[serde(rename = "3star", default)]
    pub three_star: BTreeSet<ItemId>,
}

impl IncludedItemIds {
    pub fn tier(&self, rarity: Rarity) -> &BTreeSet<ItemId> {
        match rarity {
            Rarity::FiveStar => &self.five_star,
            Rarity::FourStar => &self.four_star,
            Rarity::ThreeStar => &self.three_star,
        }
    }
}

impl BannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, GachaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, GachaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, GachaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Explicit id, or the first 12 hex chars of SHA-256 over "group/name"
    pub fn resolved_id(&self) -> String {
        match &self.banner_id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => derive_banner_id(&self.config_group, &self.name),
        }
    }

    /// Rate-up set for a tier; empty for 3★
    pub fn rate_up(&self, rarity: Rarity) -> BTreeSet<ItemId> {
        self.rate_up_item_ids.tier(rarity).cloned().unwrap_or_default()
    }

    /// Included ids minus the tier's rate-up ids
    pub fn standard_pool(&self, rarity: Rarity) -> BTreeSet<ItemId> {
        let included = self.included_item_ids.tier(rarity);
        match self.rate_up_item_ids.tier(rarity) {
            Some(up) => included.difference(up).cloned().collect(),
            None => included.clone(),
        }
    }
}

/// Derive a banner id from its group and name
pub fn derive_banner_id(config_group: &str, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}/{}", config_group, name).as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}
