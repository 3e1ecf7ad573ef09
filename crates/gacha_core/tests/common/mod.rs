#![allow(dead_code)]

use gacha_core::banner::{
    BannerConfig, IncludedItemIds, ProbabilityProgression, ProbabilitySettings, RateUpItemIds,
    SoftPityInterval, TierProgression,
};
use std::collections::BTreeSet;

pub fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Banner with the given 5★ odds, a 10-pull 4★ hard pity and small pools
pub fn banner(
    base_5star: f64,
    base_4star: f64,
    hard_pity_5star: u32,
    soft_pity_5star: Vec<SoftPityInterval>,
) -> BannerConfig {
    BannerConfig {
        banner_id: Some("harbor-lights".to_string()),
        name: "Harbor Lights".to_string(),
        config_group: "default".to_string(),
        enable: true,
        probability_settings: ProbabilitySettings {
            base_5star_rate: base_5star,
            base_4star_rate: base_4star,
            base_3star_rate: None,
            up_5star_rate: 0.5,
            up_4star_rate: 0.5,
            four_star_character_rate: None,
        },
        probability_progression: ProbabilityProgression {
            five_star: TierProgression {
                hard_pity_pull: hard_pity_5star,
                hard_pity_rate: 1.0,
                soft_pity: soft_pity_5star,
            },
            four_star: TierProgression { hard_pity_pull: 10, hard_pity_rate: 1.0, soft_pity: vec![] },
        },
        rate_up_item_ids: RateUpItemIds {
            five_star: ids(&["lumen"]),
            four_star: ids(&["buoy", "anchor"]),
        },
        included_item_ids: IncludedItemIds {
            five_star: ids(&["lumen", "tempest", "aurora"]),
            four_star: ids(&["buoy", "anchor", "sail", "rope"]),
            three_star: ids(&["shell", "sand", "driftwood"]),
        },
    }
}

/// 0.6% / 5.1% with soft pity from 74 and hard pity at 90
pub fn live_banner() -> BannerConfig {
    banner(0.006, 0.051, 90, vec![SoftPityInterval { start_pull: 74, end_pull: 89, increment: 0.06 }])
}
