//! Closed-form pity math
//!
//! The 5★ automaton depends only on its own counter (4★ hits advance it like
//! misses), so the long-run 5★ frequency is the reciprocal of the expected
//! number of pulls between 5★ hits.

use crate::banner::{Rarity, TierProgression, ValidatedConfig};
use crate::gacha::effective_rate;

/// Expected pulls until a hit, starting from a zero counter.
///
/// Returns `f64::INFINITY` when the tier can stall forever (hard pity rate 0
/// with survival left at hard pity).
pub fn expected_pulls_per_hit(base_rate: f64, progression: &TierProgression) -> f64 {
    let hard = progression.hard_pity_pull.max(1);

    // survival = P(no hit in pulls 1..k)
    let mut survival = 1.0;
    let mut expected = 0.0;
    for pull in 1..hard {
        expected += survival;
        survival *= 1.0 - effective_rate(base_rate, progression, pull);
    }

    // From hard pity onward the rate is constant: geometric tail
    let tail_rate = effective_rate(base_rate, progression, hard);
    if survival == 0.0 {
        expected
    } else if tail_rate <= 0.0 {
        f64::INFINITY
    } else {
        expected + survival / tail_rate
    }
}

/// Long-run 5★ frequency including soft and hard pity
pub fn expected_five_star_rate(config: &ValidatedConfig) -> f64 {
    let Some(progression) = config.progression(Rarity::FiveStar) else {
        return config.base_rate(Rarity::FiveStar);
    };
    let expected = expected_pulls_per_hit(config.base_rate(Rarity::FiveStar), progression);
    if expected.is_finite() && expected > 0.0 {
        1.0 / expected
    } else {
        0.0
    }
}

/// Probability that the 5★ lands exactly on each pull index `1..=hard_pity_pull`,
/// starting from a zero counter.
pub fn five_star_pull_distribution(config: &ValidatedConfig) -> Vec<f64> {
    let Some(progression) = config.progression(Rarity::FiveStar) else {
        return Vec::new();
    };
    let base = config.base_rate(Rarity::FiveStar);
    let mut survival = 1.0;
    (1..=progression.hard_pity_pull)
        .map(|pull| {
            let rate = effective_rate(base, progression, pull);
            let hit = survival * rate;
            survival *= 1.0 - rate;
            hit
        })
        .collect()
}
