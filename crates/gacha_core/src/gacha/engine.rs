//! Draw engine
//!
//! Two pity automata run side by side, one for 5★ and one for 4★. Each holds
//! a pull counter and a guaranteed-UP flag inside `PityState`. A single
//! uniform sample `r` decides the tier using cumulative bands:
//!
//! - `r < p5`                 → 5★
//! - `r < min(p5 + p4, 1)`    → 4★
//! - otherwise                → 3★
//!
//! With no pity active the tier odds equal the base rates exactly; at 4★
//! hard pity the 4★ band absorbs all mass the 5★ band leaves over.
//!
//! The engine is pure: it holds only borrowed configuration, never state
//! between calls, and never performs I/O.

use super::pity::PityState;
use super::random::RandomSource;
use super::selector::ItemSelector;
use crate::banner::{ItemCatalog, ItemId, Rarity, TierProgression, ValidatedConfig};
use crate::error::{EmptyPoolError, GachaError, PoolKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of a single pull
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct DrawResult {
    pub item_id: ItemId,
    pub rarity: Rarity,
    pub is_rate_up: bool,
}

/// Effective hit rate for a tier at a 1-based pull index.
///
/// Below hard pity: base rate plus every soft-pity increment whose interval
/// has started, clamped to [0, 1]. At or past hard pity: `hard_pity_rate`.
pub fn effective_rate(base_rate: f64, progression: &TierProgression, pull: u32) -> f64 {
    if pull >= progression.hard_pity_pull {
        return progression.hard_pity_rate.clamp(0.0, 1.0);
    }

    let escalation: f64 = progression
        .soft_pity
        .iter()
        .filter(|interval| interval.start_pull <= pull)
        .map(|interval| interval.increment)
        .sum();

    (base_rate + escalation).clamp(0.0, 1.0)
}

/// Effective rate for every pull index `1..=hard_pity_pull` of a pity tier.
/// Empty for 3★.
pub fn rate_table(config: &ValidatedConfig, rarity: Rarity) -> Vec<f64> {
    let Some(progression) = config.progression(rarity) else {
        return Vec::new();
    };
    let base = config.base_rate(rarity);
    (1..=progression.hard_pity_pull).map(|pull| effective_rate(base, progression, pull)).collect()
}

/// Stateless draw engine bound to one validated banner
#[derive(Debug, Clone, Copy)]
pub struct DrawEngine<'a> {
    config: &'a ValidatedConfig,
    selector: ItemSelector<'a>,
}

impl<'a> DrawEngine<'a> {
    pub fn new(config: &'a ValidatedConfig) -> Self {
        Self { config, selector: ItemSelector::new() }
    }

    /// Enable the 4★ character/weapon split using the catalog's item types
    pub fn with_catalog(config: &'a ValidatedConfig, catalog: &'a ItemCatalog) -> Self {
        Self {
            config,
            selector: ItemSelector::with_catalog(catalog, config.four_star_character_rate()),
        }
    }

    pub fn config(&self) -> &'a ValidatedConfig {
        self.config
    }

    /// Effective 5★ or 4★ rate for the next pull from `state`
    pub fn next_rate(&self, state: &PityState, rarity: Rarity) -> f64 {
        match self.config.progression(rarity) {
            Some(progression) => {
                effective_rate(self.config.base_rate(rarity), progression, state.next_pull(rarity))
            }
            None => self.config.base_rate(rarity),
        }
    }

    /// Perform one pull. The input state is checked, then left untouched; the
    /// advanced state is returned alongside the result.
    pub fn draw<R: RandomSource + ?Sized>(
        &self,
        state: &PityState,
        rng: &mut R,
    ) -> Result<(DrawResult, PityState), GachaError> {
        state.validate_for(self.config).map_err(|e| {
            log::warn!("Rejected pity state for banner '{}': {}", self.config.banner_id(), e);
            e
        })?;
        self.draw_unchecked(state, rng).map_err(GachaError::from)
    }

    /// One pull from a state already known to be valid
    pub(crate) fn draw_unchecked<R: RandomSource + ?Sized>(
        &self,
        state: &PityState,
        rng: &mut R,
    ) -> Result<(DrawResult, PityState), EmptyPoolError> {
        let p5 = self.next_rate(state, Rarity::FiveStar);
        let p4 = self.next_rate(state, Rarity::FourStar);

        let r = rng.next_f64();
        let rarity = if r < p5 {
            Rarity::FiveStar
        } else if r < (p5 + p4).min(1.0) {
            Rarity::FourStar
        } else {
            Rarity::ThreeStar
        };

        let mut next = *state;
        next.record_hit(rarity);

        let (item_id, is_rate_up) = self.resolve_item(rarity, &mut next, rng).map_err(|e| {
            log::error!(
                "Draw defect on banner '{}': {} (validation should have caught this)",
                self.config.banner_id(),
                e
            );
            e
        })?;

        if rarity != Rarity::ThreeStar {
            log::debug!(
                "{} hit on banner '{}': {} (rate-up: {}, pull {}, r={:.5}, p5={:.5}, p4={:.5})",
                rarity,
                self.config.banner_id(),
                item_id,
                is_rate_up,
                state.next_pull(rarity),
                r,
                p5,
                p4
            );
        }

        Ok((DrawResult { item_id, rarity, is_rate_up }, next))
    }

    /// Settle rate-up vs standard for a hit and pick the item.
    /// Updates the tier's guarantee flag in `state`.
    fn resolve_item<R: RandomSource + ?Sized>(
        &self,
        rarity: Rarity,
        state: &mut PityState,
        rng: &mut R,
    ) -> Result<(ItemId, bool), EmptyPoolError> {
        let pools = self.config.pools(rarity);

        if !rarity.has_pity() || pools.rate_up.is_empty() {
            let item = self.selector.pick(&pools.standard, rarity, PoolKind::Standard, rng)?;
            return Ok((item.clone(), false));
        }

        let rate_up = if state.is_guaranteed(rarity) {
            true
        } else {
            rng.next_f64() < self.config.up_rate(rarity)
        };
        // Losing the roll guarantees the next hit of this tier
        state.set_guaranteed(rarity, !rate_up);

        let (pool, kind) = if rate_up {
            (&pools.rate_up, PoolKind::RateUp)
        } else {
            (&pools.standard, PoolKind::Standard)
        };
        let item = self.selector.pick(pool, rarity, kind, rng)?;
        Ok((item.clone(), rate_up))
    }
}

/// Single pull against a validated banner without a catalog
pub fn draw<R: RandomSource + ?Sized>(
    config: &ValidatedConfig,
    state: &PityState,
    rng: &mut R,
) -> Result<(DrawResult, PityState), GachaError> {
    DrawEngine::new(config).draw(state, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::{BannerValidator, SoftPityInterval};
    use crate::error::InvalidStateError;
    use crate::gacha::random::{seeded, SequenceSource};
    use crate::test_support::{sample_banner, standard_banner};

    fn validated() -> ValidatedConfig {
        BannerValidator::validate(sample_banner()).unwrap()
    }

    #[test]
    fn test_effective_rate_soft_pity() {
        let progression = TierProgression {
            hard_pity_pull: 80,
            hard_pity_rate: 1.0,
            soft_pity: vec![
                SoftPityInterval { start_pull: 50, end_pull: 59, increment: 0.02 },
                SoftPityInterval { start_pull: 60, end_pull: 79, increment: 0.1 },
            ],
        };
        assert_eq!(effective_rate(0.008, &progression, 1), 0.008);
        assert_eq!(effective_rate(0.008, &progression, 49), 0.008);
        assert!((effective_rate(0.008, &progression, 50) - 0.028).abs() < 1e-12);
        assert!((effective_rate(0.008, &progression, 59) - 0.028).abs() < 1e-12);
        assert!((effective_rate(0.008, &progression, 60) - 0.128).abs() < 1e-12);
        assert_eq!(effective_rate(0.008, &progression, 80), 1.0);
        assert_eq!(effective_rate(0.008, &progression, 95), 1.0);
    }

    #[test]
    fn test_effective_rate_clamps_to_one() {
        let progression = TierProgression {
            hard_pity_pull: 20,
            hard_pity_rate: 1.0,
            soft_pity: vec![
                SoftPityInterval { start_pull: 5, end_pull: 9, increment: 0.7 },
                SoftPityInterval { start_pull: 10, end_pull: 15, increment: 0.7 },
            ],
        };
        assert_eq!(effective_rate(0.1, &progression, 12), 1.0);
    }

    #[test]
    fn test_rate_table_is_non_decreasing() {
        let config = validated();
        let table = rate_table(&config, Rarity::FiveStar);
        assert_eq!(table.len(), 90);
        assert!(table.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*table.last().unwrap(), 1.0);
        assert!(rate_table(&config, Rarity::ThreeStar).is_empty());
    }

    #[test]
    fn test_hard_pity_always_hits() {
        let config = validated();
        let engine = DrawEngine::new(&config);
        let state = PityState { pulls_since_5star: 89, ..Default::default() };

        for seed in 0..200 {
            let mut rng = seeded(seed);
            let (result, next) = engine.draw(&state, &mut rng).unwrap();
            assert_eq!(result.rarity, Rarity::FiveStar);
            assert_eq!(next.pulls_since_5star, 0);
        }
    }

    #[test]
    fn test_four_star_hard_pity_fills_remaining_mass() {
        let config = validated();
        let engine = DrawEngine::new(&config);
        let state = PityState { pulls_since_5star: 3, pulls_since_4star: 9, ..Default::default() };

        // Just above the 5★ band: must still be a 4★ at 4★ hard pity
        let mut source = SequenceSource::new(vec![0.999, 0.1, 0.0]);
        let (result, next) = engine.draw(&state, &mut source).unwrap();
        assert_eq!(result.rarity, Rarity::FourStar);
        assert_eq!(next.pulls_since_4star, 0);
        assert_eq!(next.pulls_since_5star, 4);
    }

    #[test]
    fn test_five_star_hit_keeps_four_star_counter() {
        let config = validated();
        let engine = DrawEngine::new(&config);
        let state = PityState { pulls_since_5star: 10, pulls_since_4star: 6, ..Default::default() };

        // 0.0 < p5 → 5★; up roll 0.0 < 0.5 → rate-up
        let mut source = SequenceSource::new(vec![0.0, 0.0, 0.0]);
        let (result, next) = engine.draw(&state, &mut source).unwrap();
        assert_eq!(result.rarity, Rarity::FiveStar);
        assert!(result.is_rate_up);
        assert_eq!(result.item_id, "nereid");
        assert_eq!(next.pulls_since_5star, 0);
        assert_eq!(next.pulls_since_4star, 6);
        assert!(!next.guaranteed_5star_up);
    }

    #[test]
    fn test_lost_rate_up_sets_guarantee_then_forces_up() {
        let config = validated();
        let engine = DrawEngine::new(&config);

        // 5★ hit, up roll 0.9 loses the 50/50
        let mut source = SequenceSource::new(vec![0.0, 0.9, 0.0]);
        let (first, state) = engine.draw(&PityState::new(), &mut source).unwrap();
        assert_eq!(first.rarity, Rarity::FiveStar);
        assert!(!first.is_rate_up);
        assert_ne!(first.item_id, "nereid");
        assert!(state.guaranteed_5star_up);

        // Next 5★ is forced: the up roll is skipped entirely
        let mut source = SequenceSource::new(vec![0.0, 0.0]);
        let (second, state) = engine.draw(&state, &mut source).unwrap();
        assert!(second.is_rate_up);
        assert_eq!(second.item_id, "nereid");
        assert!(!state.guaranteed_5star_up);
        assert_eq!(source.consumed(), 2);
    }

    #[test]
    fn test_three_star_advances_both_counters() {
        let config = validated();
        let engine = DrawEngine::new(&config);
        let state = PityState { pulls_since_5star: 5, pulls_since_4star: 2, ..Default::default() };

        let mut source = SequenceSource::new(vec![0.5, 0.0]);
        let (result, next) = engine.draw(&state, &mut source).unwrap();
        assert_eq!(result.rarity, Rarity::ThreeStar);
        assert!(!result.is_rate_up);
        assert_eq!((next.pulls_since_5star, next.pulls_since_4star), (6, 3));
        assert_eq!(next.guaranteed_5star_up, state.guaranteed_5star_up);
    }

    #[test]
    fn test_four_star_rate_up_flow() {
        let config = validated();
        let engine = DrawEngine::new(&config);

        // r just inside the 4★ band (p5 = 0.006, p4 = 0.051)
        let mut source = SequenceSource::new(vec![0.03, 0.7, 0.0]);
        let (result, next) = engine.draw(&PityState::new(), &mut source).unwrap();
        assert_eq!(result.rarity, Rarity::FourStar);
        assert!(!result.is_rate_up);
        assert!(next.guaranteed_4star_up);
        assert!(!next.guaranteed_5star_up);
        assert_eq!(next.pulls_since_5star, 1);
    }

    #[test]
    fn test_tier_without_rate_up_never_sets_guarantee() {
        let config = BannerValidator::validate(standard_banner()).unwrap();
        let engine = DrawEngine::new(&config);
        let mut rng = seeded(9);
        let mut state = PityState::new();

        for _ in 0..2000 {
            let (result, next) = engine.draw(&state, &mut rng).unwrap();
            assert!(!result.is_rate_up);
            assert!(!next.guaranteed_5star_up && !next.guaranteed_4star_up);
            state = next;
        }
    }

    #[test]
    fn test_draw_rejects_invalid_state() {
        let config = validated();
        let state = PityState { pulls_since_4star: 10, ..Default::default() };
        let err = draw(&config, &state, &mut seeded(1)).unwrap_err();
        assert!(matches!(
            err,
            GachaError::InvalidState(InvalidStateError::CounterBeyondHardPity {
                rarity: Rarity::FourStar,
                ..
            })
        ));
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let config = validated();
        let engine = DrawEngine::new(&config);
        let state = PityState { pulls_since_5star: 70, ..Default::default() };

        let a = engine.draw(&state, &mut seeded(1234)).unwrap();
        let b = engine.draw(&state, &mut seeded(1234)).unwrap();
        assert_eq!(a, b);
    }
}
