//! Multi-pull batches (e.g. a ten-pull)
//!
//! A batch is a strict left fold of single draws: each draw commits its state
//! transition before the next is computed. Inputs are checked up front so a
//! bad state or count fails the whole batch before any draw happens.

use super::engine::{DrawEngine, DrawResult};
use super::pity::PityState;
use super::random::RandomSource;
use crate::banner::{ItemCatalog, Rarity};
use crate::error::GachaError;
use serde::{Deserialize, Serialize};

/// Standard multi-pull size
pub const TEN_PULL: u32 = 10;

/// Largest batch a single call will draw; longer runs go through the simulator
pub const MAX_BATCH: u32 = 10_000;

/// Ordered results of a batch plus the state after the last draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub results: Vec<DrawResult>,
    pub state: PityState,
}

impl BatchOutcome {
    pub fn count(&self, rarity: Rarity) -> usize {
        self.results.iter().filter(|r| r.rarity == rarity).count()
    }

    pub fn rate_up_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_rate_up).count()
    }

    pub fn best_rarity(&self) -> Option<Rarity> {
        self.results.iter().map(|r| r.rarity).max()
    }

    /// Reveal order for presentation: higher rarity first, characters before
    /// weapons when the catalog knows the type, otherwise pull order. The
    /// chronological `results` list is left untouched.
    pub fn display_order(&self, catalog: Option<&ItemCatalog>) -> Vec<&DrawResult> {
        self.display_indices(catalog).into_iter().map(|index| &self.results[index]).collect()
    }

    /// Same ordering as `display_order`, as indices into `results`
    pub fn display_indices(&self, catalog: Option<&ItemCatalog>) -> Vec<usize> {
        let mut ordered: Vec<(usize, &DrawResult)> = self.results.iter().enumerate().collect();
        // Stable sort keeps pull order within equal keys
        ordered.sort_by_key(|(_, result)| {
            let type_rank = catalog
                .and_then(|c| c.item_type(&result.item_id))
                .map(|t| t.display_rank())
                .unwrap_or(u8::MAX);
            (std::cmp::Reverse(result.rarity), type_rank)
        });
        ordered.into_iter().map(|(index, _)| index).collect()
    }
}

impl<'a> DrawEngine<'a> {
    /// Draw `count` times in sequence, threading the state through each pull
    pub fn draw_batch<R: RandomSource + ?Sized>(
        &self,
        state: &PityState,
        count: u32,
        rng: &mut R,
    ) -> Result<BatchOutcome, GachaError> {
        if count == 0 {
            return Err(GachaError::InvalidPullCount(count));
        }
        if count > MAX_BATCH {
            return Err(GachaError::PullCountExceedsLimit { count, max: MAX_BATCH });
        }
        state.validate_for(self.config()).map_err(|e| {
            log::warn!("Rejected pity state for banner '{}': {}", self.config().banner_id(), e);
            e
        })?;

        let mut current = *state;
        let mut results = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (result, next) = self.draw_unchecked(&current, rng)?;
            results.push(result);
            current = next;
        }

        log::debug!(
            "Batch of {} on banner '{}': {} × 5★, {} × 4★",
            count,
            self.config().banner_id(),
            results.iter().filter(|r| r.rarity == Rarity::FiveStar).count(),
            results.iter().filter(|r| r.rarity == Rarity::FourStar).count()
        );

        Ok(BatchOutcome { results, state: current })
    }

    pub fn ten_pull<R: RandomSource + ?Sized>(
        &self,
        state: &PityState,
        rng: &mut R,
    ) -> Result<BatchOutcome, GachaError> {
        self.draw_batch(state, TEN_PULL, rng)
    }
}
