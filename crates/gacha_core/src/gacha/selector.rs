//! Uniform item selection within one tier's pool

use super::random::RandomSource;
use crate::banner::{ItemCatalog, ItemId, ItemType, Rarity};
use crate::error::{EmptyPoolError, PoolKind};

/// Picks an item uniformly from a pool.
///
/// With a catalog and a character rate, 4★ picks first roll the item type and
/// narrow the pool to it; an empty narrowed pool falls back to the full pool
/// of the same tier, never to another tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemSelector<'a> {
    catalog: Option<&'a ItemCatalog>,
    four_star_character_rate: Option<f64>,
}

impl<'a> ItemSelector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: &'a ItemCatalog, four_star_character_rate: Option<f64>) -> Self {
        Self { catalog: Some(catalog), four_star_character_rate }
    }

    /// Uniform choice over a non-empty pool
    pub fn select<'p, R: RandomSource + ?Sized>(
        pool: &'p [ItemId],
        rarity: Rarity,
        kind: PoolKind,
        rng: &mut R,
    ) -> Result<&'p ItemId, EmptyPoolError> {
        if pool.is_empty() {
            return Err(EmptyPoolError { rarity, kind });
        }
        Ok(&pool[rng.next_index(pool.len())])
    }

    /// Choice over a tier's pool, applying the 4★ type split when configured
    pub fn pick<'p, R: RandomSource + ?Sized>(
        &self,
        pool: &'p [ItemId],
        rarity: Rarity,
        kind: PoolKind,
        rng: &mut R,
    ) -> Result<&'p ItemId, EmptyPoolError> {
        if pool.is_empty() {
            return Err(EmptyPoolError { rarity, kind });
        }

        if let (Rarity::FourStar, Some(catalog), Some(character_rate)) =
            (rarity, self.catalog, self.four_star_character_rate)
        {
            let wanted = if rng.next_f64() < character_rate {
                ItemType::Character
            } else {
                ItemType::Weapon
            };
            let narrowed: Vec<&'p ItemId> =
                pool.iter().filter(|id| catalog.item_type(id) == Some(wanted)).collect();
            if !narrowed.is_empty() {
                return Ok(narrowed[rng.next_index(narrowed.len())]);
            }
            log::trace!("No 4★ {:?} in {} pool, using the whole pool", wanted, kind);
        }

        Self::select(pool, rarity, kind, rng)
    }
}
