//! Per-player, per-banner pity counters

use crate::banner::{Rarity, ValidatedConfig};
use crate::error::InvalidStateError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Counters carried between draws. Owned by the calling session and only
/// advanced by the draw engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PityState {
    pub pulls_since_5star: u32,
    pub pulls_since_4star: u32,
    pub guaranteed_5star_up: bool,
    pub guaranteed_4star_up: bool,
}

impl PityState {
    /// Fresh history: zero counters, no guarantees
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulls_since(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::FiveStar => self.pulls_since_5star,
            Rarity::FourStar => self.pulls_since_4star,
            Rarity::ThreeStar => 0,
        }
    }

    pub fn is_guaranteed(&self, rarity: Rarity) -> bool {
        match rarity {
            Rarity::FiveStar => self.guaranteed_5star_up,
            Rarity::FourStar => self.guaranteed_4star_up,
            Rarity::ThreeStar => false,
        }
    }

    pub(crate) fn set_guaranteed(&mut self, rarity: Rarity, value: bool) {
        match rarity {
            Rarity::FiveStar => self.guaranteed_5star_up = value,
            Rarity::FourStar => self.guaranteed_4star_up = value,
            Rarity::ThreeStar => {}
        }
    }

    /// Pull index the next draw will be at for a tier (1-based)
    pub fn next_pull(&self, rarity: Rarity) -> u32 {
        self.pulls_since(rarity).saturating_add(1)
    }

    /// Apply the counter transition for a hit on `rarity`
    pub(crate) fn record_hit(&mut self, rarity: Rarity) {
        match rarity {
            Rarity::FiveStar => {
                // A 5★ hit leaves the 4★ counter where it was
                self.pulls_since_5star = 0;
            }
            Rarity::FourStar => {
                self.pulls_since_4star = 0;
                self.pulls_since_5star = self.pulls_since_5star.saturating_add(1);
            }
            Rarity::ThreeStar => {
                self.pulls_since_5star = self.pulls_since_5star.saturating_add(1);
                self.pulls_since_4star = self.pulls_since_4star.saturating_add(1);
            }
        }
    }

    /// Reject states no sequence of draws on this banner could produce.
    ///
    /// Nothing is corrected: a bad state points at an upstream bug.
    pub fn validate_for(&self, config: &ValidatedConfig) -> Result<(), InvalidStateError> {
        for rarity in [Rarity::FiveStar, Rarity::FourStar] {
            if let Some(progression) = config.progression(rarity) {
                let count = self.pulls_since(rarity);
                if progression.hard_pity_is_certain() && count >= progression.hard_pity_pull {
                    return Err(InvalidStateError::CounterBeyondHardPity {
                        rarity,
                        count,
                        hard_pity_pull: progression.hard_pity_pull,
                    });
                }
            }

            if self.is_guaranteed(rarity) && !config.has_rate_up(rarity) {
                return Err(InvalidStateError::GuaranteeWithoutRateUp { rarity });
            }
        }
        Ok(())
    }

    /// Parse a state from JSON, reporting shape problems as an invalid state
    pub fn from_json_str(json: &str) -> Result<Self, InvalidStateError> {
        serde_json::from_str(json).map_err(|e| InvalidStateError::Malformed(e.to_string()))
    }
}
