//! Aggregated statistics from a simulation run

use crate::banner::Rarity;
use crate::gacha::DrawResult;
use serde::{Deserialize, Serialize};

/// Running counters for one session; sessions are merged into a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationTally {
    pub pulls: u64,
    pub five_star: u64,
    pub four_star: u64,
    pub three_star: u64,
    pub five_star_rate_up: u64,
    pub four_star_rate_up: u64,

    /// Sum of completed 5★ gaps (pulls from one 5★ to the next, inclusive)
    pub five_star_gap_total: u64,

    /// Longest completed 5★ gap
    pub max_five_star_gap: u32,

    /// Longest run of pulls without a 4★ or better
    pub max_four_star_drought: u32,

    /// Two standard 5★ results in a row on a rate-up tier; always 0 for a
    /// correct engine
    pub consecutive_standard_five_star: u64,

    #[serde(skip)]
    since_five_star: u32,
    #[serde(skip)]
    since_four_plus: u32,
    #[serde(skip)]
    last_five_star_standard: bool,
}

impl SimulationTally {
    /// Fold one draw into the tally. `rate_up_tier` says whether the 5★ tier
    /// has rate-up items, so a standard 5★ counts toward the 50/50 check.
    pub fn record(&mut self, result: &DrawResult, rate_up_tier: bool) {
        self.pulls += 1;
        self.since_five_star += 1;
        self.since_four_plus += 1;

        match result.rarity {
            Rarity::FiveStar => {
                self.five_star += 1;
                self.five_star_gap_total += self.since_five_star as u64;
                self.max_five_star_gap = self.max_five_star_gap.max(self.since_five_star);
                self.since_five_star = 0;

                if result.is_rate_up {
                    self.five_star_rate_up += 1;
                    self.last_five_star_standard = false;
                } else if rate_up_tier {
                    if self.last_five_star_standard {
                        self.consecutive_standard_five_star += 1;
                    }
                    self.last_five_star_standard = true;
                }
            }
            Rarity::FourStar => {
                self.four_star += 1;
                if result.is_rate_up {
                    self.four_star_rate_up += 1;
                }
            }
            Rarity::ThreeStar => self.three_star += 1,
        }

        if result.rarity >= Rarity::FourStar {
            self.since_four_plus = 0;
        } else {
            self.max_four_star_drought = self.max_four_star_drought.max(self.since_four_plus);
        }
    }

    /// Combine finished sessions. Open gaps are per-session and are dropped.
    pub fn merge(mut self, other: SimulationTally) -> SimulationTally {
        self.pulls += other.pulls;
        self.five_star += other.five_star;
        self.four_star += other.four_star;
        self.three_star += other.three_star;
        self.five_star_rate_up += other.five_star_rate_up;
        self.four_star_rate_up += other.four_star_rate_up;
        self.five_star_gap_total += other.five_star_gap_total;
        self.max_five_star_gap = self.max_five_star_gap.max(other.max_five_star_gap);
        self.max_four_star_drought = self.max_four_star_drought.max(other.max_four_star_drought);
        self.consecutive_standard_five_star += other.consecutive_standard_five_star;
        self
    }
}

/// Final report: raw tallies, observed rates and the analytic 5★ expectation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub banner_id: String,
    pub sessions: u32,
    pub seed: u64,
    pub tally: SimulationTally,
    pub expected_five_star_rate: f64,
}

impl SimulationReport {
    pub fn observed_rate(&self, rarity: Rarity) -> f64 {
        if self.tally.pulls == 0 {
            return 0.0;
        }
        let hits = match rarity {
            Rarity::FiveStar => self.tally.five_star,
            Rarity::FourStar => self.tally.four_star,
            Rarity::ThreeStar => self.tally.three_star,
        };
        hits as f64 / self.tally.pulls as f64
    }

    /// Share of 5★ hits that were rate-up
    pub fn five_star_rate_up_share(&self) -> f64 {
        if self.tally.five_star == 0 {
            0.0
        } else {
            self.tally.five_star_rate_up as f64 / self.tally.five_star as f64
        }
    }

    pub fn mean_pulls_per_five_star(&self) -> Option<f64> {
        (self.tally.five_star > 0)
            .then(|| self.tally.five_star_gap_total as f64 / self.tally.five_star as f64)
    }

    /// Absolute gap between observed and expected 5★ frequency
    pub fn five_star_deviation(&self) -> f64 {
        (self.observed_rate(Rarity::FiveStar) - self.expected_five_star_rate).abs()
    }

    /// Whether the observed 5★ frequency is within `tolerance` (absolute)
    pub fn converges(&self, tolerance: f64) -> bool {
        self.five_star_deviation() <= tolerance
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Simulation: {} ===\n", self.banner_id));
        out.push_str(&format!(
            "Sessions: {}  Pulls: {}  Seed: {}\n",
            self.sessions, self.tally.pulls, self.seed
        ));
        out.push_str(&format!(
            "5★: {} ({:.3}%, expected {:.3}%)\n",
            self.tally.five_star,
            self.observed_rate(Rarity::FiveStar) * 100.0,
            self.expected_five_star_rate * 100.0
        ));
        out.push_str(&format!(
            "4★: {} ({:.3}%)\n",
            self.tally.four_star,
            self.observed_rate(Rarity::FourStar) * 100.0
        ));
        out.push_str(&format!(
            "3★: {} ({:.3}%)\n",
            self.tally.three_star,
            self.observed_rate(Rarity::ThreeStar) * 100.0
        ));
        out.push_str(&format!(
            "Rate-up 5★ share: {:.1}%  Rate-up 4★: {}\n",
            self.five_star_rate_up_share() * 100.0,
            self.tally.four_star_rate_up
        ));
        if let Some(mean) = self.mean_pulls_per_five_star() {
            out.push_str(&format!(
                "Pulls per 5★: mean {:.2}, max {}\n",
                mean, self.tally.max_five_star_gap
            ));
        }
        out.push_str(&format!("Longest 4★ drought: {}\n", self.tally.max_four_star_drought));
        if self.tally.consecutive_standard_five_star > 0 {
            out.push_str(&format!(
                "WARNING: {} consecutive standard 5★ results\n",
                self.tally.consecutive_standard_five_star
            ));
        }
        out
    }
}
