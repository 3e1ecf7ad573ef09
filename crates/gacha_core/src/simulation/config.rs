//! Simulation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a Monte Carlo run over a banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Independent sessions (players), each starting from a fresh pity state
    pub sessions: u32,

    /// Pulls performed by every session
    pub pulls_per_session: u32,

    /// Base seed; session `i` uses `seed + i`
    pub seed: u64,

    /// Sessions per rayon task; below this many sessions the run stays sequential
    pub parallel_threshold: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { sessions: 1000, pulls_per_session: 1000, seed: 0, parallel_threshold: 16 }
    }
}

impl SimulationConfig {
    /// One long session, for convergence checks against the analytic rate
    pub fn convergence(total_pulls: u32, seed: u64) -> Self {
        Self { sessions: 1, pulls_per_session: total_pulls, seed, ..Default::default() }
    }

    /// Many short sessions, e.g. "what does a player see in their first 90 pulls"
    pub fn cohort(sessions: u32, pulls_per_session: u32, seed: u64) -> Self {
        Self { sessions, pulls_per_session, seed, ..Default::default() }
    }

    pub fn total_pulls(&self) -> u64 {
        self.sessions as u64 * self.pulls_per_session as u64
    }
}
