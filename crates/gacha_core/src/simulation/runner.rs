//! Monte Carlo runner
//!
//! Sessions are independent: each starts from a fresh `PityState` with its
//! own generator seeded `seed + session_index`, so a report is reproducible
//! regardless of how rayon schedules the sessions.

use super::analytic::expected_five_star_rate;
use super::config::SimulationConfig;
use super::report::{SimulationReport, SimulationTally};
use crate::banner::{ItemCatalog, Rarity, ValidatedConfig};
use crate::error::GachaError;
use crate::gacha::{seeded, DrawEngine, PityState};
use rayon::prelude::*;

pub struct Simulator<'a> {
    engine: DrawEngine<'a>,
}

impl<'a> Simulator<'a> {
    pub fn new(config: &'a ValidatedConfig) -> Self {
        Self { engine: DrawEngine::new(config) }
    }

    pub fn with_catalog(config: &'a ValidatedConfig, catalog: &'a ItemCatalog) -> Self {
        Self { engine: DrawEngine::with_catalog(config, catalog) }
    }

    /// Run every session and merge the tallies
    pub fn run(&self, sim: &SimulationConfig) -> Result<SimulationReport, GachaError> {
        let config = self.engine.config();
        tracing::info!(
            "Simulating banner '{}': {} sessions × {} pulls (seed {})",
            config.banner_id(),
            sim.sessions,
            sim.pulls_per_session,
            sim.seed
        );

        let tallies: Vec<SimulationTally> = if sim.sessions >= sim.parallel_threshold {
            (0..sim.sessions)
                .into_par_iter()
                .map(|index| self.run_session(sim, index))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..sim.sessions)
                .map(|index| self.run_session(sim, index))
                .collect::<Result<Vec<_>, _>>()?
        };

        let tally = tallies.into_iter().fold(SimulationTally::default(), SimulationTally::merge);
        let report = SimulationReport {
            banner_id: config.banner_id().to_string(),
            sessions: sim.sessions,
            seed: sim.seed,
            tally,
            expected_five_star_rate: expected_five_star_rate(config),
        };

        tracing::debug!(
            "Simulation done: 5★ observed {:.5}, expected {:.5}",
            report.observed_rate(Rarity::FiveStar),
            report.expected_five_star_rate
        );
        Ok(report)
    }

    fn run_session(&self, sim: &SimulationConfig, index: u32) -> Result<SimulationTally, GachaError> {
        let mut rng = seeded(sim.seed.wrapping_add(index as u64));
        let rate_up_tier = self.engine.config().has_rate_up(Rarity::FiveStar);
        let mut state = PityState::new();
        let mut tally = SimulationTally::default();

        for _ in 0..sim.pulls_per_session {
            let (result, next) = self.engine.draw_unchecked(&state, &mut rng)?;
            tally.record(&result, rate_up_tier);
            state = next;
        }
        Ok(tally)
    }
}

/// Convenience wrapper: simulate a validated banner without a catalog
pub fn simulate(config: &ValidatedConfig, sim: &SimulationConfig) -> Result<SimulationReport, GachaError> {
    Simulator::new(config).run(sim)
}
