// Monte Carlo and analytic checks of banner odds

pub mod analytic;
pub mod config;
pub mod report;
pub mod runner;

pub use analytic::{expected_five_star_rate, expected_pulls_per_hit, five_star_pull_distribution};
pub use config::SimulationConfig;
pub use report::{SimulationReport, SimulationTally};
pub use runner::{simulate, Simulator};
