//! Long-run frequencies against the analytic pity-boosted rate

mod common;

use common::{banner, live_banner};
use gacha_core::simulation::{expected_five_star_rate, simulate, SimulationConfig};
use gacha_core::{BannerValidator, Rarity};

#[test]
fn test_million_draws_converge_to_analytic_rate() {
    let config = BannerValidator::validate(banner(0.008, 0.06, 80, vec![])).unwrap();
    let expected = expected_five_star_rate(&config);

    // E[pulls per hit] = (1 - 0.992^80) / 0.008
    let closed_form = 0.008 / (1.0 - 0.992f64.powi(80));
    assert!((expected - closed_form).abs() < 1e-12);
    assert!(expected > 0.0165 && expected < 0.0172, "expected {}", expected);

    let report = simulate(&config, &SimulationConfig::cohort(100, 10_000, 2024)).unwrap();
    assert_eq!(report.tally.pulls, 1_000_000);
    assert!(
        report.converges(0.005),
        "observed {:.5} vs expected {:.5}",
        report.observed_rate(Rarity::FiveStar),
        expected
    );
    assert!(report.tally.max_five_star_gap <= 80);
    assert_eq!(report.tally.consecutive_standard_five_star, 0);
}

#[test]
fn test_rate_up_share_near_two_thirds() {
    // With a 50/50 and carry-over guarantee, 2 of every 3 five-stars are rate-up
    let config = BannerValidator::validate(live_banner()).unwrap();
    let report = simulate(&config, &SimulationConfig::cohort(64, 5_000, 7)).unwrap();

    let share = report.five_star_rate_up_share();
    assert!((share - 2.0 / 3.0).abs() < 0.05, "share {}", share);
    assert!(report.mean_pulls_per_five_star().unwrap() < 90.0);
}

#[test]
fn test_soft_pity_pulls_mean_down() {
    let flat = BannerValidator::validate(banner(0.006, 0.051, 90, vec![])).unwrap();
    let soft = BannerValidator::validate(live_banner()).unwrap();
    assert!(expected_five_star_rate(&soft) > expected_five_star_rate(&flat));

    let sim = SimulationConfig::cohort(32, 5_000, 11);
    let flat_report = simulate(&flat, &sim).unwrap();
    let soft_report = simulate(&soft, &sim).unwrap();
    assert!(
        soft_report.mean_pulls_per_five_star().unwrap()
            < flat_report.mean_pulls_per_five_star().unwrap()
    );
}
