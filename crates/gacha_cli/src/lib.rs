//! Gacha CLI Library
//!
//! File-level helpers behind the `gacha` binary: banner/catalog loading
//! (JSON or YAML), validation reports, and draws persisted to a ledger.

use anyhow::{bail, Context, Result};
use gacha_core::ledger::{current_timestamp, GachaLedger, LedgerStore, PullStatistics};
use gacha_core::{
    seeded, BannerConfig, BannerValidator, BatchOutcome, ConfigViolation, DrawEngine, ItemCatalog,
    ValidatedConfig,
};
use std::fs;
use std::path::Path;

/// Parse a banner file; `.yaml`/`.yml` as YAML, anything else as JSON
pub fn load_banner(path: &Path) -> Result<BannerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read banner file: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let config = if is_yaml {
        BannerConfig::from_yaml_str(&text)
    } else {
        BannerConfig::from_json_str(&text)
    };
    config.with_context(|| format!("Failed to parse banner: {}", path.display()))
}

/// Parse a catalog file (JSON array of items)
pub fn load_catalog(path: &Path) -> Result<ItemCatalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    ItemCatalog::from_json_str(&text)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))
}

/// Violations of a banner file, checked against the catalog when given
pub fn check_banner(banner: &Path, catalog: Option<&Path>) -> Result<Vec<ConfigViolation>> {
    let config = load_banner(banner)?;
    let catalog = catalog.map(load_catalog).transpose()?;
    let result = match &catalog {
        Some(catalog) => BannerValidator::validate_with_catalog(config, catalog),
        None => BannerValidator::validate(config),
    };
    Ok(result.err().map(|e| e.violations).unwrap_or_default())
}

/// Load and validate a banner; any violation is an error listing all of them
pub fn load_validated(
    banner: &Path,
    catalog: Option<&Path>,
) -> Result<(ValidatedConfig, Option<ItemCatalog>)> {
    let config = load_banner(banner)?;
    let catalog = catalog.map(load_catalog).transpose()?;

    let validated = match &catalog {
        Some(catalog) => BannerValidator::validate_with_catalog(config, catalog),
        None => BannerValidator::validate(config),
    };
    match validated {
        Ok(validated) => Ok((validated, catalog)),
        Err(e) => {
            let details: Vec<String> =
                e.violations.iter().map(|v| format!("  - {}: {}", v.field(), v)).collect();
            bail!("Banner {} is invalid:\n{}", banner.display(), details.join("\n"))
        }
    }
}

/// Draw `count` pulls for a player and commit them to the ledger in `ledger_dir`
pub fn draw_into_ledger(
    config: &ValidatedConfig,
    catalog: Option<&ItemCatalog>,
    ledger_dir: &Path,
    player_id: &str,
    count: u32,
    seed: Option<u64>,
) -> Result<(BatchOutcome, u64)> {
    if !config.is_enabled() {
        bail!("Banner '{}' is disabled", config.banner_id());
    }

    let store = LedgerStore::new(ledger_dir);
    let mut ledger: GachaLedger = store
        .load_or_default()
        .with_context(|| format!("Failed to load ledger: {}", store.path().display()))?;

    let state = ledger.pity(player_id, config.banner_id());
    let engine = match catalog {
        Some(catalog) => DrawEngine::with_catalog(config, catalog),
        None => DrawEngine::new(config),
    };

    let seed = seed.unwrap_or_else(current_timestamp);
    let outcome = engine.draw_batch(&state, count, &mut seeded(seed))?;

    ledger.record_batch(player_id, config.banner_id(), &outcome);
    store
        .save(&mut ledger)
        .with_context(|| format!("Failed to save ledger: {}", store.path().display()))?;

    log::info!("{} pulled {} on '{}' (seed {})", player_id, count, config.banner_id(), seed);
    Ok((outcome, seed))
}

/// Statistics for a player's session on a banner, if they ever pulled there
pub fn session_stats(
    ledger_dir: &Path,
    player_id: &str,
    banner_id: &str,
) -> Result<Option<PullStatistics>> {
    let store = LedgerStore::new(ledger_dir);
    let ledger = store
        .load_or_default()
        .with_context(|| format!("Failed to load ledger: {}", store.path().display()))?;
    Ok(ledger.session(player_id, banner_id).map(PullStatistics::from_session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gacha_core::Rarity;
    use tempfile::TempDir;

    const BANNER_YAML: &str = r#"
name: Ember Dawn
probability_settings:
  base_5star_rate: 0.006
  base_4star_rate: 0.051
  up_5star_rate: 0.5
  up_4star_rate: 0.5
probability_progression:
  5star:
    hard_pity_pull: 90
    soft_pity:
      - { start_pull: 74, end_pull: 89, increment: 0.06 }
  4star:
    hard_pity_pull: 10
rate_up_item_ids:
  5star: [cinder]
  4star: [ash]
included_item_ids:
  5star: [cinder, glacier]
  4star: [ash, birch, cedar]
  3star: [flint, moss]
"#;

    fn write_banner(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("banner.yaml");
        fs::write(&path, BANNER_YAML).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_banner() {
        let dir = TempDir::new().unwrap();
        let banner = load_banner(&write_banner(&dir)).unwrap();
        assert_eq!(banner.name, "Ember Dawn");
        assert!(check_banner(&write_banner(&dir), None).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_banner_lists_violations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        let mut banner = load_banner(&write_banner(&dir)).unwrap();
        banner.probability_settings.base_4star_rate = 2.0;
        fs::write(&path, banner.to_json_pretty().unwrap()).unwrap();

        let err = load_validated(&path, None).unwrap_err();
        assert!(err.to_string().contains("base_4star_rate"));
    }

    #[test]
    fn test_draws_accumulate_in_ledger() {
        let dir = TempDir::new().unwrap();
        let (config, _) = load_validated(&write_banner(&dir), None).unwrap();
        let ledger_dir = dir.path().join("ledger");

        let (first, _) = draw_into_ledger(&config, None, &ledger_dir, "p1", 10, Some(1)).unwrap();
        let (second, _) = draw_into_ledger(&config, None, &ledger_dir, "p1", 10, Some(2)).unwrap();
        assert!(first.best_rarity().unwrap() >= Rarity::FourStar);

        let stats = session_stats(&ledger_dir, "p1", config.banner_id()).unwrap().unwrap();
        assert_eq!(stats.total_pulls, 20);
        assert_eq!(stats.current_pity, second.state);
        assert!(session_stats(&ledger_dir, "p2", config.banner_id()).unwrap().is_none());
    }
}
