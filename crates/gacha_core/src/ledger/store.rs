use super::error::StoreError;
use super::format::{decompress_and_deserialize, serialize_and_compress, GachaLedger};

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const LEDGER_FILE: &str = "ledger.dat";

/// File-backed ledger in a directory
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
}

impl LedgerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load the ledger, or an empty one if nothing was saved yet
    pub fn load_or_default(&self) -> Result<GachaLedger, StoreError> {
        if !self.exists() {
            log::debug!("No ledger at {:?}, starting fresh", self.path());
            return Ok(GachaLedger::new());
        }
        self.load()
    }

    pub fn load(&self) -> Result<GachaLedger, StoreError> {
        Self::load_from_path(&self.path())
    }

    pub fn save(&self, ledger: &mut GachaLedger) -> Result<(), StoreError> {
        ledger.update_timestamp();
        Self::save_to_path(&self.path(), ledger)?;
        log::info!("Ledger saved ({} sessions)", ledger.session_count());
        Ok(())
    }

    fn save_to_path(path: &Path, ledger: &GachaLedger) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(ledger)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<GachaLedger, StoreError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let ledger = decompress_and_deserialize(&data)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::Rarity;
    use crate::gacha::{BatchOutcome, DrawResult, PityState};
    use tempfile::TempDir;

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path().join("nested"));

        let mut ledger = store.load_or_default().unwrap();
        assert!(ledger.players.is_empty());

        ledger.record_batch(
            "p1",
            "moon",
            &BatchOutcome {
                results: vec![DrawResult {
                    item_id: "nereid".to_string(),
                    rarity: Rarity::FiveStar,
                    is_rate_up: true,
                }],
                state: PityState { pulls_since_4star: 1, ..Default::default() },
            },
        );
        store.save(&mut ledger).unwrap();

        assert!(store.exists());
        assert!(!store.path().with_extension("tmp").exists());
        assert_eq!(store.load().unwrap(), ledger);
    }

    #[test]
    fn test_player_id_with_separator_saves() {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path());
        let mut ledger = GachaLedger::new();
        let outcome = BatchOutcome {
            results: vec![DrawResult {
                item_id: "pebble".to_string(),
                rarity: Rarity::ThreeStar,
                is_rate_up: false,
            }],
            state: PityState { pulls_since_5star: 1, pulls_since_4star: 1, ..Default::default() },
        };

        ledger.record_batch("team::alice", "harbor-lights", &outcome);
        store.save(&mut ledger).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.pity("team::alice", "harbor-lights"), outcome.state);
        assert_eq!(loaded.pity("team", "alice::harbor-lights"), PityState::new());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path());
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_corrupted_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path());
        std::fs::write(store.path(), vec![0u8; 64]).unwrap();
        assert!(matches!(store.load(), Err(StoreError::ChecksumMismatch)));
    }
}
