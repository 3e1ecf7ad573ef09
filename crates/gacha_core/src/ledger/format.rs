use super::error::StoreError;
use super::LEDGER_VERSION;
use crate::banner::{ItemId, Rarity};
use crate::gacha::{BatchOutcome, PityState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Persisted pity states and pull history for every player/banner pair
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GachaLedger {
    /// Ledger format version
    pub version: u32,

    /// Last save (unix milliseconds)
    pub timestamp: u64,

    /// player_id → banner_id → session
    pub players: BTreeMap<String, BTreeMap<String, SessionRecord>>,
}

/// One player's history on one banner
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SessionRecord {
    pub pity: PityState,
    pub total_pulls: u64,
    pub history: Vec<PullRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PullRecord {
    pub item_id: ItemId,
    pub rarity: Rarity,
    pub is_rate_up: bool,
    pub banner_id: String,

    /// unix milliseconds
    pub pulled_at: u64,
}

impl Default for GachaLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl GachaLedger {
    pub fn new() -> Self {
        Self { version: LEDGER_VERSION, timestamp: current_timestamp(), players: BTreeMap::new() }
    }

    pub fn session(&self, player_id: &str, banner_id: &str) -> Option<&SessionRecord> {
        self.players.get(player_id)?.get(banner_id)
    }

    pub fn session_count(&self) -> usize {
        self.players.values().map(BTreeMap::len).sum()
    }

    /// Pity state to draw from next; fresh when the player never pulled here
    pub fn pity(&self, player_id: &str, banner_id: &str) -> PityState {
        self.session(player_id, banner_id).map(|s| s.pity).unwrap_or_default()
    }

    /// Commit a finished batch: new pity state plus one history entry per pull
    pub fn record_batch(&mut self, player_id: &str, banner_id: &str, outcome: &BatchOutcome) {
        let pulled_at = current_timestamp();
        let session = self
            .players
            .entry(player_id.to_string())
            .or_default()
            .entry(banner_id.to_string())
            .or_default();

        session.pity = outcome.state;
        session.total_pulls += outcome.results.len() as u64;
        session.history.extend(outcome.results.iter().map(|result| PullRecord {
            item_id: result.item_id.clone(),
            rarity: result.rarity,
            is_rate_up: result.is_rate_up,
            banner_id: banner_id.to_string(),
            pulled_at,
        }));
    }

    pub fn update_timestamp(&mut self) {
        self.timestamp = current_timestamp();
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        for (player_id, banners) in &self.players {
            for (banner_id, session) in banners {
                if session.total_pulls != session.history.len() as u64 {
                    return Err(StoreError::corrupted(format!(
                        "session '{}' on '{}' counts {} pulls but holds {} records",
                        player_id,
                        banner_id,
                        session.total_pulls,
                        session.history.len()
                    )));
                }
                if let Some(stray) = session.history.iter().find(|r| &r.banner_id != banner_id) {
                    return Err(StoreError::corrupted(format!(
                        "session '{}' on '{}' holds a pull from banner '{}'",
                        player_id, banner_id, stray.banner_id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// MessagePack → LZ4 (size-prepended) → trailing SHA-256
pub fn serialize_and_compress(ledger: &GachaLedger) -> Result<Vec<u8>, StoreError> {
    ledger.validate()?;

    let msgpack = to_vec_named(ledger)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<GachaLedger, StoreError> {
    // size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(StoreError::corrupted("file too short"));
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);
    let mut hasher = Sha256::new();
    hasher.update(payload);
    if hasher.finalize()[..] != *checksum_bytes {
        return Err(StoreError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StoreError::Decompression)?;
    let ledger: GachaLedger = from_slice(&msgpack)?;

    if ledger.version > LEDGER_VERSION {
        return Err(StoreError::VersionMismatch { found: ledger.version, expected: LEDGER_VERSION });
    }

    ledger.validate()?;
    Ok(ledger)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

/// RFC 3339 rendering of a unix-millisecond timestamp
pub fn format_timestamp(millis: u64) -> String {
    use time::format_description::well_known::Rfc3339;

    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "Unknown".to_string())
}
