// Ledger persistence for pity states and pull history
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod stats;
pub mod store;

pub use error::StoreError;
pub use format::{
    current_timestamp, decompress_and_deserialize, format_timestamp, serialize_and_compress,
    GachaLedger, PullRecord, SessionRecord,
};
pub use stats::PullStatistics;
pub use store::LedgerStore;

pub const LEDGER_VERSION: u32 = 1;
