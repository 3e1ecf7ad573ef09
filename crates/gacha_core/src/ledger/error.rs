use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted ledger: {reason}")]
    Corrupted { reason: String },

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,
}

impl StoreError {
    pub fn corrupted(reason: impl Into<String>) -> Self {
        StoreError::Corrupted { reason: reason.into() }
    }

    /// Whether retrying (or starting a fresh ledger) can help
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}
