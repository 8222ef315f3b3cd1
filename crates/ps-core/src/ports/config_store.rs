//! Setup record persistence port
//!
//! One record per installation. Implementations must make `save` atomic with
//! respect to `load`: a reader never observes a partially written record.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::setup::SetupConfiguration;

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// I/O fault while reading or writing (no space, permission denied, ...).
    #[error("setup configuration I/O failed at {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored bytes exist but cannot be decoded.
    #[error("setup configuration at {path} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// The in-memory record could not be encoded. Nothing was written.
    #[error("setup configuration could not be serialized: {0}")]
    Serialization(String),
}

impl ConfigStoreError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigStoreError::Persistence { .. } => "persistence_failed",
            ConfigStoreError::Unreadable { .. } => "config_unreadable",
            ConfigStoreError::Serialization(_) => "internal",
        }
    }
}

#[async_trait]
pub trait ConfigStorePort: Send + Sync {
    /// Current record, `Ok(None)` when none has been written yet.
    async fn load(&self) -> Result<Option<SetupConfiguration>, ConfigStoreError>;

    /// Replace the stored record with `record`.
    async fn save(&self, record: &SetupConfiguration) -> Result<(), ConfigStoreError>;
}
