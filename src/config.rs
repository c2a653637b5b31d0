use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::storage::{blob::BlobStore, dir::DirStore, ObjectStore};

// ---------------------------------------------------------------------------
// Container layout and cache lifetimes
// ---------------------------------------------------------------------------

/// Key of the current flight table.
pub const LATEST_FLIGHTS_KEY: &str = "latest_flights.csv";
/// Key of the metadata sidecar.
pub const METADATA_KEY: &str = "metadata.json";

/// Memo lifetime for the current table and metadata.
pub const LATEST_TTL: Duration = Duration::from_secs(30 * 60);
/// Memo lifetime for the history listing and archived snapshots, which
/// only ever grow.
pub const HISTORY_TTL: Duration = Duration::from_secs(60 * 60);

// ---------------------------------------------------------------------------
// Storage location
// ---------------------------------------------------------------------------

/// Where the container lives. Resolved once at startup; absence is fatal
/// for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Remote blob container URL, SAS token included if required.
    Blob { container_url: String },
    /// Local directory mirroring the container layout.
    Dir { root: PathBuf },
}

#[derive(Debug, Error)]
#[error("storage not configured: set FLIGHT_DATA_URL (blob container, SAS included) or FLIGHT_DATA_DIR (local mirror)")]
pub struct MissingConfig;

impl StorageConfig {
    /// Read the storage location from the environment. A remote URL takes
    /// precedence over a local mirror when both are set.
    pub fn from_env() -> Result<Self, MissingConfig> {
        if let Ok(url) = std::env::var("FLIGHT_DATA_URL") {
            if !url.is_empty() {
                return Ok(StorageConfig::Blob { container_url: url });
            }
        }
        if let Ok(dir) = std::env::var("FLIGHT_DATA_DIR") {
            if !dir.is_empty() {
                return Ok(StorageConfig::Dir { root: dir.into() });
            }
        }
        Err(MissingConfig)
    }

    /// Open the configured store.
    pub fn open(&self) -> Box<dyn ObjectStore> {
        match self {
            StorageConfig::Blob { container_url } => Box::new(BlobStore::new(container_url)),
            StorageConfig::Dir { root } => Box::new(DirStore::new(root.clone())),
        }
    }
}
