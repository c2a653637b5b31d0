use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod blob;
pub mod dir;

// ---------------------------------------------------------------------------
// ObjectStore – the seam between the dashboard and its storage container
// ---------------------------------------------------------------------------

/// One entry from a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Failure reading from storage. The dashboard does not retry; either
/// variant surfaces as a rendered message for the operation attempted.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Transient(String),
}

/// Read-only view of a single blob container.
///
/// One implementation talks to the remote container over HTTP
/// ([`blob::BlobStore`]); one mirrors the container layout on local disk
/// ([`dir::DirStore`]) for offline runs and tests.
pub trait ObjectStore {
    /// Fetch one object's raw bytes.
    fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError>;

    /// List objects whose key starts with `prefix`. An empty listing is a
    /// valid result, not a failure.
    fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectInfo>, FetchError>;
}

// ---------------------------------------------------------------------------
// In-memory store for tests
// ---------------------------------------------------------------------------
