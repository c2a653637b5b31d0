use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{FetchError, ObjectInfo, ObjectStore};

// ---------------------------------------------------------------------------
// DirStore – local-directory container mirror
// ---------------------------------------------------------------------------

/// Serves a directory laid out like the blob container: object keys map to
/// relative paths, last-modified comes from file mtime. Used for offline
/// runs (see `generate_sample`) and tests.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStore { root: root.into() }
    }
}

impl ObjectStore for DirStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        match std::fs::read(self.root.join(key)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(key.to_string())),
            Err(e) => Err(FetchError::Transient(format!("reading {key}: {e}"))),
        }
    }

    fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectInfo>, FetchError> {
        let mut out = Vec::new();
        collect(&self.root, &self.root, &mut out)
            .map_err(|e| FetchError::Transient(format!("listing {prefix}: {e}")))?;
        out.retain(|info| info.key.starts_with(prefix));
        out.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(out)
    }
}

/// Walk `dir`, pushing every file as an [`ObjectInfo`] with a `/`-separated
/// key relative to `root`.
fn collect(root: &Path, dir: &Path, out: &mut Vec<ObjectInfo>) -> std::io::Result<()> {
    // A missing root (or prefix subdirectory) is an empty listing.
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out)?;
            continue;
        }
        let key = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let modified = entry.metadata()?.modified()?;
        out.push(ObjectInfo {
            key,
            last_modified: DateTime::<Utc>::from(modified),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!("fareboard-{tag}-{}", std::process::id()));
            let _ = std::fs::remove_dir_all(&path);
            std::fs::create_dir_all(path.join("history")).unwrap();
            TempDir(path)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn fetch_and_list_follow_the_container_layout() {
        let tmp = TempDir::new("dirstore");
        std::fs::write(tmp.0.join("latest_flights.csv"), b"csv").unwrap();
        std::fs::write(tmp.0.join("metadata.json"), b"{}").unwrap();
        std::fs::write(tmp.0.join("history/flights_2026-08-23_061500.csv"), b"old").unwrap();

        let store = DirStore::new(&tmp.0);
        assert_eq!(store.fetch("latest_flights.csv").unwrap(), b"csv");
        assert_eq!(
            store.fetch("history/flights_2026-08-23_061500.csv").unwrap(),
            b"old"
        );

        let listed = store.list_objects("history/").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, "history/flights_2026-08-23_061500.csv");
    }

    #[test]
    fn missing_object_is_not_found() {
        let tmp = TempDir::new("dirstore-missing");
        let store = DirStore::new(&tmp.0);
        assert!(matches!(
            store.fetch("latest_flights.csv"),
            Err(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn missing_prefix_lists_empty() {
        let tmp = TempDir::new("dirstore-empty");
        std::fs::remove_dir_all(tmp.0.join("history")).unwrap();
        let store = DirStore::new(&tmp.0);
        assert!(store.list_objects("history/").unwrap().is_empty());
    }
}
