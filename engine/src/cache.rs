use std::fs;
use std::path::PathBuf;

use tracing::warn;

use gridlot_shared::Region;

use crate::error::RegionError;

/// Durable client-side mirror of the region set. The snapshot is opaque
/// serialized text; decoding and validation happen in the sync layer, so a
/// cache implementation never needs to understand the payload.
pub trait LocalCache {
    /// Raw snapshot, or None when absent. Read failures degrade to None.
    fn read(&self) -> Option<String>;
    fn write(&mut self, snapshot: &str) -> Result<(), String>;
}

/// Strict structural validation of a cached snapshot. Any malformed element
/// poisons the whole snapshot; a partially valid cache is never trusted.
pub fn decode_snapshot(raw: &str) -> Result<Vec<Region>, RegionError> {
    serde_json::from_str::<Vec<Region>>(raw)
        .map_err(|e| RegionError::CacheCorrupt(e.to_string()))
}

/// One JSON file holding the latest snapshot, the native counterpart of the
/// original browser cache entry.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl LocalCache for FileCache {
    fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache read failed, treating as absent");
                None
            }
        }
    }

    fn write(&mut self, snapshot: &str) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| format!("create cache dir: {e}"))?;
            }
        }
        fs::write(&self.path, snapshot).map_err(|e| format!("write cache: {e}"))
    }
}

/// In-memory cache for tests and cache-less sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    snapshot: Option<String>,
    pub fail_writes: bool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Some(snapshot.into()),
            fail_writes: false,
        }
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }
}

impl LocalCache for MemoryCache {
    fn read(&self) -> Option<String> {
        self.snapshot.clone()
    }

    fn write(&mut self, snapshot: &str) -> Result<(), String> {
        if self.fail_writes {
            return Err("cache write disabled".to_string());
        }
        self.snapshot = Some(snapshot.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gridlot_shared::{RegionMap, Tier, to_snapshot_json};

    fn region(x: i32, y: i32) -> Region {
        Region {
            origin_x: x,
            origin_y: y,
            width: 10,
            height: 10,
            owner: "alice".to_string(),
            media_ref: None,
            media_width: None,
            media_height: None,
            tier: Tier::Basic,
            purchased_at: Utc::now(),
        }
    }

    fn temp_cache_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridlot-cache-{tag}-{}.json", std::process::id()))
    }

    #[test]
    fn valid_snapshot_decodes_in_full() {
        let mut map = RegionMap::new();
        map.insert((0, 0), region(0, 0));
        map.insert((10, 0), region(10, 0));
        let raw = to_snapshot_json(&map).unwrap();

        let decoded = decode_snapshot(&raw).expect("snapshot should decode");
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn malformed_snapshots_are_rejected_whole() {
        let corrupt = [
            "{\"not\":\"an array\"}",
            "12",
            "not json at all",
            // Missing required `owner`.
            r#"[{"origin_x":0,"origin_y":0,"width":10,"height":10,"tier":"basic","purchased_at":"2025-01-01T00:00:00Z"}]"#,
            // Wrong type for `origin_x`.
            r#"[{"origin_x":"zero","origin_y":0,"width":10,"height":10,"owner":"a","tier":"basic","purchased_at":"2025-01-01T00:00:00Z"}]"#,
            // One good element cannot rescue a bad one.
            r#"[{"origin_x":0,"origin_y":0,"width":10,"height":10,"owner":"a","tier":"basic","purchased_at":"2025-01-01T00:00:00Z"},{"bogus":true}]"#,
        ];
        for raw in corrupt {
            assert!(
                matches!(decode_snapshot(raw), Err(RegionError::CacheCorrupt(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn file_cache_round_trips_and_reports_absent() {
        let path = temp_cache_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut cache = FileCache::new(&path);
        assert_eq!(cache.read(), None);

        cache.write("[]").expect("write should succeed");
        assert_eq!(cache.read().as_deref(), Some("[]"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_cache_creates_missing_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("gridlot-cache-dir-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut cache = FileCache::new(dir.join("nested").join("regions.json"));
        cache.write("[]").expect("write should create parents");
        assert_eq!(cache.read().as_deref(), Some("[]"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn memory_cache_round_trips() {
        let mut cache = MemoryCache::new();
        assert_eq!(cache.read(), None);
        cache.write("[1]").expect("memory write");
        assert_eq!(cache.read().as_deref(), Some("[1]"));
    }

    #[test]
    fn failing_memory_cache_reports_the_error() {
        let mut cache = MemoryCache::new();
        cache.fail_writes = true;
        assert!(cache.write("[]").is_err());
        assert_eq!(cache.read(), None);
    }
}
