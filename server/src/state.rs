use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use gridlot_shared::{Region, RegionMap, payload_checksum, to_snapshot_json, to_snapshot_json_pretty};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// The authoritative region set plus its pre-serialized wire form.
///
/// `snapshot_json` is rebuilt on every mutation so `GET /api/regions` is a
/// cheap buffer clone, and `etag` tracks the serialized bytes for
/// `If-None-Match` revalidation.
pub struct RegionSnapshot {
    pub regions: RegionMap,
    pub snapshot_json: Arc<Bytes>,
    pub etag: String,
}

impl Default for RegionSnapshot {
    fn default() -> Self {
        let payload = Bytes::from_static(b"[]");
        let etag = etag_for(&payload);
        Self {
            regions: RegionMap::new(),
            snapshot_json: Arc::new(payload),
            etag,
        }
    }
}

impl RegionSnapshot {
    /// Re-serializes `regions` into the cached payload. On a serialization
    /// failure the previous payload is kept so reads stay self-consistent.
    fn rebuild_payload(&mut self) {
        match to_snapshot_json(&self.regions) {
            Ok(json) => {
                let payload = Bytes::from(json);
                self.etag = etag_for(&payload);
                self.snapshot_json = Arc::new(payload);
            }
            Err(e) => warn!(error = %e, "failed to rebuild region snapshot payload"),
        }
    }
}

fn etag_for(payload: &Bytes) -> String {
    format!("\"{:08x}\"", payload_checksum(payload))
}

#[derive(Clone)]
pub struct AppState {
    pub regions: Arc<RwLock<RegionSnapshot>>,
    /// Bumped on every accepted mutation.
    pub revision: Arc<AtomicU64>,
    /// Set when the region set has changed since the last successful persist.
    pub dirty: Arc<AtomicBool>,
    pub data_path: Arc<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub observability: Arc<ObservabilityCounters>,
}

impl AppState {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            regions: Arc::new(RwLock::new(RegionSnapshot::default())),
            revision: Arc::new(AtomicU64::new(0)),
            dirty: Arc::new(AtomicBool::new(false)),
            data_path: Arc::new(data_path),
            started_at: Utc::now(),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    /// Seeds the region set from the snapshot file. A missing file is a
    /// normal first launch; a malformed one is an error so the caller can
    /// refuse to start instead of clobbering good data with an empty set.
    pub async fn load_from_disk(&self) -> Result<usize, String> {
        let raw = match tokio::fs::read(self.data_path.as_ref()).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.data_path.display(), "no region snapshot on disk, starting empty");
                return Ok(0);
            }
            Err(e) => return Err(format!("read {}: {e}", self.data_path.display())),
        };

        let regions: Vec<Region> = serde_json::from_slice(&raw)
            .map_err(|e| format!("parse {}: {e}", self.data_path.display()))?;

        let mut map = RegionMap::with_capacity(regions.len());
        for region in regions {
            if let Some(previous) = map.insert(region.origin(), region) {
                warn!(
                    x = previous.origin_x,
                    y = previous.origin_y,
                    "duplicate origin in snapshot file, keeping the later entry"
                );
            }
        }

        let count = map.len();
        let mut snapshot = self.regions.write().await;
        snapshot.regions = map;
        snapshot.rebuild_payload();
        Ok(count)
    }

    /// Upserts a batch keyed by origin and returns `(stored, total)`.
    pub async fn upsert_regions(&self, batch: Vec<Region>) -> (usize, usize) {
        let stored = batch.len();
        let mut snapshot = self.regions.write().await;
        for region in batch {
            snapshot.regions.insert(region.origin(), region);
        }
        snapshot.rebuild_payload();
        let total = snapshot.regions.len();
        drop(snapshot);

        self.mark_mutated();
        (stored, total)
    }

    pub async fn remove_region(&self, x: i32, y: i32) -> Option<Region> {
        let mut snapshot = self.regions.write().await;
        let removed = snapshot.regions.remove(&(x, y))?;
        snapshot.rebuild_payload();
        drop(snapshot);

        self.mark_mutated();
        Some(removed)
    }

    /// Writes the current snapshot to `data_path` through a temp-file rename
    /// so a crash mid-write never truncates the previous snapshot. The store
    /// file is pretty-printed; only the wire payload is compact.
    pub async fn persist_to_disk(&self) -> Result<usize, String> {
        let (payload, count) = {
            let snapshot = self.regions.read().await;
            let payload = to_snapshot_json_pretty(&snapshot.regions)?;
            (payload, snapshot.regions.len())
        };

        let path = self.data_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| format!("create {}: {e}", parent.display()))?;
            }
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload.as_bytes())
            .await
            .map_err(|e| format!("write {}: {e}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| format!("rename {} -> {}: {e}", tmp.display(), path.display()))?;
        Ok(count)
    }

    fn mark_mutated(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
        self.dirty.store(true, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    regions_requests_total: AtomicU64,
    regions_not_modified_total: AtomicU64,
    append_requests_total: AtomicU64,
    regions_upserted_total: AtomicU64,
    removal_requests_total: AtomicU64,
    persist_failures_total: AtomicU64,
    snapshots_persisted_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub regions_requests_total: u64,
    pub regions_not_modified_total: u64,
    pub append_requests_total: u64,
    pub regions_upserted_total: u64,
    pub removal_requests_total: u64,
    pub persist_failures_total: u64,
    pub snapshots_persisted_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            regions_requests_total: self.regions_requests_total.load(Ordering::Relaxed),
            regions_not_modified_total: self.regions_not_modified_total.load(Ordering::Relaxed),
            append_requests_total: self.append_requests_total.load(Ordering::Relaxed),
            regions_upserted_total: self.regions_upserted_total.load(Ordering::Relaxed),
            removal_requests_total: self.removal_requests_total.load(Ordering::Relaxed),
            persist_failures_total: self.persist_failures_total.load(Ordering::Relaxed),
            snapshots_persisted_total: self.snapshots_persisted_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_regions_request(&self) {
        self.regions_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_regions_not_modified(&self) {
        self.regions_not_modified_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_append_request(&self) {
        self.append_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_regions_upserted(&self, count: u64) {
        self.regions_upserted_total
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_removal_request(&self) {
        self.removal_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot_persisted(&self) {
        self.snapshots_persisted_total
            .fetch_add(1, Ordering::Relaxed);
    }
}
