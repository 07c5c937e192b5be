/// Everything that can go wrong inside the grid engine.
///
/// The first three variants are detected synchronously while validating a
/// candidate claim. `CacheCorrupt` and `SyncFailure` come out of the sync
/// layer; neither is fatal, the session keeps running on in-memory state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    /// Candidate intersects the committed region whose origin is carried here.
    #[error("region overlaps existing region at ({other_x}, {other_y})")]
    Overlap { other_x: i32, other_y: i32 },
    #[error("region extends outside the grid")]
    OutOfBounds,
    #[error("region dimensions must be positive multiples of the block size")]
    InvalidDimensions,
    /// Snapshot failed structural validation; the cache is discarded whole.
    #[error("local cache snapshot is corrupt: {0}")]
    CacheCorrupt(String),
    /// Remote store unreachable or rejected a write. Pending entries are
    /// retained for the next flush cycle; optimistic state is not rolled back.
    #[error("sync with remote store failed: {0}")]
    SyncFailure(String),
}

#[cfg(test)]
mod tests {
    use super::RegionError;

    #[test]
    fn overlap_message_names_the_conflicting_origin() {
        let err = RegionError::Overlap {
            other_x: 30,
            other_y: 40,
        };
        assert_eq!(
            err.to_string(),
            "region overlaps existing region at (30, 40)"
        );
    }

    #[test]
    fn sync_failure_carries_context() {
        let err = RegionError::SyncFailure("HTTP 503".to_string());
        assert!(err.to_string().contains("HTTP 503"));
    }
}
