use crate::region::{Region, RegionMap};

/// Regions in canonical snapshot order: row-major by origin. Serializing the
/// same set always yields the same bytes, so checksums and ETags computed
/// from a snapshot are stable across processes and restarts.
pub fn snapshot_order(regions: &RegionMap) -> Vec<&Region> {
    let mut ordered: Vec<&Region> = regions.values().collect();
    ordered.sort_by_key(|r| (r.origin_y, r.origin_x));
    ordered
}

/// Compact snapshot JSON (wire payloads, local cache).
pub fn to_snapshot_json(regions: &RegionMap) -> Result<String, String> {
    serde_json::to_string(&snapshot_order(regions))
        .map_err(|e| format!("serialize snapshot: {e}"))
}

/// Pretty snapshot JSON (the on-disk store file).
pub fn to_snapshot_json_pretty(regions: &RegionMap) -> Result<String, String> {
    serde_json::to_string_pretty(&snapshot_order(regions))
        .map_err(|e| format!("serialize snapshot: {e}"))
}

/// CRC32 of a serialized snapshot, used as a cheap content fingerprint.
pub fn payload_checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Tier;
    use chrono::{TimeZone, Utc};

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
            purchased_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn snapshot_order_is_row_major() {
        let mut map = RegionMap::new();
        for r in [region(20, 0), region(0, 10), region(0, 0), region(10, 0)] {
            map.insert(r.origin(), r);
        }

        let origins: Vec<(i32, i32)> = snapshot_order(&map).iter().map(|r| r.origin()).collect();
        assert_eq!(origins, vec![(0, 0), (10, 0), (20, 0), (0, 10)]);
    }

    #[test]
    fn identical_sets_serialize_identically() {
        let regions = [region(0, 0), region(30, 40), region(10, 0)];

        let mut forward = RegionMap::new();
        for r in regions.iter().cloned() {
            forward.insert(r.origin(), r);
        }
        let mut reversed = RegionMap::new();
        for r in regions.iter().rev().cloned() {
            reversed.insert(r.origin(), r);
        }

        let a = to_snapshot_json(&forward).unwrap();
        let b = to_snapshot_json(&reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            payload_checksum(a.as_bytes()),
            payload_checksum(b.as_bytes())
        );
    }

    #[test]
    fn checksum_differs_when_contents_differ() {
        let mut map = RegionMap::new();
        map.insert((0, 0), region(0, 0));
        let a = to_snapshot_json(&map).unwrap();

        map.insert((10, 0), region(10, 0));
        let b = to_snapshot_json(&map).unwrap();

        assert_ne!(
            payload_checksum(a.as_bytes()),
            payload_checksum(b.as_bytes())
        );
    }

    #[test]
    fn empty_snapshot_is_an_empty_array() {
        assert_eq!(to_snapshot_json(&RegionMap::new()).unwrap(), "[]");
    }
}
