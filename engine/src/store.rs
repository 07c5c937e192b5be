use gridlot_shared::{Region, RegionMap};

use crate::config::GridConfig;
use crate::error::RegionError;
use crate::validate::validate_candidate;

/// Sold-area summary for the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageStats {
    pub regions: usize,
    pub sold_area: i64,
    /// Sold fraction of the grid, `0.0..=1.0`.
    pub coverage: f64,
}

/// The authoritative in-session map of committed regions, keyed by origin,
/// plus the ordered set of regions not yet confirmed by the remote store.
///
/// Invariant: no two committed regions overlap. `insert` and `replace_at`
/// enforce it; `replace_all` trusts the authoritative payload it is given.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    regions: RegionMap,
    pending: Vec<Region>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Exact-origin lookup.
    pub fn get(&self, x: i32, y: i32) -> Option<&Region> {
        self.regions.get(&(x, y))
    }

    /// Region covering the grid point `(x, y)`, origin or not. Exact-origin
    /// fast path first; otherwise a linear scan, and since committed regions
    /// never overlap at most one can match.
    pub fn region_at(&self, x: i32, y: i32) -> Option<&Region> {
        if let Some(region) = self.regions.get(&(x, y)) {
            return Some(region);
        }
        self.regions.values().find(|r| r.contains(x, y))
    }

    /// Regions intersecting the half-open query rectangle
    /// `[x_min, x_max) x [y_min, y_max)`. Linear scan over the full set;
    /// fine at tens of thousands of regions, the known ceiling beyond that.
    pub fn query_range(&self, x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Vec<&Region> {
        self.regions
            .values()
            .filter(|r| r.left() < x_max && r.right() > x_min && r.top() < y_max && r.bottom() > y_min)
            .collect()
    }

    /// Validate and commit a claim. On success the region is also appended
    /// to the pending set for the next remote flush.
    pub fn insert(&mut self, region: Region, config: &GridConfig) -> Result<(), RegionError> {
        validate_candidate(&region, self.regions.values(), config)?;
        self.regions.insert(region.origin(), region.clone());
        self.pending.push(region);
        Ok(())
    }

    /// Bulk reset from an authoritative snapshot. Clears the pending set;
    /// the input is trusted to already satisfy the non-overlap invariant.
    pub fn replace_all(&mut self, regions: Vec<Region>) {
        self.regions = regions.into_iter().map(|r| (r.origin(), r)).collect();
        self.pending.clear();
    }

    /// Replace the region keyed at `(x, y)`. The replacement is validated
    /// against the remaining set; on failure the incumbent is restored and
    /// nothing changes. Returns the displaced incumbent.
    pub fn replace_at(
        &mut self,
        x: i32,
        y: i32,
        region: Region,
        config: &GridConfig,
    ) -> Result<Option<Region>, RegionError> {
        let incumbent = self.regions.remove(&(x, y));
        if let Err(err) = validate_candidate(&region, self.regions.values(), config) {
            if let Some(previous) = incumbent {
                self.regions.insert((x, y), previous);
            }
            return Err(err);
        }
        self.regions.insert(region.origin(), region.clone());
        self.pending.push(region);
        Ok(incumbent)
    }

    /// Remove by exact origin. Does not touch the pending set.
    pub fn remove(&mut self, x: i32, y: i32) -> Option<Region> {
        self.regions.remove(&(x, y))
    }

    pub fn stats(&self, config: &GridConfig) -> CoverageStats {
        let sold_area: i64 = self.regions.values().map(Region::area).sum();
        let total = config.grid_width as i64 * config.grid_height as i64;
        CoverageStats {
            regions: self.regions.len(),
            sold_area,
            coverage: if total > 0 {
                sold_area as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    pub fn pending(&self) -> &[Region] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop the first `n` pending entries after the remote store confirmed
    /// them. Entries appended while that flush was in flight stay queued.
    pub fn confirm_flushed(&mut self, n: usize) {
        let n = n.min(self.pending.len());
        self.pending.drain(..n);
    }
}
