use tracing::{info, warn};

use gridlot_shared::{Region, Tier, quote_cents, to_snapshot_json};

use crate::animate::{Easing, ScrollAnimator};
use crate::cache::{LocalCache, decode_snapshot};
use crate::config::{GridConfig, ZOOM_STEP};
use crate::error::RegionError;
use crate::remote::RemoteStore;
use crate::render::{PaintInstruction, Selection, render};
use crate::store::{CoverageStats, RegionStore};
use crate::sync::{SyncAction, SyncController};
use crate::viewport::{CellRange, ViewportState};

/// Where the session's initial region set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    /// Intact local cache; the network was not touched.
    Cache,
    /// Remote store; the cache was absent or corrupt and has been reseeded.
    Remote,
    /// Neither was available; the session starts empty but interactive.
    Empty,
}

/// Outcome of a pointer selection, after block snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHit {
    /// The block is free and is now the selection.
    Selected { origin: (i32, i32) },
    /// The cell belongs to a committed region; focus moved to it.
    Owned { origin: (i32, i32) },
}

/// One user's session against the grid: the store, viewport, animator, sync
/// timers, cache and remote client, threaded through every operation instead
/// of living in module globals. Sessions are independent; tests run several
/// side by side.
///
/// All time comes in as caller-supplied millisecond timestamps. The session
/// never reads a clock, which keeps every timer and animation deterministic.
pub struct GridSession<C, R> {
    config: GridConfig,
    store: RegionStore,
    viewport: ViewportState,
    animator: ScrollAnimator,
    sync: SyncController,
    cache: C,
    remote: R,
    selection: Option<Selection>,
    last_sync_error: Option<RegionError>,
}

impl<C: LocalCache, R: RemoteStore> GridSession<C, R> {
    pub fn new(config: GridConfig, cache: C, remote: R) -> Self {
        let sync = SyncController::new(config.debounce_ms);
        Self {
            config,
            store: RegionStore::new(),
            viewport: ViewportState::default(),
            animator: ScrollAnimator::new(),
            sync,
            cache,
            remote,
            selection: None,
            last_sync_error: None,
        }
    }

    /// Startup: prefer an intact cache, fall back to the remote store, and
    /// stay interactive even when both are gone.
    pub async fn hydrate(&mut self) -> HydrationSource {
        if let Some(raw) = self.cache.read() {
            match decode_snapshot(&raw) {
                Ok(regions) => {
                    let count = regions.len();
                    self.store.replace_all(regions);
                    info!(regions = count, "hydrated from local cache");
                    return HydrationSource::Cache;
                }
                Err(e) => {
                    warn!(error = %e, "local cache corrupt, falling back to remote");
                }
            }
        }

        match self.remote.fetch_all().await {
            Ok(regions) => {
                let count = regions.len();
                self.store.replace_all(regions);
                // Reseed so the next launch starts warm.
                self.write_cache();
                self.last_sync_error = None;
                info!(regions = count, "hydrated from remote store");
                HydrationSource::Remote
            }
            Err(e) => {
                warn!(error = %e, "remote hydration failed, starting empty");
                self.last_sync_error = Some(RegionError::SyncFailure(e));
                HydrationSource::Empty
            }
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Most recent remote failure, cleared by the next successful exchange.
    pub fn last_sync_error(&self) -> Option<&RegionError> {
        self.last_sync_error.as_ref()
    }

    pub fn on_viewport_resize(&mut self, width: f64, height: f64) {
        self.viewport.viewport_width = width;
        self.viewport.viewport_height = height;
        self.reclamp_scroll();
    }

    /// Raw user scroll. The user taking the wheel cancels any recentering
    /// animation still in flight.
    pub fn on_scroll(&mut self, x: f64, y: f64) {
        self.animator.cancel();
        let (cx, cy) = self.viewport.clamp_scroll(x, y, &self.config);
        self.viewport.scroll_x = cx;
        self.viewport.scroll_y = cy;
    }

    /// Click in viewport coordinates: snap to the block grid, then either
    /// select the free block or focus the region that owns the cell. Clicks
    /// outside the canvas do nothing.
    pub fn on_pointer_select(&mut self, screen_x: f64, screen_y: f64) -> Option<PointerHit> {
        let (x, y) = self.viewport.screen_to_cell(screen_x, screen_y, &self.config);
        if x < 0 || y < 0 || x >= self.config.grid_width || y >= self.config.grid_height {
            return None;
        }

        if let Some(origin) = self.store.region_at(x, y).map(Region::origin) {
            self.viewport.focused_cell = Some(origin);
            return Some(PointerHit::Owned { origin });
        }

        self.selection = Some(Selection::block(x, y, self.config.block_size));
        self.viewport.focused_cell = Some((x, y));
        Some(PointerHit::Selected { origin: (x, y) })
    }

    /// Explicit coordinate entry: snap down to the block grid and select.
    pub fn select_block(&mut self, x: i32, y: i32) -> Result<(i32, i32), RegionError> {
        let block = self.config.block_size;
        let sx = x.div_euclid(block) * block;
        let sy = y.div_euclid(block) * block;
        if sx < 0 || sy < 0 || sx >= self.config.grid_width || sy >= self.config.grid_height {
            return Err(RegionError::OutOfBounds);
        }
        self.selection = Some(Selection::block(sx, sy, block));
        self.viewport.focused_cell = Some((sx, sy));
        Ok((sx, sy))
    }

    /// `select_block` plus a short recentering glide to the chosen cell.
    pub fn jump_to(&mut self, x: i32, y: i32, now: f64) -> Result<(i32, i32), RegionError> {
        let origin = self.select_block(x, y)?;
        let current = (self.viewport.scroll_x, self.viewport.scroll_y);
        let target = self.viewport.center_on(origin, &self.config);
        self.animator.animate_to(
            current,
            target,
            self.config.scroll_duration_ms,
            Easing::EaseOutQuad,
            now,
        );
        Ok(origin)
    }

    /// Apply a zoom level (clamped to the configured range). When a cell has
    /// focus the view glides to keep it centered at the new scale.
    pub fn on_zoom_change(&mut self, new_zoom: f64, now: f64) -> f64 {
        let zoom = self.config.clamp_zoom(new_zoom);
        if zoom != self.viewport.zoom {
            self.viewport.zoom = zoom;
            self.reclamp_scroll();
            if let Some(cell) = self.viewport.focused_cell {
                let current = (self.viewport.scroll_x, self.viewport.scroll_y);
                let target = self.viewport.center_on(cell, &self.config);
                self.animator.animate_to(
                    current,
                    target,
                    self.config.recenter_duration_ms,
                    Easing::EaseOutQuad,
                    now,
                );
            }
        }
        zoom
    }

    pub fn zoom_in(&mut self, now: f64) -> f64 {
        self.on_zoom_change(self.viewport.zoom + ZOOM_STEP, now)
    }

    pub fn zoom_out(&mut self, now: f64) -> f64 {
        self.on_zoom_change(self.viewport.zoom - ZOOM_STEP, now)
    }

    /// Commit a claim: validate and insert optimistically, drop the
    /// selection, arm the persistence debounce. The region is visible
    /// immediately; durability follows within the quiet window.
    pub fn on_purchase_confirmed(&mut self, region: Region, now: f64) -> Result<(), RegionError> {
        let origin = region.origin();
        self.store.insert(region, &self.config)?;
        self.selection = None;
        self.sync.note_mutation(now);
        info!(x = origin.0, y = origin.1, "region committed locally");
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Price of the current selection at a tier, in cents.
    pub fn quote_selection(&self, tier: Tier) -> Option<i64> {
        self.selection
            .as_ref()
            .map(|s| quote_cents(s.width, s.height, tier))
    }

    pub fn replace_region(
        &mut self,
        x: i32,
        y: i32,
        region: Region,
        now: f64,
    ) -> Result<Option<Region>, RegionError> {
        let displaced = self.store.replace_at(x, y, region, &self.config)?;
        self.sync.note_mutation(now);
        Ok(displaced)
    }

    pub fn remove_region(&mut self, x: i32, y: i32, now: f64) -> Option<Region> {
        let removed = self.store.remove(x, y);
        if removed.is_some() {
            self.sync.note_mutation(now);
        }
        removed
    }

    /// Per-frame step: advance any animation into the scroll offset, then run
    /// whatever sync work has come due. Returns true while an animation is
    /// still running, as the caller's repaint signal.
    pub async fn tick(&mut self, now: f64) -> bool {
        if let Some((x, y)) = self.animator.sample(now) {
            self.viewport.scroll_x = x;
            self.viewport.scroll_y = y;
        }

        for action in self.sync.poll(now) {
            match action {
                SyncAction::WriteCache => self.write_cache(),
                SyncAction::FlushRemote => self.flush(now).await,
            }
        }

        self.animator.is_animating()
    }

    /// Final cache write and flush, skipping the debounce wait.
    pub async fn teardown(&mut self, now: f64) {
        for action in self.sync.teardown() {
            match action {
                SyncAction::WriteCache => self.write_cache(),
                SyncAction::FlushRemote => self.flush(now).await,
            }
        }
        info!("session torn down");
    }

    pub fn visible_cells(&self) -> CellRange {
        self.viewport.visible_cells(&self.config)
    }

    pub fn paint(&self, cell_x: i32, cell_y: i32) -> PaintInstruction<'_> {
        render(
            cell_x,
            cell_y,
            &self.store,
            self.selection.as_ref(),
            self.viewport.zoom,
            self.config.block_size,
        )
    }

    /// One full paint pass over the visible range, origin cell first.
    pub fn paint_visible(&self) -> Vec<((i32, i32), PaintInstruction<'_>)> {
        let range = self.visible_cells();
        let block = self.config.block_size;
        let mut out = Vec::with_capacity(range.cell_count());
        for row in range.row_start..=range.row_end {
            for col in range.col_start..=range.col_end {
                let (x, y) = (col * block, row * block);
                out.push(((x, y), self.paint(x, y)));
            }
        }
        out
    }

    pub fn sold_stats(&self) -> CoverageStats {
        self.store.stats(&self.config)
    }

    fn reclamp_scroll(&mut self) {
        let (cx, cy) =
            self.viewport
                .clamp_scroll(self.viewport.scroll_x, self.viewport.scroll_y, &self.config);
        self.viewport.scroll_x = cx;
        self.viewport.scroll_y = cy;
    }

    fn write_cache(&mut self) {
        match to_snapshot_json(self.store.regions()) {
            Ok(snapshot) => {
                if let Err(e) = self.cache.write(&snapshot) {
                    warn!(error = %e, "cache write failed");
                }
            }
            Err(e) => warn!(error = %e, "cache serialize failed"),
        }
    }

    /// Send the pending set as of right now. Entries inserted during the
    /// flight are not part of this batch and survive the confirm.
    async fn flush(&mut self, now: f64) {
        let batch_len = self.store.pending_len();
        if batch_len == 0 {
            return;
        }
        let batch = self.store.pending()[..batch_len].to_vec();

        match self.remote.append(&batch).await {
            Ok(()) => {
                self.store.confirm_flushed(batch_len);
                self.last_sync_error = None;
                self.sync.note_flush_result(true, now);
                info!(count = batch_len, "flushed pending regions to remote");
            }
            Err(e) => {
                warn!(error = %e, pending = batch_len, "flush failed, retaining pending regions");
                self.last_sync_error = Some(RegionError::SyncFailure(e));
                self.sync.note_flush_result(false, now);
            }
        }
    }
}
