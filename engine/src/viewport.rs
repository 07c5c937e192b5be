use crate::config::GridConfig;

/// Pan/zoom state for one session: scroll offset and zoom into scaled space,
/// plus the measured viewport size. Never persisted.
#[derive(Debug, Clone)]
pub struct ViewportState {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Cell the view recenters on when the zoom changes.
    pub focused_cell: Option<(i32, i32)>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
            focused_cell: None,
        }
    }
}

/// Inclusive range of visible cell indices (base-size columns and rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub col_start: i32,
    pub col_end: i32,
    pub row_start: i32,
    pub row_end: i32,
}

impl CellRange {
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.col_start && col <= self.col_end && row >= self.row_start && row <= self.row_end
    }

    pub fn cell_count(&self) -> usize {
        let cols = (self.col_end - self.col_start + 1).max(0) as usize;
        let rows = (self.row_end - self.row_start + 1).max(0) as usize;
        cols * rows
    }
}

/// Grid space -> scaled space.
pub fn grid_to_scaled(p: f64, zoom: f64) -> f64 {
    p * zoom
}

/// Screen/viewport coordinate -> grid coordinate, snapped down to the base
/// block grid. Snapping is independent of zoom, so claims stay grid-aligned
/// at every zoom level. Points left/above the canvas come back negative;
/// callers decide whether to ignore them.
pub fn screen_to_grid(screen: f64, scroll: f64, zoom: f64, block_size: i32) -> i32 {
    let cell = block_size as f64 * zoom;
    ((screen + scroll) / cell).floor() as i32 * block_size
}

fn axis_range(scroll: f64, viewport_len: f64, zoom: f64, overscan: f64, block_size: i32, cells: i32) -> (i32, i32) {
    let cell = block_size as f64 * zoom;
    let lo = scroll - overscan;
    let hi = scroll + viewport_len + overscan;

    let start = (lo / cell).floor() as i32;
    let end = (hi / cell).ceil() as i32 - 1;

    (start.clamp(0, cells - 1), end.clamp(0, cells - 1))
}

impl ViewportState {
    /// Grid coordinate under a screen point, block-aligned.
    pub fn screen_to_cell(&self, screen_x: f64, screen_y: f64, config: &GridConfig) -> (i32, i32) {
        (
            screen_to_grid(screen_x, self.scroll_x, self.zoom, config.block_size),
            screen_to_grid(screen_y, self.scroll_y, self.zoom, config.block_size),
        )
    }

    /// Cell indices whose scaled boxes intersect the viewport plus overscan.
    /// The overscan margin pre-renders cells just outside the edge so fast
    /// scrolling does not expose blank cells before the next paint.
    pub fn visible_cells(&self, config: &GridConfig) -> CellRange {
        let (col_start, col_end) = axis_range(
            self.scroll_x,
            self.viewport_width,
            self.zoom,
            config.overscan_px,
            config.block_size,
            config.cols(),
        );
        let (row_start, row_end) = axis_range(
            self.scroll_y,
            self.viewport_height,
            self.zoom,
            config.overscan_px,
            config.block_size,
            config.rows(),
        );

        CellRange {
            col_start,
            col_end,
            row_start,
            row_end,
        }
    }

    /// Scroll offset that puts the scaled center of `cell` at the viewport
    /// center, clamped so the target stays reachable.
    pub fn center_on(&self, cell: (i32, i32), config: &GridConfig) -> (f64, f64) {
        let half_block = config.block_size as f64 * self.zoom / 2.0;
        let target_x = cell.0 as f64 * self.zoom - self.viewport_width / 2.0 + half_block;
        let target_y = cell.1 as f64 * self.zoom - self.viewport_height / 2.0 + half_block;
        self.clamp_scroll(target_x, target_y, config)
    }

    /// Clamp an offset to `[0, content - viewport]` per axis.
    pub fn clamp_scroll(&self, x: f64, y: f64, config: &GridConfig) -> (f64, f64) {
        let (content_w, content_h) = config.content_extent(self.zoom);
        let max_x = (content_w - self.viewport_width).max(0.0);
        let max_y = (content_h - self.viewport_height).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll_x: f64, scroll_y: f64, zoom: f64, w: f64, h: f64) -> ViewportState {
        ViewportState {
            scroll_x,
            scroll_y,
            zoom,
            viewport_width: w,
            viewport_height: h,
            focused_cell: None,
        }
    }

    #[test]
    fn click_snaps_to_block_grid_at_every_zoom() {
        let config = GridConfig::default();
        for zoom in [0.5, 1.0, 2.0, 3.5, 5.0] {
            let v = viewport(35.0, 35.0, zoom, 800.0, 600.0);
            let (gx, gy) = v.screen_to_cell(12.0, 12.0, &config);
            assert_eq!(gx % 10, 0, "zoom {zoom}");
            assert_eq!(gy % 10, 0, "zoom {zoom}");
        }
    }

    #[test]
    fn block_aligned_cells_round_trip_through_scaling() {
        let config = GridConfig::default();
        for zoom in [0.5, 1.0, 2.0, 3.5, 5.0] {
            for (x, y) in [(0, 0), (500, 500), (1490, 990), (730, 120)] {
                let scroll = (128.0, 64.0);
                let screen_x = grid_to_scaled(x as f64, zoom) - scroll.0;
                let screen_y = grid_to_scaled(y as f64, zoom) - scroll.1;
                let v = viewport(scroll.0, scroll.1, zoom, 800.0, 600.0);
                assert_eq!(v.screen_to_cell(screen_x, screen_y, &config), (x, y));
            }
        }
    }

    #[test]
    fn points_left_of_the_canvas_map_to_negative_cells() {
        let config = GridConfig::default();
        let v = viewport(0.0, 0.0, 1.0, 800.0, 600.0);
        let (gx, _) = v.screen_to_cell(-50.0, 0.0, &config);
        assert_eq!(gx, -50);
    }

    #[test]
    fn visible_range_covers_viewport_without_overscan() {
        let config = GridConfig {
            overscan_px: 0.0,
            ..GridConfig::default()
        };
        let v = viewport(0.0, 0.0, 1.0, 500.0, 400.0);
        let range = v.visible_cells(&config);
        assert_eq!(
            range,
            CellRange {
                col_start: 0,
                col_end: 49,
                row_start: 0,
                row_end: 39,
            }
        );
    }

    #[test]
    fn overscan_widens_the_range_and_clamps_at_grid_edges() {
        let config = GridConfig::default(); // overscan 100px
        let v = viewport(0.0, 0.0, 1.0, 500.0, 400.0);
        let range = v.visible_cells(&config);
        // Left/top clamp to the grid edge; right/bottom extend 10 cells.
        assert_eq!(range.col_start, 0);
        assert_eq!(range.col_end, 59);
        assert_eq!(range.row_start, 0);
        assert_eq!(range.row_end, 49);
    }

    #[test]
    fn every_returned_cell_intersects_the_scan_window() {
        let config = GridConfig::default();
        let v = viewport(333.0, 178.0, 2.0, 800.0, 600.0);
        let range = v.visible_cells(&config);
        let cell = config.block_size as f64 * v.zoom;

        let x_lo = v.scroll_x - config.overscan_px;
        let x_hi = v.scroll_x + v.viewport_width + config.overscan_px;
        for col in range.col_start..=range.col_end {
            let left = col as f64 * cell;
            assert!(left < x_hi && left + cell > x_lo, "col {col} outside window");
        }
        // Neighbours just past each end must not intersect (unless clamped).
        if range.col_start > 0 {
            let left = (range.col_start - 1) as f64 * cell;
            assert!(left + cell <= x_lo);
        }
        if range.col_end < config.cols() - 1 {
            let left = (range.col_end + 1) as f64 * cell;
            assert!(left >= x_hi);
        }
    }

    #[test]
    fn center_on_places_the_cell_center_mid_viewport() {
        let config = GridConfig::default();
        let v = viewport(0.0, 0.0, 2.0, 800.0, 600.0);
        let (tx, ty) = v.center_on((500, 500), &config);
        assert_eq!(tx, 610.0);
        assert_eq!(ty, 710.0);

        // The scaled cell center lands exactly mid-viewport.
        let cell_center_x = 500.0 * v.zoom + config.block_size as f64 * v.zoom / 2.0;
        assert_eq!(cell_center_x - tx, v.viewport_width / 2.0);
    }

    #[test]
    fn center_on_clamps_to_the_content_extent() {
        let config = GridConfig::default();
        let v = viewport(0.0, 0.0, 1.0, 800.0, 600.0);
        assert_eq!(v.center_on((0, 0), &config), (0.0, 0.0));
        assert_eq!(v.center_on((1490, 990), &config), (700.0, 400.0));
    }

    #[test]
    fn scroll_clamps_to_zero_when_content_fits_in_viewport() {
        let config = GridConfig::default();
        let v = viewport(0.0, 0.0, 0.5, 800.0, 600.0);
        // Content at zoom 0.5 is 750x500, smaller than the viewport.
        assert_eq!(v.clamp_scroll(100.0, 100.0, &config), (0.0, 0.0));
    }

    #[test]
    fn cell_range_contains_and_counts() {
        let range = CellRange {
            col_start: 2,
            col_end: 4,
            row_start: 1,
            row_end: 1,
        };
        assert!(range.contains(3, 1));
        assert!(!range.contains(5, 1));
        assert!(!range.contains(3, 0));
        assert_eq!(range.cell_count(), 3);
    }
}
