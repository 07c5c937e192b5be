pub const DEFAULT_GRID_WIDTH: i32 = 1500;
pub const DEFAULT_GRID_HEIGHT: i32 = 1000;
pub const DEFAULT_BLOCK_SIZE: i32 = 10;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;
pub const ZOOM_STEP: f64 = 0.5;

pub const DEFAULT_OVERSCAN_PX: f64 = 100.0;
pub const DEBOUNCE_WINDOW_MS: f64 = 1000.0;
pub const SCROLL_DURATION_MS: f64 = 300.0;
pub const RECENTER_DURATION_MS: f64 = 500.0;

/// Geometry and timing for one grid session. Constructed once per session;
/// everything downstream borrows it rather than reading globals.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Canvas extent in grid units.
    pub grid_width: i32,
    pub grid_height: i32,
    /// Minimum claim dimension; all claims snap to this pitch.
    pub block_size: i32,
    /// Extra margin around the viewport that still gets painted.
    pub overscan_px: f64,
    /// Quiet window for coalescing cache writes and remote flushes.
    pub debounce_ms: f64,
    pub scroll_duration_ms: f64,
    pub recenter_duration_ms: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            block_size: DEFAULT_BLOCK_SIZE,
            overscan_px: DEFAULT_OVERSCAN_PX,
            debounce_ms: DEBOUNCE_WINDOW_MS,
            scroll_duration_ms: SCROLL_DURATION_MS,
            recenter_duration_ms: RECENTER_DURATION_MS,
        }
    }
}

impl GridConfig {
    pub fn cols(&self) -> i32 {
        self.grid_width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.grid_height / self.block_size
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Scaled size of the whole canvas at a given zoom.
    pub fn content_extent(&self, zoom: f64) -> (f64, f64) {
        (
            self.grid_width as f64 * zoom,
            self.grid_height as f64 * zoom,
        )
    }

    pub fn is_block_aligned(&self, v: i32) -> bool {
        v.rem_euclid(self.block_size) == 0
    }
}
