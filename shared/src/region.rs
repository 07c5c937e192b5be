use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region set keyed by origin coordinate, as held by the store on both ends.
pub type RegionMap = HashMap<(i32, i32), Region>;

/// Purchase tier. Premium regions cost more and carry richer media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Basic,
    Premium,
}

/// A purchased rectangle on the shared canvas. `origin_x`/`origin_y` is the
/// top-left corner in grid coordinates; committed regions never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: i32,
    pub height: i32,
    pub owner: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_width: Option<u32>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_height: Option<u32>,
    pub tier: Tier,
    pub purchased_at: DateTime<Utc>,
}

impl Region {
    pub const fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    pub const fn left(&self) -> i32 {
        self.origin_x
    }

    pub const fn right(&self) -> i32 {
        self.origin_x + self.width
    }

    pub const fn top(&self) -> i32 {
        self.origin_y
    }

    pub const fn bottom(&self) -> i32 {
        self.origin_y + self.height
    }

    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Strict axis-aligned intersection test. Regions that merely share an
    /// edge or a corner do NOT overlap.
    pub const fn overlaps(&self, other: &Region) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether the grid point `(x, y)` falls inside this rectangle.
    /// Right and bottom edges are exclusive.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }
}
