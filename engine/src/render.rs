use gridlot_shared::Tier;

use crate::store::RegionStore;

pub const BASIC_FILL: &str = "blue";
pub const PREMIUM_FILL: &str = "gold";
pub const EMPTY_FILL: &str = "#e5e7eb";
/// Border accent for cells inside the current selection.
pub const SELECTION_ACCENT: &str = "#3b82f6";

/// The in-progress claim: created on cell click or coordinate entry,
/// discarded once the purchase completes or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Selection {
    /// A single-block selection anchored at `(x, y)`.
    pub fn block(x: i32, y: i32, block_size: i32) -> Self {
        Self {
            x,
            y,
            width: block_size,
            height: block_size,
        }
    }

    pub fn contains(&self, cell_x: i32, cell_y: i32) -> bool {
        cell_x >= self.x
            && cell_x < self.x + self.width
            && cell_y >= self.y
            && cell_y < self.y + self.height
    }
}

/// One cell's draw order: scaled placement, fill, optional media to
/// composite, and whether the selection highlight applies.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintInstruction<'a> {
    pub scaled_x: f64,
    pub scaled_y: f64,
    pub scaled_size: f64,
    pub fill: &'static str,
    pub media_ref: Option<&'a str>,
    pub highlighted: bool,
}

/// Pure cell -> paint mapping, called once per visible cell per pass. Media
/// is reported only at the owning region's origin cell, where it anchors;
/// the rest of the footprint gets the tier fill.
pub fn render<'a>(
    cell_x: i32,
    cell_y: i32,
    store: &'a RegionStore,
    selection: Option<&Selection>,
    zoom: f64,
    block_size: i32,
) -> PaintInstruction<'a> {
    let region = store.region_at(cell_x, cell_y);

    let fill = match region.map(|r| r.tier) {
        Some(Tier::Basic) => BASIC_FILL,
        Some(Tier::Premium) => PREMIUM_FILL,
        None => EMPTY_FILL,
    };

    let media_ref = region
        .filter(|r| r.origin() == (cell_x, cell_y))
        .and_then(|r| r.media_ref.as_deref());

    let highlighted = selection.is_some_and(|s| s.contains(cell_x, cell_y));

    PaintInstruction {
        scaled_x: cell_x as f64 * zoom,
        scaled_y: cell_y as f64 * zoom,
        scaled_size: block_size as f64 * zoom,
        fill,
        media_ref,
        highlighted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use chrono::Utc;
    use gridlot_shared::Region;

    fn region(x: i32, y: i32, width: i32, height: i32, tier: Tier, media: Option<&str>) -> Region {
        Region {
            origin_x: x,
            origin_y: y,
            width,
            height,
            owner: "alice".to_string(),
            media_ref: media.map(str::to_owned),
            media_width: None,
            media_height: None,
            tier,
            purchased_at: Utc::now(),
        }
    }

    fn store_with(regions: Vec<Region>) -> RegionStore {
        let config = GridConfig::default();
        let mut store = RegionStore::new();
        for r in regions {
            store.insert(r, &config).expect("test region should insert");
        }
        store
    }

    #[test]
    fn empty_cells_get_the_background_fill() {
        let store = store_with(vec![]);
        let paint = render(40, 40, &store, None, 1.0, 10);
        assert_eq!(paint.fill, EMPTY_FILL);
        assert_eq!(paint.media_ref, None);
        assert!(!paint.highlighted);
    }

    #[test]
    fn owned_cells_fill_by_tier() {
        let store = store_with(vec![
            region(0, 0, 10, 10, Tier::Basic, None),
            region(20, 0, 20, 20, Tier::Premium, None),
        ]);

        assert_eq!(render(0, 0, &store, None, 1.0, 10).fill, BASIC_FILL);
        assert_eq!(render(20, 0, &store, None, 1.0, 10).fill, PREMIUM_FILL);
        // Interior cell of the premium footprint, not its origin.
        assert_eq!(render(30, 10, &store, None, 1.0, 10).fill, PREMIUM_FILL);
    }

    #[test]
    fn media_anchors_at_the_region_origin_only() {
        let store = store_with(vec![region(
            0,
            0,
            20,
            20,
            Tier::Premium,
            Some("https://cdn.example/ad.png"),
        )]);

        assert_eq!(
            render(0, 0, &store, None, 1.0, 10).media_ref,
            Some("https://cdn.example/ad.png")
        );
        assert_eq!(render(10, 10, &store, None, 1.0, 10).media_ref, None);
    }

    #[test]
    fn selection_highlights_every_cell_it_covers() {
        let store = store_with(vec![]);
        let selection = Selection {
            x: 50,
            y: 50,
            width: 20,
            height: 10,
        };

        assert!(render(50, 50, &store, Some(&selection), 1.0, 10).highlighted);
        assert!(render(60, 50, &store, Some(&selection), 1.0, 10).highlighted);
        assert!(!render(70, 50, &store, Some(&selection), 1.0, 10).highlighted);
        assert!(!render(50, 60, &store, Some(&selection), 1.0, 10).highlighted);
    }

    #[test]
    fn placement_scales_with_zoom() {
        let store = store_with(vec![]);
        let paint = render(30, 40, &store, None, 2.0, 10);
        assert_eq!(paint.scaled_x, 60.0);
        assert_eq!(paint.scaled_y, 80.0);
        assert_eq!(paint.scaled_size, 20.0);
    }

    #[test]
    fn an_owned_cell_can_also_be_highlighted() {
        let store = store_with(vec![region(0, 0, 10, 10, Tier::Basic, None)]);
        let selection = Selection::block(0, 0, 10);
        let paint = render(0, 0, &store, Some(&selection), 1.0, 10);
        assert_eq!(paint.fill, BASIC_FILL);
        assert!(paint.highlighted);
    }
}
