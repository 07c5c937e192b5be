use gridlot_shared::Region;

use crate::config::GridConfig;
use crate::error::RegionError;

/// Width and height must be positive multiples of the block size.
pub fn validate_dimensions(region: &Region, config: &GridConfig) -> Result<(), RegionError> {
    if region.width <= 0
        || region.height <= 0
        || region.width % config.block_size != 0
        || region.height % config.block_size != 0
    {
        return Err(RegionError::InvalidDimensions);
    }
    Ok(())
}

/// The whole rectangle must lie inside `[0, grid_width) x [0, grid_height)`.
/// A far edge flush with the grid edge is inside.
pub fn validate_bounds(region: &Region, config: &GridConfig) -> Result<(), RegionError> {
    if region.left() < 0
        || region.top() < 0
        || region.right() > config.grid_width
        || region.bottom() > config.grid_height
    {
        return Err(RegionError::OutOfBounds);
    }
    Ok(())
}

/// First committed region the candidate intersects, if any. Stops at the
/// first conflict rather than enumerating them all.
pub fn first_conflict<'a>(
    candidate: &Region,
    existing: impl IntoIterator<Item = &'a Region>,
) -> Option<&'a Region> {
    existing.into_iter().find(|r| candidate.overlaps(r))
}

/// Full candidate check, cheapest test first: dimensions, bounds, overlap.
pub fn validate_candidate<'a>(
    candidate: &Region,
    existing: impl IntoIterator<Item = &'a Region>,
    config: &GridConfig,
) -> Result<(), RegionError> {
    validate_dimensions(candidate, config)?;
    validate_bounds(candidate, config)?;
    if let Some(other) = first_conflict(candidate, existing) {
        return Err(RegionError::Overlap {
            other_x: other.origin_x,
            other_y: other.origin_y,
        });
    }
    Ok(())
}
