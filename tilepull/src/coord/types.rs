//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Geographic bounding box in degrees.
///
/// Consumers of the projection math treat `min_lat <= max_lat` and
/// `min_lon <= max_lon` as a precondition; nothing here validates or
/// corrects inverted bounds. Use [`GeoBounds::is_well_formed`] to
/// sanity-check caller input before projecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Southern edge, degrees.
    pub min_lat: f64,
    /// Northern edge, degrees.
    pub max_lat: f64,
    /// Western edge, degrees.
    pub min_lon: f64,
    /// Eastern edge, degrees.
    pub max_lon: f64,
}

impl GeoBounds {
    /// Creates a bounding box from its four edges.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Checks that the edges are ordered and inside the Web Mercator
    /// projection's valid range.
    pub fn is_well_formed(&self) -> bool {
        self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
            && (MIN_LAT..=MAX_LAT).contains(&self.min_lat)
            && (MIN_LAT..=MAX_LAT).contains(&self.max_lat)
            && (MIN_LON..=MAX_LON).contains(&self.min_lon)
            && (MIN_LON..=MAX_LON).contains(&self.max_lon)
    }
}

/// Tile coordinates in the Web Mercator / Slippy Map system.
///
/// `x` is the column (0 at west, growing east) and `y` the row (0 at north,
/// growing south) within the `2^zoom` by `2^zoom` grid. The fields are
/// signed: projecting degenerate input (polar latitudes, longitudes past
/// the antimeridian) yields indices outside the grid, and those survive
/// here as ordinary values for callers to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X coordinate (east-west), 0 at west
    pub x: i64,
    /// Y coordinate (north-south), 0 at north
    pub y: i64,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Creates a tile coordinate.
    #[inline]
    pub fn new(x: i64, y: i64, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Checks whether this coordinate lies inside the `2^zoom` grid.
    ///
    /// Degenerate bounding boxes project to rows or columns outside the
    /// grid; this is the guard callers apply before trusting a coordinate.
    pub fn is_in_grid(&self) -> bool {
        let n = 2f64.powi(self.zoom as i32);
        let x = self.x as f64;
        let y = self.y as f64;
        x >= 0.0 && x < n && y >= 0.0 && y < n
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_bounds() {
        let bounds = GeoBounds::new(47.3, 47.7, 8.4, 8.7);
        assert!(bounds.is_well_formed());
    }

    #[test]
    fn test_inverted_bounds_not_well_formed() {
        let bounds = GeoBounds::new(47.7, 47.3, 8.4, 8.7);
        assert!(!bounds.is_well_formed());
    }

    #[test]
    fn test_polar_bounds_not_well_formed() {
        let bounds = GeoBounds::new(-90.0, 90.0, -180.0, 180.0);
        assert!(!bounds.is_well_formed());
    }

    #[test]
    fn test_display_format() {
        let coord = TileCoord::new(1, 2, 3);
        assert_eq!(coord.to_string(), "3/1/2");
    }

    #[test]
    fn test_is_in_grid() {
        assert!(TileCoord::new(0, 0, 0).is_in_grid());
        assert!(!TileCoord::new(1, 0, 0).is_in_grid());
        assert!(TileCoord::new(7, 7, 3).is_in_grid());
        assert!(!TileCoord::new(8, 7, 3).is_in_grid());
        assert!(!TileCoord::new(-1, 0, 3).is_in_grid());
        assert!(!TileCoord::new(0, -6, 3).is_in_grid());
    }
}
