//! Coordinate conversion module
//!
//! Provides the Web Mercator projection from geographic coordinates
//! (latitude/longitude) to integer tile coordinates, and the projection of
//! a whole bounding box onto the tile grid across a list of zoom levels.

mod types;

pub use types::{GeoBounds, TileCoord, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use std::f64::consts::PI;

/// Projects a longitude onto the tile grid, before integer conversion.
///
/// A longitude of exactly +180 lands exactly on the grid's east edge
/// (`2^zoom`); it is folded into the last column. Any other out-of-range
/// longitude keeps its raw floor result.
#[inline]
fn tile_x_raw(lon: f64, zoom: u8) -> f64 {
    let n = 2f64.powi(zoom as i32);
    let pos = ((lon + 180.0) / 360.0) * n;
    let x = pos.floor();
    if pos == n {
        x - 1.0
    } else {
        x
    }
}

/// Projects a latitude onto the tile grid, before integer conversion.
///
/// Same east/south edge rule as [`tile_x_raw`]: a latitude projecting
/// exactly onto `2^zoom` folds into the last row.
#[inline]
fn tile_y_raw(lat: f64, zoom: u8) -> f64 {
    let n = 2f64.powi(zoom as i32);
    let lat_rad = lat * PI / 180.0;
    let pos = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;
    let y = pos.floor();
    if pos == n {
        y - 1.0
    } else {
        y
    }
}

/// Converts a longitude to a tile column at the given zoom level.
///
/// Valid input (-180 to 180 degrees) maps into `0..2^zoom`. Out-of-range
/// input is not rejected; it maps to a column outside the grid.
#[inline]
pub fn lon_to_tile_x(lon: f64, zoom: u8) -> i64 {
    tile_x_raw(lon, zoom) as i64
}

/// Converts a latitude to a tile row at the given zoom level.
///
/// Row index grows southward: the maximum latitude of a box maps to its
/// minimum row. Valid Web Mercator input ([`MIN_LAT`] to [`MAX_LAT`]) maps
/// into `0..2^zoom`; latitudes approaching the poles project far outside
/// the grid (the tangent blows up) and are returned as-is.
#[inline]
pub fn lat_to_tile_y(lat: f64, zoom: u8) -> i64 {
    tile_y_raw(lat, zoom) as i64
}

/// Computes the list of tiles intersecting `bounds` at each zoom level.
///
/// Zoom levels are processed in the order given (duplicates produce
/// duplicate tiles); within one zoom level tiles are emitted by ascending
/// column, then ascending row. The result is fully determined by the
/// inputs.
///
/// An inverted axis (`min > max`) or a NaN edge produces an empty range
/// for that zoom level rather than an error.
pub fn compute_tiles(bounds: &GeoBounds, zoom_levels: &[u8]) -> Vec<TileCoord> {
    let mut tiles = Vec::new();

    for &zoom in zoom_levels {
        let min_x = tile_x_raw(bounds.min_lon, zoom);
        let max_x = tile_x_raw(bounds.max_lon, zoom);
        let min_y = tile_y_raw(bounds.max_lat, zoom);
        let max_y = tile_y_raw(bounds.min_lat, zoom);

        // Compared as floats so a NaN edge empties the range instead of
        // being coerced to an index.
        if !(min_x <= max_x) || !(min_y <= max_y) {
            continue;
        }

        for x in (min_x as i64)..=(max_x as i64) {
            for y in (min_y as i64)..=(max_y as i64) {
                tiles.push(TileCoord { x, y, zoom });
            }
        }
    }

    tiles
}
