//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (longitude/latitude)
//! and the Web Mercator scene plane: continuous world pixel coordinates and
//! the tile grid laid over them.

mod types;

pub use types::{
    CoordError, EnuRect, GeoPoint, PixelPoint, PixelRect, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Side length of the whole world in pixels at the given zoom level.
#[inline]
pub fn world_size(zoom: u8, tile_size: u32) -> f64 {
    tile_size as f64 * 2.0_f64.powi(zoom as i32)
}

/// Converts a geographic point to world pixel coordinates.
///
/// Latitude is clamped to the Web Mercator range so that the result is
/// always finite. The pixel origin is the north-west corner of the world.
#[inline]
pub fn to_world_pixel(point: GeoPoint, zoom: u8, tile_size: u32) -> PixelPoint {
    let size = world_size(zoom, tile_size);
    let lat = point.lat.clamp(MIN_LAT, MAX_LAT);

    let x = (point.lon + 180.0) / 360.0 * size;

    // Web Mercator: y = (1 - asinh(tan(lat)) / pi) / 2
    let lat_rad = lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;

    PixelPoint::new(x, y)
}

/// Converts world pixel coordinates back to a geographic point.
#[inline]
pub fn from_world_pixel(pixel: PixelPoint, zoom: u8, tile_size: u32) -> GeoPoint {
    let size = world_size(zoom, tile_size);

    let lon = pixel.x / size * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = pixel.y / size;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

    GeoPoint::new(lon, lat)
}

/// Converts a geographic point to the tile containing it.
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(point: GeoPoint, zoom: u8) -> Result<TileCoord, CoordError> {
    let point = GeoPoint::try_new(point.lon, point.lat)?;
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let max_index = n as u32 - 1;

    let col = ((point.lon + 180.0) / 360.0 * n) as u32;
    let lat_rad = point.lat.to_radians();
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    // lon = 180 lands exactly on the eastern edge
    Ok(TileCoord {
        row: row.min(max_index),
        col: col.min(max_index),
        zoom,
    })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the position of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> GeoPoint {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.col as f64 / n * 360.0 - 180.0;

    let y = tile.row as f64 / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

    GeoPoint::new(lon, lat)
}
