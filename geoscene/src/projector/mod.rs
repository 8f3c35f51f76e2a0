//! Tile projection.
//!
//! A [`TileProjector`] maps geographic points into the infinite scene pixel
//! plane at a discrete zoom level and back. The scene layer only depends on
//! the trait; [`MercatorProjector`] is the slippy-map implementation used by
//! the CLI and by most tests.

use crate::coord::{
    from_world_pixel, to_tile_coords, to_world_pixel, CoordError, GeoPoint, PixelPoint, TileCoord,
};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Projection between geographic points and scene pixels.
///
/// Implementations must be continuous and monotonic in the zoom level for a
/// fixed projection family; the scene layer assumes this without checking.
pub trait TileProjector {
    /// Project a geographic point to scene pixels at `zoom`.
    fn project(&self, point: GeoPoint, zoom: u8) -> PixelPoint;

    /// Inverse of [`project`](Self::project).
    fn unproject(&self, pixel: PixelPoint, zoom: u8) -> GeoPoint;

    /// Tile containing a geographic point.
    fn tile_at(&self, point: GeoPoint, zoom: u8) -> Result<TileCoord, CoordError> {
        to_tile_coords(point, zoom)
    }

    /// Short human-readable name for diagnostics.
    fn name(&self) -> &str;
}

/// Web Mercator projector (EPSG:3857 slippy-map layout).
///
/// Pixel space doubles in extent with each zoom increment. Latitudes beyond
/// the Mercator limit are clamped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MercatorProjector {
    tile_size: u32,
}

impl MercatorProjector {
    /// Create a projector for square tiles of `tile_size` pixels.
    ///
    /// A zero tile size falls back to [`DEFAULT_TILE_SIZE`].
    pub fn new(tile_size: u32) -> Self {
        let tile_size = if tile_size == 0 {
            DEFAULT_TILE_SIZE
        } else {
            tile_size
        };
        Self { tile_size }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Ground resolution in meters per pixel at `latitude` and `zoom`.
    pub fn meters_per_pixel(&self, latitude: f64, zoom: u8) -> f64 {
        let circumference = 2.0 * std::f64::consts::PI * crate::geodesy::WGS84_A;
        circumference * latitude.to_radians().cos() / crate::coord::world_size(zoom, self.tile_size)
    }
}

impl Default for MercatorProjector {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl TileProjector for MercatorProjector {
    fn project(&self, point: GeoPoint, zoom: u8) -> PixelPoint {
        to_world_pixel(point, zoom, self.tile_size)
    }

    fn unproject(&self, pixel: PixelPoint, zoom: u8) -> GeoPoint {
        from_world_pixel(pixel, zoom, self.tile_size)
    }

    fn name(&self) -> &str {
        "web-mercator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_tile_size_falls_back_to_default() {
        assert_eq!(MercatorProjector::new(0).tile_size(), DEFAULT_TILE_SIZE);
    }

    #[test]
    fn test_equator_resolution_at_zoom_17() {
        let projector = MercatorProjector::default();
        let mpp = projector.meters_per_pixel(0.0, 17);
        assert!((mpp - 1.194).abs() < 1e-3, "got {}", mpp);
    }

    #[test]
    fn test_tile_at_uses_grid() {
        let projector = MercatorProjector::default();
        let tile = projector.tile_at(GeoPoint::new(-74.0060, 40.7128), 16).unwrap();
        assert_eq!((tile.row, tile.col), (24640, 19295));
    }

    proptest! {
        #[test]
        fn test_project_unproject_roundtrip(
            lon in -180.0..180.0_f64,
            lat in -85.0..85.0_f64,
            zoom in 0u8..=20,
            tile_size in prop::sample::select(vec![256u32, 512])
        ) {
            let projector = MercatorProjector::new(tile_size);
            let back = projector.unproject(projector.project(GeoPoint::new(lon, lat), zoom), zoom);
            prop_assert!((back.lon - lon).abs() < 1e-9);
            prop_assert!((back.lat - lat).abs() < 1e-9);
        }

        #[test]
        fn test_pixel_extent_doubles_per_zoom(
            lon in -180.0..180.0_f64,
            lat in -85.0..85.0_f64,
            zoom in 0u8..20
        ) {
            let projector = MercatorProjector::default();
            let point = GeoPoint::new(lon, lat);
            let low = projector.project(point, zoom);
            let high = projector.project(point, zoom + 1);
            prop_assert!((high.x - 2.0 * low.x).abs() < 1e-6);
            prop_assert!((high.y - 2.0 * low.y).abs() < 1e-6);
        }
    }
}
