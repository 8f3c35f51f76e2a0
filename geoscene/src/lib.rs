//! GeoScene - Geo-referenced objects on tile-projected scenes
//!
//! This library keeps backend-agnostic map objects (positioned in
//! longitude/latitude, sized in local East-North-Up meters) synchronized with
//! retained-mode scene nodes placed in Web Mercator pixel space.
//!
//! - [`object`]: map objects and their change notifications
//! - [`scene`]: the object to scene-node synchronization bridge
//! - [`geodesy`]: WGS84 geodetic, ECEF and ENU conversions
//! - [`projector`]: geographic to tile-pixel projection
//! - [`render`]: painter backends (tiny-skia raster, display list)

pub mod config;
pub mod coord;
pub mod geodesy;
pub mod input;
pub mod logging;
pub mod object;
pub mod projector;
pub mod render;
pub mod scene;
