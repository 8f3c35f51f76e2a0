//! Project command - geographic point to scene pixel and tile.

use std::fmt;

use geoscene::coord::{CoordError, GeoPoint, PixelPoint, TileCoord, MAX_ZOOM};
use geoscene::projector::{MercatorProjector, TileProjector};

use crate::error::CliError;

/// Arguments for the project command.
pub struct ProjectArgs {
    pub lon: f64,
    pub lat: f64,
    pub zoom: u8,
    pub tile_size: u32,
}

/// Where a point lands at one zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub point: GeoPoint,
    pub zoom: u8,
    pub pixel: PixelPoint,
    pub tile: TileCoord,
    pub meters_per_pixel: f64,
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Point:       {}", self.point)?;
        writeln!(f, "Zoom:        {}", self.zoom)?;
        writeln!(f, "Scene pixel: {:.3}, {:.3}", self.pixel.x, self.pixel.y)?;
        writeln!(f, "Tile:        {}", self.tile)?;
        write!(f, "Resolution:  {:.4} m/px", self.meters_per_pixel)
    }
}

/// Compute the projection without printing it.
pub fn project(args: &ProjectArgs) -> Result<Projection, CliError> {
    if args.zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(args.zoom).into());
    }
    let point = GeoPoint::try_new(args.lon, args.lat)?;
    let projector = MercatorProjector::new(args.tile_size);

    Ok(Projection {
        point,
        zoom: args.zoom,
        pixel: projector.project(point, args.zoom),
        tile: projector.tile_at(point, args.zoom)?,
        meters_per_pixel: projector.meters_per_pixel(point.lat, args.zoom),
    })
}

/// Run the project command.
pub fn run(args: ProjectArgs) -> Result<(), CliError> {
    println!("{}", project(&args)?);
    Ok(())
}
