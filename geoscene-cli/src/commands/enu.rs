//! ENU command - local East-North-Up offsets to and from geodetic.

use geoscene::coord::GeoPoint;
use geoscene::geodesy::{enu_to_lla, lla_to_enu, Enu, Lla};

use crate::error::CliError;

/// Arguments for the enu command.
pub struct EnuArgs {
    /// East/north/up in meters, or lon/lat/alt when `inverse` is set.
    pub values: [f64; 3],
    pub reference: GeoPoint,
    pub ref_alt: f64,
    pub inverse: bool,
}

/// Run the enu command.
pub fn run(args: EnuArgs) -> Result<(), CliError> {
    let reference = Lla::new(args.reference.lon, args.reference.lat, args.ref_alt);
    let [a, b, c] = args.values;

    if args.inverse {
        // Validates the target the same way as the reference
        GeoPoint::try_new(a, b)?;
        let enu = lla_to_enu(Lla::new(a, b, c), reference);
        println!("East:  {:.4} m", enu.east);
        println!("North: {:.4} m", enu.north);
        println!("Up:    {:.4} m", enu.up);
    } else {
        let lla = enu_to_lla(Enu::new(a, b, c), reference);
        println!("Longitude: {:.9}", lla.lon);
        println!("Latitude:  {:.9}", lla.lat);
        println!("Altitude:  {:.4} m", lla.alt);
    }
    Ok(())
}
