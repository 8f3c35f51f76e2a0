//! Geodetic conversions on the WGS84 ellipsoid.
//!
//! Objects describe their local shape in an East-North-Up (ENU) tangent
//! plane anchored at their own geographic position. This module converts
//! between that frame and absolute geodetic coordinates by way of
//! Earth-Centered Earth-Fixed (ECEF) cartesian coordinates.
//!
//! All functions are pure and total for finite inputs.
//!
//! # Accuracy
//!
//! The ENU rotation is exact, and the ECEF to geodetic step uses Bowring's
//! closed-form approximation, which is accurate to well below a millimetre for
//! points within a few tens of kilometres of the ellipsoid surface. Far above
//! or below the surface (hundreds of kilometres) the error grows and the
//! results should not be relied upon.
//!
//! The scene layer additionally treats an object's extent as symmetric about
//! its anchor and measures it along the two ENU axes only. That is a
//! tangent-plane approximation: keep object extents small compared to the
//! Earth's radius (a few kilometres) for pixel-accurate results.

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);
/// WGS84 second eccentricity squared.
pub const WGS84_EP2: f64 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);

/// A geodetic position: longitude and latitude in degrees, altitude in
/// meters above the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lla {
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
}

impl Lla {
    pub const fn new(lon: f64, lat: f64, alt: f64) -> Self {
        Self { lon, lat, alt }
    }

    /// Geodetic position on the ellipsoid surface at the given point.
    pub fn on_surface(point: crate::coord::GeoPoint) -> Self {
        Self::new(point.lon, point.lat, 0.0)
    }

    /// Drop the altitude.
    pub fn to_geo_point(self) -> crate::coord::GeoPoint {
        crate::coord::GeoPoint::new(self.lon, self.lat)
    }
}

/// Earth-Centered Earth-Fixed cartesian coordinates (meters).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Local East-North-Up coordinates (meters).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl Enu {
    pub const fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }
}

/// Sines and cosines of a reference position, reused by both ENU rotations.
struct Basis {
    sin_lat: f64,
    cos_lat: f64,
    sin_lon: f64,
    cos_lon: f64,
}

impl Basis {
    fn at(reference: Lla) -> Self {
        let lat = reference.lat.to_radians();
        let lon = reference.lon.to_radians();
        Self {
            sin_lat: lat.sin(),
            cos_lat: lat.cos(),
            sin_lon: lon.sin(),
            cos_lon: lon.cos(),
        }
    }
}

pub fn lla_to_ecef(lla: Lla) -> Ecef {
    let b = Basis::at(lla);

    // Prime vertical radius of curvature
    let n = WGS84_A / (1.0 - WGS84_E2 * b.sin_lat * b.sin_lat).sqrt();
    let x = (n + lla.alt) * b.cos_lat * b.cos_lon;
    let y = (n + lla.alt) * b.cos_lat * b.sin_lon;
    let z = (n * (1.0 - WGS84_E2) + lla.alt) * b.sin_lat;

    Ecef::new(x, y, z)
}

pub fn ecef_to_lla(ecef: Ecef) -> Lla {
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let lon = ecef.y.atan2(ecef.x);

    let theta = (ecef.z * WGS84_A).atan2(p * WGS84_B);
    let sin_theta = theta.sin();
    let cos_theta = theta.cos();

    let lat = (ecef.z + WGS84_EP2 * WGS84_B * sin_theta * sin_theta * sin_theta)
        .atan2(p - WGS84_E2 * WGS84_A * cos_theta * cos_theta * cos_theta);

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    // p / cos(lat) degenerates at the poles; measure along z there instead
    let alt = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        ecef.z.abs() - WGS84_B
    };

    Lla::new(lon.to_degrees(), lat.to_degrees(), alt)
}

pub fn ecef_to_enu(point: Ecef, reference: Lla) -> Enu {
    let origin = lla_to_ecef(reference);
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    let dz = point.z - origin.z;

    let b = Basis::at(reference);

    let east = -b.sin_lon * dx + b.cos_lon * dy;
    let north = -b.sin_lat * b.cos_lon * dx - b.sin_lat * b.sin_lon * dy + b.cos_lat * dz;
    let up = b.cos_lat * b.cos_lon * dx + b.cos_lat * b.sin_lon * dy + b.sin_lat * dz;

    Enu::new(east, north, up)
}

pub fn enu_to_ecef(enu: Enu, reference: Lla) -> Ecef {
    let origin = lla_to_ecef(reference);
    let b = Basis::at(reference);

    let dx = -b.sin_lon * enu.east - b.sin_lat * b.cos_lon * enu.north
        + b.cos_lat * b.cos_lon * enu.up;
    let dy = b.cos_lon * enu.east - b.sin_lat * b.sin_lon * enu.north
        + b.cos_lat * b.sin_lon * enu.up;
    let dz = b.cos_lat * enu.north + b.sin_lat * enu.up;

    Ecef::new(origin.x + dx, origin.y + dy, origin.z + dz)
}

/// Express a geodetic position as an ENU offset from `reference`.
pub fn lla_to_enu(point: Lla, reference: Lla) -> Enu {
    ecef_to_enu(lla_to_ecef(point), reference)
}

/// Resolve an ENU offset from `reference` back to an absolute geodetic
/// position.
pub fn enu_to_lla(enu: Enu, reference: Lla) -> Lla {
    ecef_to_lla(enu_to_ecef(enu, reference))
}
