//! Argument types shared across CLI commands.

use std::str::FromStr;

use geoscene::coord::GeoPoint;
use geoscene::render::Color;

use crate::error::CliError;

const DEFAULT_CIRCLE_COLOR: Color = Color::rgb(0x1f, 0x77, 0xb4);
const DEFAULT_RECT_COLOR: Color = Color::rgb(0xd6, 0x27, 0x28);

/// `lon,lat` in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat(pub GeoPoint);

impl FromStr for LonLat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(s, 2, 2)?;
        Ok(LonLat(GeoPoint::try_new(fields[0], fields[1])?))
    }
}

/// `lon,lat,radius_m[,#color]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSpec {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub color: Color,
}

impl FromStr for CircleSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numbers, color) = split_color(s)?;
        let fields = split_fields(numbers, 3, 3)?;
        let radius_m = positive("radius", fields[2])?;

        Ok(CircleSpec {
            center: GeoPoint::try_new(fields[0], fields[1])?,
            radius_m,
            color: color.unwrap_or(DEFAULT_CIRCLE_COLOR),
        })
    }
}

/// `lon,lat,width_m,height_m[,rotation_deg][,#color]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSpec {
    pub center: GeoPoint,
    pub width_m: f64,
    pub height_m: f64,
    pub rotation: f64,
    pub color: Color,
}

impl FromStr for RectSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numbers, color) = split_color(s)?;
        let fields = split_fields(numbers, 4, 5)?;

        Ok(RectSpec {
            center: GeoPoint::try_new(fields[0], fields[1])?,
            width_m: positive("width", fields[2])?,
            height_m: positive("height", fields[3])?,
            rotation: fields.get(4).copied().unwrap_or(0.0),
            color: color.unwrap_or(DEFAULT_RECT_COLOR),
        })
    }
}

/// Split off a trailing `,#color` field if present.
fn split_color(s: &str) -> Result<(&str, Option<Color>), CliError> {
    match s.rsplit_once(',') {
        Some((rest, last)) if last.trim_start().starts_with('#') => {
            let color = last
                .parse::<Color>()
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
            Ok((rest, Some(color)))
        }
        _ => Ok((s, None)),
    }
}

fn split_fields(s: &str, min: usize, max: usize) -> Result<Vec<f64>, CliError> {
    let fields = s
        .split(',')
        .map(|f| {
            f.trim()
                .parse::<f64>()
                .map_err(|_| CliError::InvalidArgument(format!("'{}' is not a number in '{}'", f.trim(), s)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if fields.len() < min || fields.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(CliError::InvalidArgument(format!(
            "expected {} comma-separated values in '{}', got {}",
            expected,
            s,
            fields.len()
        )));
    }
    Ok(fields)
}

fn positive(name: &str, value: f64) -> Result<f64, CliError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CliError::InvalidArgument(format!(
            "{} must be a positive number of meters, got {}",
            name, value
        )))
    }
}
