//! Backend drawing context.
//!
//! Map objects paint through the [`Painter`] trait in their own local frame
//! (ENU meters, y down). The scene layer prepares the painter transform
//! before handing it to an object, so objects never see pixel coordinates.
//!
//! Two backends are provided:
//!
//! - [`SkiaPainter`] rasterizes into a tiny-skia pixmap and writes PNG files
//! - [`DisplayList`] records commands, for hosts that replay them elsewhere

mod display_list;
mod skia;

pub use display_list::{DisplayList, PaintCommand};
pub use skia::SkiaPainter;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::EnuRect;

/// Errors raised by rendering backends.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested canvas has a zero dimension.
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Encoding or writing the output image failed.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Error returned when parsing a `#rrggbb` or `#rrggbbaa` color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}' (expected #rrggbb or #rrggbbaa)")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Immediate-mode drawing context with a transform stack.
///
/// Transform calls compose onto the current transform, as with a canvas API:
/// later calls apply to geometry first.
pub trait Painter {
    /// Push the current transform and opacity.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotate clockwise by `degrees` (y axis points down).
    fn rotate(&mut self, degrees: f64);

    fn scale(&mut self, sx: f64, sy: f64);

    /// Multiply the current opacity by `opacity`.
    fn set_opacity(&mut self, opacity: f64);

    fn fill_rect(&mut self, rect: EnuRect, color: Color);

    /// Fill the ellipse inscribed in `rect`.
    fn fill_ellipse(&mut self, rect: EnuRect, color: Color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_hex() {
        let color: Color = "#ff8000".parse().unwrap();
        assert_eq!(color, Color::rgb(255, 128, 0));
    }

    #[test]
    fn test_parse_rgba_hex() {
        let color: Color = "#00000080".parse().unwrap();
        assert_eq!(color.a, 128);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("red".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["#f0f0f0", "#10203040"] {
            let color: Color = text.parse().unwrap();
            assert_eq!(color.to_string(), text);
        }
    }
}
