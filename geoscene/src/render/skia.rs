//! Raster painter backed by tiny-skia.

use std::path::Path;

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};
use tracing::debug;

use super::{Color, Painter, RenderError};
use crate::coord::EnuRect;

/// Painter rasterizing into an RGBA pixmap.
pub struct SkiaPainter {
    pixmap: Pixmap,
    transform: Transform,
    opacity: f32,
    stack: Vec<(Transform, f32)>,
}

impl SkiaPainter {
    /// Create a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            opacity: 1.0,
            stack: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole canvas, ignoring transform and opacity.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    /// Color of a single pixel (premultiplied alpha undone).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.pixmap
            .save_png(path)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        debug!(path = %path.display(), "Wrote PNG");
        Ok(())
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    fn paint_for(&self, color: Color) -> Paint<'static> {
        let alpha = (color.a as f32 * self.opacity).round().clamp(0.0, 255.0) as u8;
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, alpha);
        paint.anti_alias = true;
        paint
    }
}

fn to_skia_rect(rect: EnuRect) -> Option<Rect> {
    Rect::from_xywh(
        rect.left as f32,
        rect.top as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

impl Painter for SkiaPainter {
    fn save(&mut self) {
        self.stack.push((self.transform, self.opacity));
    }

    fn restore(&mut self) {
        if let Some((transform, opacity)) = self.stack.pop() {
            self.transform = transform;
            self.opacity = opacity;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.pre_translate(dx as f32, dy as f32);
    }

    fn rotate(&mut self, degrees: f64) {
        self.transform = self
            .transform
            .pre_concat(Transform::from_rotate(degrees as f32));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.pre_scale(sx as f32, sy as f32);
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = (self.opacity * opacity as f32).clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: EnuRect, color: Color) {
        // Degenerate rectangles draw nothing
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let paint = self.paint_for(color);
        self.pixmap.fill_rect(rect, &paint, self.transform, None);
    }

    fn fill_ellipse(&mut self, rect: EnuRect, color: Color) {
        let Some(path) = to_skia_rect(rect).and_then(PathBuilder::from_oval) else {
            return;
        };
        let paint = self.paint_for(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_canvas_is_rejected() {
        assert!(matches!(
            SkiaPainter::new(0, 10),
            Err(RenderError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_translated_rect_lands_on_pixels() {
        let mut painter = SkiaPainter::new(20, 20).unwrap();
        painter.clear(Color::WHITE);
        painter.save();
        painter.translate(10.0, 10.0);
        painter.fill_rect(EnuRect::centered(4.0, 4.0), Color::RED);
        painter.restore();

        assert_eq!(painter.pixel(10, 10), Some(Color::RED));
        assert_eq!(painter.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_scale_stretches_geometry() {
        let mut painter = SkiaPainter::new(20, 20).unwrap();
        painter.scale(4.0, 4.0);
        painter.fill_rect(EnuRect::new(0.0, 0.0, 2.0, 2.0), Color::BLUE);

        assert_eq!(painter.pixel(6, 6), Some(Color::BLUE));
        assert_eq!(painter.pixel(9, 9).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_opacity_is_clamped_and_restored() {
        let mut painter = SkiaPainter::new(4, 4).unwrap();
        painter.save();
        painter.set_opacity(3.0);
        assert_eq!(painter.opacity, 1.0);
        painter.set_opacity(0.5);
        assert_eq!(painter.opacity, 0.5);
        painter.restore();
        assert_eq!(painter.opacity, 1.0);
    }

    #[test]
    fn test_encode_png_has_signature() {
        let painter = SkiaPainter::new(2, 2).unwrap();
        let bytes = painter.encode_png().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
