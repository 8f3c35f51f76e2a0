//! Stock object behaviors.

use super::behavior::ObjectBehavior;
use crate::coord::EnuRect;
use crate::render::{Color, Painter};

/// A filled circle with a radius in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub radius_m: f64,
    pub color: Color,
}

impl CircleShape {
    pub fn new(radius_m: f64, color: Color) -> Self {
        Self { radius_m, color }
    }
}

impl Default for CircleShape {
    fn default() -> Self {
        Self::new(10.0, Color::BLUE)
    }
}

impl ObjectBehavior for CircleShape {
    fn bounding_rect(&self) -> EnuRect {
        EnuRect::centered(2.0 * self.radius_m, 2.0 * self.radius_m)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        painter.fill_ellipse(self.bounding_rect(), self.color);
    }
}

/// A filled rectangle centered on the object's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub width_m: f64,
    pub height_m: f64,
    pub color: Color,
}

impl RectShape {
    pub fn new(width_m: f64, height_m: f64, color: Color) -> Self {
        Self {
            width_m,
            height_m,
            color,
        }
    }
}

impl ObjectBehavior for RectShape {
    fn bounding_rect(&self) -> EnuRect {
        EnuRect::centered(self.width_m, self.height_m)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        painter.fill_rect(self.bounding_rect(), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplayList, PaintCommand};

    #[test]
    fn test_circle_extent_is_diameter() {
        let circle = CircleShape::new(15.0, Color::RED);
        assert_eq!(circle.bounding_rect(), EnuRect::new(-15.0, -15.0, 30.0, 30.0));
    }

    #[test]
    fn test_rect_paints_its_extent() {
        let shape = RectShape::new(40.0, 10.0, Color::BLACK);
        let mut list = DisplayList::new();
        shape.paint(&mut list);
        assert_eq!(
            list.commands(),
            &[PaintCommand::FillRect {
                rect: EnuRect::new(-20.0, -5.0, 40.0, 10.0),
                color: Color::BLACK,
            }]
        );
    }
}
