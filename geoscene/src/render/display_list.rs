//! Recording painter backend.

use super::{Color, Painter};
use crate::coord::EnuRect;

/// A single recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
    Scale { sx: f64, sy: f64 },
    Opacity(f64),
    FillRect { rect: EnuRect, color: Color },
    FillEllipse { rect: EnuRect, color: Color },
}

/// Painter that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<PaintCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of fill commands (shapes actually drawn).
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    PaintCommand::FillRect { .. } | PaintCommand::FillEllipse { .. }
                )
            })
            .count()
    }
}

impl Painter for DisplayList {
    fn save(&mut self) {
        self.commands.push(PaintCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(PaintCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(PaintCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f64) {
        self.commands.push(PaintCommand::Rotate { degrees });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(PaintCommand::Scale { sx, sy });
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.commands.push(PaintCommand::Opacity(opacity));
    }

    fn fill_rect(&mut self, rect: EnuRect, color: Color) {
        self.commands.push(PaintCommand::FillRect { rect, color });
    }

    fn fill_ellipse(&mut self, rect: EnuRect, color: Color) {
        self.commands.push(PaintCommand::FillEllipse { rect, color });
    }
}
