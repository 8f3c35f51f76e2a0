//! Per-object capabilities: drawing, extent and input handling.

use super::GeoObject;
use crate::coord::{EnuRect, GeoPoint};
use crate::input::{ContextMenuEvent, EventResponse, KeyEvent, MouseButton, MouseEvent, WheelEvent};
use crate::render::Painter;

/// A change the scene backend proposes to apply to an object.
///
/// Offered to [`ObjectBehavior::item_change`] before the object is updated,
/// so a behavior can adjust or veto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemChange {
    /// The node was dragged to a new geographic position.
    Position(GeoPoint),
    /// The user selected or deselected the node.
    Selected(bool),
}

/// What a concrete map object looks like and how it reacts to input.
///
/// Only [`bounding_rect`](Self::bounding_rect) and [`paint`](Self::paint)
/// are required. Input handlers default to ignoring the event, except
/// [`mouse_press`](Self::mouse_press), which accepts primary-button presses
/// so the backend can start selection and dragging.
pub trait ObjectBehavior {
    /// Extent in ENU meters relative to the object's position.
    fn bounding_rect(&self) -> EnuRect;

    /// Draw in the local ENU frame. The painter is already scaled.
    fn paint(&self, painter: &mut dyn Painter);

    fn mouse_press(&self, _object: &GeoObject, event: &MouseEvent) -> EventResponse {
        if event.button == MouseButton::Primary {
            EventResponse::Accepted
        } else {
            EventResponse::Ignored
        }
    }

    fn mouse_release(&self, _object: &GeoObject, _event: &MouseEvent) -> EventResponse {
        EventResponse::Ignored
    }

    fn mouse_move(&self, _object: &GeoObject, _event: &MouseEvent) -> EventResponse {
        EventResponse::Ignored
    }

    fn mouse_double_click(&self, _object: &GeoObject, _event: &MouseEvent) -> EventResponse {
        EventResponse::Ignored
    }

    fn key_press(&self, _object: &GeoObject, _event: &KeyEvent) -> EventResponse {
        EventResponse::Ignored
    }

    fn key_release(&self, _object: &GeoObject, _event: &KeyEvent) -> EventResponse {
        EventResponse::Ignored
    }

    fn wheel(&self, _object: &GeoObject, _event: &WheelEvent) -> EventResponse {
        EventResponse::Ignored
    }

    fn context_menu(&self, _object: &GeoObject, _event: &ContextMenuEvent) -> EventResponse {
        EventResponse::Ignored
    }

    /// Inspect or rewrite a backend-originated change. Pass-through by default.
    fn item_change(&self, _object: &GeoObject, change: ItemChange) -> ItemChange {
        change
    }
}
