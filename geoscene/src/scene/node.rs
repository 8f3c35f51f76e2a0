//! Backend scene-node contract and the in-memory retained node.

use crate::coord::PixelPoint;
use crate::input::{EventResponse, InputEvent, MouseButton, MouseEvent};

/// The rendering-backend handle a [`SceneNodeAdapter`](super::SceneNodeAdapter)
/// drives.
///
/// Mirrors the attribute surface of a retained-mode scene graph item. A
/// backend may refuse or alter some writes (notably selection); callers must
/// read the value back rather than assume it stuck.
pub trait SceneNode {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, opacity: f64);

    /// Rotation in degrees about the node origin.
    fn rotation(&self) -> f64;
    fn set_rotation(&mut self, rotation: f64);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn z_value(&self) -> f64;
    fn set_z_value(&mut self, z: f64);

    /// Node origin in scene pixels.
    fn pos(&self) -> PixelPoint;
    fn set_pos(&mut self, pos: PixelPoint);

    fn is_selected(&self) -> bool;

    /// Request a selection state. Backend policy may coerce the result.
    fn set_selected(&mut self, selected: bool);

    /// Schedule a repaint.
    fn update(&mut self);

    /// Become the target of subsequent pointer events after an object
    /// accepted a press on this node.
    fn begin_grab(&mut self, _event: &MouseEvent) {}

    /// The backend's own handling of an event nobody else accepted.
    fn default_event(&mut self, event: &InputEvent) -> EventResponse;
}

/// Pointer grab in progress on a [`RetainedNode`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    /// Pointer position minus node position at grab time.
    offset: PixelPoint,
    moved: bool,
}

/// Plain in-memory scene node.
///
/// Behaves like a selectable, movable graphics item:
///
/// - selection only sticks while the node is selectable, enabled and
///   visible; hiding or disabling a node deselects it
/// - a primary press selects the node and grabs the pointer
/// - moves while grabbed drag the node when it is movable
/// - releasing a grab that never moved selects the node (a click)
/// - a disabled node ignores all input
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedNode {
    enabled: bool,
    opacity: f64,
    rotation: f64,
    visible: bool,
    z_value: f64,
    pos: PixelPoint,
    selected: bool,
    selectable: bool,
    movable: bool,
    grab: Option<Grab>,
    repaint_requests: u64,
}

impl RetainedNode {
    pub fn new() -> Self {
        Self {
            enabled: true,
            opacity: 1.0,
            rotation: 0.0,
            visible: true,
            z_value: 0.0,
            pos: PixelPoint::default(),
            selected: false,
            selectable: true,
            movable: true,
            grab: None,
            repaint_requests: 0,
        }
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            self.selected = false;
        }
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab.is_some()
    }

    pub fn repaint_requests(&self) -> u64 {
        self.repaint_requests
    }

    fn can_select(&self) -> bool {
        self.selectable && self.enabled && self.visible
    }
}

impl Default for RetainedNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for RetainedNode {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.selected = false;
            self.grab = None;
        }
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.selected = false;
            self.grab = None;
        }
    }

    fn z_value(&self) -> f64 {
        self.z_value
    }

    fn set_z_value(&mut self, z: f64) {
        self.z_value = z;
    }

    fn pos(&self) -> PixelPoint {
        self.pos
    }

    fn set_pos(&mut self, pos: PixelPoint) {
        self.pos = pos;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected && self.can_select();
    }

    fn update(&mut self) {
        self.repaint_requests += 1;
    }

    fn begin_grab(&mut self, event: &MouseEvent) {
        if event.button != MouseButton::Primary {
            return;
        }
        if self.enabled && (self.movable || self.selectable) {
            self.grab = Some(Grab {
                offset: event.scene_pos - self.pos,
                moved: false,
            });
        }
    }

    fn default_event(&mut self, event: &InputEvent) -> EventResponse {
        if !self.enabled {
            return EventResponse::Ignored;
        }

        match event {
            InputEvent::MousePress(e) if e.button == MouseButton::Primary => {
                if !(self.movable || self.selectable) {
                    return EventResponse::Ignored;
                }
                self.set_selected(true);
                self.begin_grab(e);
                EventResponse::Accepted
            }
            InputEvent::MouseMove(e) => match self.grab.as_mut() {
                Some(grab) if self.movable => {
                    self.pos = e.scene_pos - grab.offset;
                    grab.moved = true;
                    EventResponse::Accepted
                }
                Some(_) => EventResponse::Accepted,
                None => EventResponse::Ignored,
            },
            InputEvent::MouseRelease(_) => match self.grab.take() {
                Some(grab) => {
                    if !grab.moved {
                        self.set_selected(true);
                    }
                    EventResponse::Accepted
                }
                None => EventResponse::Ignored,
            },
            _ => EventResponse::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;

    fn press(x: f64, y: f64) -> InputEvent {
        InputEvent::MousePress(MouseEvent::primary(PixelPoint::new(x, y)))
    }

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMove(MouseEvent::primary(PixelPoint::new(x, y)))
    }

    fn release(x: f64, y: f64) -> InputEvent {
        InputEvent::MouseRelease(MouseEvent::primary(PixelPoint::new(x, y)))
    }

    #[test]
    fn test_selection_policy() {
        let mut node = RetainedNode::new();
        node.set_selected(true);
        assert!(node.is_selected());

        node.set_visible(false);
        assert!(!node.is_selected());
        node.set_selected(true);
        assert!(!node.is_selected());

        let mut locked = RetainedNode::new().with_selectable(false);
        locked.set_selected(true);
        assert!(!locked.is_selected());
    }

    #[test]
    fn test_press_selects_and_drag_moves() {
        let mut node = RetainedNode::new();
        node.set_pos(PixelPoint::new(100.0, 100.0));

        assert_eq!(node.default_event(&press(102.0, 98.0)), EventResponse::Accepted);
        assert!(node.is_selected());
        assert!(node.is_grabbing());

        assert_eq!(node.default_event(&moved(112.0, 118.0)), EventResponse::Accepted);
        assert_eq!(node.pos(), PixelPoint::new(110.0, 120.0));

        assert_eq!(node.default_event(&release(112.0, 118.0)), EventResponse::Accepted);
        assert!(!node.is_grabbing());
    }

    #[test]
    fn test_grab_then_click_selects_on_release() {
        let mut node = RetainedNode::new();
        node.begin_grab(&MouseEvent::primary(PixelPoint::new(0.0, 0.0)));
        assert!(!node.is_selected());

        node.default_event(&release(0.0, 0.0));
        assert!(node.is_selected());
    }

    #[test]
    fn test_fixed_node_does_not_move() {
        let mut node = RetainedNode::new().with_movable(false);
        node.default_event(&press(0.0, 0.0));
        node.default_event(&moved(50.0, 50.0));
        assert_eq!(node.pos(), PixelPoint::default());
    }

    #[test]
    fn test_disabled_node_ignores_input() {
        let mut node = RetainedNode::new();
        node.set_enabled(false);
        assert_eq!(node.default_event(&press(0.0, 0.0)), EventResponse::Ignored);
        assert!(!node.is_selected());
    }

    #[test]
    fn test_secondary_press_and_keys_are_ignored() {
        let mut node = RetainedNode::new();
        let secondary = InputEvent::MousePress(MouseEvent::new(
            MouseButton::Secondary,
            PixelPoint::new(0.0, 0.0),
        ));
        assert_eq!(node.default_event(&secondary), EventResponse::Ignored);
        assert_eq!(
            node.default_event(&InputEvent::KeyPress(KeyEvent::new("Delete"))),
            EventResponse::Ignored
        );
        assert_eq!(node.default_event(&moved(1.0, 1.0)), EventResponse::Ignored);
    }

    #[test]
    fn test_only_primary_button_grabs() {
        let mut node = RetainedNode::new();
        node.begin_grab(&MouseEvent::new(MouseButton::Middle, PixelPoint::new(0.0, 0.0)));
        assert_eq!(node.default_event(&moved(5.0, 5.0)), EventResponse::Ignored);
        assert_eq!(node.pos(), PixelPoint::new(0.0, 0.0));
    }
}
