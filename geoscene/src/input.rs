//! Interactive input events relayed from the scene host to map objects.

use crate::coord::PixelPoint;

/// Whether a handler consumed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The handler consumed the event; default behavior is skipped.
    Accepted,
    /// The handler declined; the next handler in line gets the event.
    Ignored,
}

impl EventResponse {
    pub fn is_accepted(self) -> bool {
        matches!(self, EventResponse::Accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer event in scene pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub scene_pos: PixelPoint,
}

impl MouseEvent {
    pub fn new(button: MouseButton, scene_pos: PixelPoint) -> Self {
        Self { button, scene_pos }
    }

    pub fn primary(scene_pos: PixelPoint) -> Self {
        Self::new(MouseButton::Primary, scene_pos)
    }
}

/// Keyboard event. `key` is the host's logical key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Scroll wheel event; positive `delta` scrolls away from the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta: f64,
    pub scene_pos: PixelPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenuEvent {
    pub scene_pos: PixelPoint,
}

/// Every interaction category a scene node can receive.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MousePress(MouseEvent),
    MouseRelease(MouseEvent),
    MouseMove(MouseEvent),
    MouseDoubleClick(MouseEvent),
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    Wheel(WheelEvent),
    ContextMenu(ContextMenuEvent),
}

impl InputEvent {
    /// Scene position for pointer-located events; `None` for keyboard.
    pub fn scene_pos(&self) -> Option<PixelPoint> {
        match self {
            InputEvent::MousePress(e)
            | InputEvent::MouseRelease(e)
            | InputEvent::MouseMove(e)
            | InputEvent::MouseDoubleClick(e) => Some(e.scene_pos),
            InputEvent::Wheel(e) => Some(e.scene_pos),
            InputEvent::ContextMenu(e) => Some(e.scene_pos),
            InputEvent::KeyPress(_) | InputEvent::KeyRelease(_) => None,
        }
    }

    /// Short category name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::MousePress(_) => "mouse_press",
            InputEvent::MouseRelease(_) => "mouse_release",
            InputEvent::MouseMove(_) => "mouse_move",
            InputEvent::MouseDoubleClick(_) => "mouse_double_click",
            InputEvent::KeyPress(_) => "key_press",
            InputEvent::KeyRelease(_) => "key_release",
            InputEvent::Wheel(_) => "wheel",
            InputEvent::ContextMenu(_) => "context_menu",
        }
    }
}
