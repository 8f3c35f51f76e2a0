//! The backend-agnostic map object and its change notifications.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::behavior::{ItemChange, ObjectBehavior};
use crate::coord::{EnuRect, GeoPoint};
use crate::input::{EventResponse, InputEvent};
use crate::render::Painter;

/// Which observable attribute of a [`GeoObject`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectChange {
    Enabled,
    Opacity,
    Parent,
    Position,
    Rotation,
    Visible,
    ZOrder,
    Selected,
}

impl ObjectChange {
    /// Every change kind, in the order a full resync applies them.
    pub const ALL: [ObjectChange; 8] = [
        ObjectChange::Enabled,
        ObjectChange::Opacity,
        ObjectChange::Parent,
        ObjectChange::Position,
        ObjectChange::Rotation,
        ObjectChange::Visible,
        ObjectChange::ZOrder,
        ObjectChange::Selected,
    ];
}

/// Handle returned by [`GeoObject::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChangeCallback = Rc<dyn Fn(ObjectChange)>;

struct Observer {
    id: SubscriptionId,
    callback: ChangeCallback,
}

/// A map entity: geographic pose plus display attributes.
///
/// The object knows nothing about how it is rendered. Every setter updates
/// state and then synchronously notifies subscribers before returning, so
/// by the time a setter returns every bound scene node has caught up.
///
/// Setters notify unconditionally, even when the value is unchanged. The one
/// exception is [`set_selected`](Self::set_selected), which only notifies
/// on an actual change; selection is synchronized in both directions and the
/// value comparison is what stops the round trip.
///
/// Opacity is stored as given. Values outside `[0, 1]` are the caller's
/// responsibility. The raster backend multiplies it into the opacity of the
/// enclosing save level and clamps that product to `[0, 1]`, so clamping is
/// cumulative per save level rather than per object.
///
/// Objects are single-threaded and shared through `Rc`. Scene adapters and
/// child objects hold `Weak` references and observe when the owner drops it.
pub struct GeoObject {
    enabled: Cell<bool>,
    opacity: Cell<f64>,
    position: Cell<GeoPoint>,
    rotation: Cell<f64>,
    visible: Cell<bool>,
    z_order: Cell<f64>,
    selected: Cell<bool>,
    parent: RefCell<Weak<GeoObject>>,
    behavior: Box<dyn ObjectBehavior>,
    observers: RefCell<Vec<Observer>>,
    next_subscription: Cell<u64>,
}

impl GeoObject {
    /// Create an object with default attributes: enabled, fully opaque, at
    /// (0, 0), unrotated, visible, z-order 0, unselected and parentless.
    pub fn new(behavior: impl ObjectBehavior + 'static) -> Self {
        Self::from_boxed(Box::new(behavior))
    }

    pub fn from_boxed(behavior: Box<dyn ObjectBehavior>) -> Self {
        Self {
            enabled: Cell::new(true),
            opacity: Cell::new(1.0),
            position: Cell::new(GeoPoint::new(0.0, 0.0)),
            rotation: Cell::new(0.0),
            visible: Cell::new(true),
            z_order: Cell::new(0.0),
            selected: Cell::new(false),
            parent: RefCell::new(Weak::new()),
            behavior,
            observers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    /// Convenience for `Rc::new(GeoObject::new(behavior))`.
    pub fn shared(behavior: impl ObjectBehavior + 'static) -> Rc<Self> {
        Rc::new(Self::new(behavior))
    }

    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        self.notify(ObjectChange::Enabled);
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.get()
    }

    pub fn set_opacity(&self, opacity: f64) {
        self.opacity.set(opacity);
        self.notify(ObjectChange::Opacity);
    }

    /// The parent object, if it is still alive.
    pub fn parent(&self) -> Option<Rc<GeoObject>> {
        self.parent.borrow().upgrade()
    }

    pub fn set_parent(&self, parent: Option<&Rc<GeoObject>>) {
        *self.parent.borrow_mut() = parent.map(Rc::downgrade).unwrap_or_default();
        self.notify(ObjectChange::Parent);
    }

    pub fn position(&self) -> GeoPoint {
        self.position.get()
    }

    pub fn set_position(&self, position: GeoPoint) {
        self.position.set(position);
        self.notify(ObjectChange::Position);
    }

    pub fn longitude(&self) -> f64 {
        self.position.get().lon
    }

    pub fn set_longitude(&self, lon: f64) {
        let lat = self.latitude();
        self.set_position(GeoPoint::new(lon, lat));
    }

    pub fn latitude(&self) -> f64 {
        self.position.get().lat
    }

    pub fn set_latitude(&self, lat: f64) {
        let lon = self.longitude();
        self.set_position(GeoPoint::new(lon, lat));
    }

    /// Rotation in degrees, clockwise on screen.
    pub fn rotation(&self) -> f64 {
        self.rotation.get()
    }

    pub fn set_rotation(&self, rotation: f64) {
        self.rotation.set(rotation);
        self.notify(ObjectChange::Rotation);
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        self.notify(ObjectChange::Visible);
    }

    pub fn z_order(&self) -> f64 {
        self.z_order.get()
    }

    pub fn set_z_order(&self, z_order: f64) {
        self.z_order.set(z_order);
        self.notify(ObjectChange::ZOrder);
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Select or deselect. Notifies only when the value changes.
    pub fn set_selected(&self, selected: bool) {
        if self.selected.get() == selected {
            return;
        }
        self.selected.set(selected);
        self.notify(ObjectChange::Selected);
    }

    /// Adopt a selection state decided by a scene backend without notifying.
    ///
    /// Used when a backend coerces a requested selection (for example a
    /// non-selectable node refusing to be selected). Notifying here would
    /// bounce the value back to the backend that produced it. Returns whether
    /// the stored value changed.
    pub(crate) fn reconcile_selected(&self, selected: bool) -> bool {
        if self.selected.get() == selected {
            return false;
        }
        trace!(selected, "Reconciled selection from scene backend");
        self.selected.set(selected);
        true
    }

    /// Register a change callback. Callbacks run synchronously inside the
    /// setter, in subscription order.
    pub fn subscribe(&self, callback: impl Fn(ObjectChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.observers.borrow_mut().push(Observer {
            id,
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn behavior(&self) -> &dyn ObjectBehavior {
        self.behavior.as_ref()
    }

    pub fn bounding_rect(&self) -> EnuRect {
        self.behavior.bounding_rect()
    }

    pub fn paint(&self, painter: &mut dyn Painter) {
        self.behavior.paint(painter);
    }

    /// Offer an input event to the behavior's handler for its category.
    pub fn handle_input(&self, event: &InputEvent) -> EventResponse {
        let b = self.behavior.as_ref();
        match event {
            InputEvent::MousePress(e) => b.mouse_press(self, e),
            InputEvent::MouseRelease(e) => b.mouse_release(self, e),
            InputEvent::MouseMove(e) => b.mouse_move(self, e),
            InputEvent::MouseDoubleClick(e) => b.mouse_double_click(self, e),
            InputEvent::KeyPress(e) => b.key_press(self, e),
            InputEvent::KeyRelease(e) => b.key_release(self, e),
            InputEvent::Wheel(e) => b.wheel(self, e),
            InputEvent::ContextMenu(e) => b.context_menu(self, e),
        }
    }

    /// Let the behavior adjust a backend-originated change.
    pub fn item_change(&self, change: ItemChange) -> ItemChange {
        self.behavior.item_change(self, change)
    }

    fn notify(&self, change: ObjectChange) {
        // Snapshot first: callbacks may subscribe, unsubscribe or call setters
        let callbacks: Vec<ChangeCallback> = self
            .observers
            .borrow()
            .iter()
            .map(|o| Rc::clone(&o.callback))
            .collect();

        trace!(?change, observers = callbacks.len(), "GeoObject changed");

        for callback in callbacks {
            callback(change);
        }
    }
}

impl fmt::Debug for GeoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoObject")
            .field("enabled", &self.enabled.get())
            .field("opacity", &self.opacity.get())
            .field("position", &self.position.get())
            .field("rotation", &self.rotation.get())
            .field("visible", &self.visible.get())
            .field("z_order", &self.z_order.get())
            .field("selected", &self.selected.get())
            .field("has_parent", &self.parent().is_some())
            .field("observers", &self.observer_count())
            .finish()
    }
}
