//! Synchronization bridge between a [`GeoObject`] and a backend scene node.

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use super::error::SyncError;
use super::info::InfoSource;
use super::node::{RetainedNode, SceneNode};
use crate::coord::{EnuRect, GeoPoint, PixelPoint, PixelRect};
use crate::geodesy::{enu_to_lla, Enu, Lla};
use crate::input::{EventResponse, InputEvent, MouseButton};
use crate::object::{GeoObject, ItemChange, ObjectChange, SubscriptionId};
use crate::projector::TileProjector;
use crate::render::{Color, Painter};

/// Bounding rect reported while the object or projector is unavailable.
pub const PLACEHOLDER_RECT: PixelRect = PixelRect::new(-1.0, -1.0, 2.0, 2.0);

/// Fill drawn under a selected object.
pub const SELECTION_HIGHLIGHT: Color = Color::RED;

/// Convert an object's ENU extent to a pixel rectangle centered on the
/// node origin.
///
/// The left and top edges are resolved to geographic coordinates relative
/// to `anchor`, doubled to get the full span (the extent is assumed to be
/// symmetric about the anchor), and the resulting geographic rectangle is
/// projected. Translation is carried by the node position, so the result is
/// re-centered on (0, 0).
pub fn enu_extent_to_pixels(
    extent: EnuRect,
    anchor: GeoPoint,
    projector: &dyn TileProjector,
    zoom: u8,
) -> PixelRect {
    let reference = Lla::on_surface(anchor);
    let left = enu_to_lla(Enu::new(extent.left, 0.0, 0.0), reference);
    let up = enu_to_lla(Enu::new(0.0, extent.top, 0.0), reference);

    let lon_width = 2.0 * (anchor.lon - left.lon);
    let lat_height = 2.0 * (up.lat - anchor.lat);

    let top_left = GeoPoint::new(left.lon, up.lat);
    let bottom_right = GeoPoint::new(left.lon + lon_width, up.lat + lat_height);

    let mut rect = PixelRect::from_corners(
        projector.project(top_left, zoom),
        projector.project(bottom_right, zoom),
    );
    rect.move_center(PixelPoint::new(0.0, 0.0));
    rect
}

/// Mirrors one [`GeoObject`] onto one backend [`SceneNode`].
///
/// On construction the adapter subscribes to every object change and pulls
/// a full snapshot, so the node agrees with the object before first paint.
/// Afterwards each [`ObjectChange`] is applied to the node synchronously,
/// inside the object's setter.
///
/// The object reference is weak. Once the owner drops the object, painting
/// and synchronization are skipped with a warning; nothing panics. Dropping
/// the adapter removes its subscription.
///
/// Selection flows both ways. Object to node: the requested value is written
/// to the node, then whatever the node settled on is adopted by the object
/// without a further notification. Node to object: user-driven changes go
/// through the object's normal setter. Both directions compare before
/// writing, which is what keeps the round trip from recursing.
pub struct SceneNodeAdapter<N: SceneNode + 'static = RetainedNode> {
    inner: Rc<AdapterInner<N>>,
}

struct AdapterInner<N: SceneNode> {
    object: RefCell<Weak<GeoObject>>,
    info: Rc<dyn InfoSource>,
    node: RefCell<N>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl<N: SceneNode + 'static> SceneNodeAdapter<N> {
    /// Bind `object` to `node`, subscribe, and pull the initial snapshot.
    pub fn new(object: &Rc<GeoObject>, info: Rc<dyn InfoSource>, node: N) -> Self {
        let inner = Rc::new(AdapterInner {
            object: RefCell::new(Rc::downgrade(object)),
            info,
            node: RefCell::new(node),
            subscription: Cell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let id = object.subscribe(move |change| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_change(change);
            }
        });
        inner.subscription.set(Some(id));

        inner.update_all_from_object();
        Self { inner }
    }

    /// The bound object, if it is still alive and attached.
    pub fn object(&self) -> Option<Rc<GeoObject>> {
        self.inner.object().ok()
    }

    pub fn is_bound(&self) -> bool {
        self.object().is_some()
    }

    /// Read access to the backend node.
    pub fn node(&self) -> Ref<'_, N> {
        self.inner.node.borrow()
    }

    /// Stop mirroring: unsubscribe and drop the object reference.
    pub fn detach(&self) {
        self.inner.detach();
    }

    /// Node extent in its local pixel frame (centered on the origin).
    ///
    /// Falls back to [`PLACEHOLDER_RECT`] with a warning when the object or
    /// the projector is missing.
    pub fn bounding_rect(&self) -> PixelRect {
        self.try_bounding_rect().unwrap_or_else(|e| {
            warn!(error = %e, operation = "bounding_rect", "Using placeholder bounding rect");
            PLACEHOLDER_RECT
        })
    }

    pub fn try_bounding_rect(&self) -> Result<PixelRect, SyncError> {
        let object = self.inner.object()?;
        let projector = self.inner.projector()?;
        Ok(enu_extent_to_pixels(
            object.bounding_rect(),
            object.position(),
            projector.as_ref(),
            self.inner.info.zoom_level(),
        ))
    }

    /// Paint the object into `painter`, whose transform must already place
    /// the node origin.
    ///
    /// The painter is scaled so the object's ENU extent fills the pixel
    /// bounding rect, the selection highlight is drawn if selected, then
    /// the object paints itself. Painter state is restored afterwards.
    pub fn paint(&self, painter: &mut dyn Painter) -> Result<(), SyncError> {
        let object = match self.inner.object() {
            Ok(object) => object,
            Err(e) => {
                warn!(error = %e, operation = "paint", "Skipping paint");
                return Err(e);
            }
        };

        let enu_rect = object.bounding_rect();
        let pixel_rect = self.bounding_rect();
        let scale_x = pixel_rect.width / enu_rect.width;
        let scale_y = pixel_rect.height / enu_rect.height;

        painter.save();
        painter.scale(scale_x, scale_y);

        if self.inner.node.borrow().is_selected() {
            painter.fill_rect(enu_rect, SELECTION_HIGHLIGHT);
        }

        object.paint(painter);
        painter.restore();
        Ok(())
    }

    /// Relay an input event.
    ///
    /// The object's handler sees the event first; the backend default runs
    /// only if the object ignores it (or is gone). Pointer moves are the
    /// exception: they always go straight to the backend default and the
    /// object's `mouse_move` handler is never consulted.
    pub fn dispatch(&self, event: &InputEvent) -> EventResponse {
        if let InputEvent::MouseMove(_) = event {
            return self.inner.default_event(event);
        }

        let response = match self.inner.object() {
            Ok(object) => object.handle_input(event),
            Err(e) => {
                warn!(error = %e, operation = "dispatch", event = event.kind(), "Falling back to backend default");
                EventResponse::Ignored
            }
        };

        if response.is_accepted() {
            trace!(event = event.kind(), "Object accepted event");
            if let InputEvent::MousePress(e) = event {
                if e.button == MouseButton::Primary {
                    self.inner.node.borrow_mut().begin_grab(e);
                }
            }
            return response;
        }

        self.inner.default_event(event)
    }

    /// Apply a user-driven selection change made on the backend node and
    /// forward the result to the object.
    pub fn set_node_selected(&self, selected: bool) {
        self.inner.node.borrow_mut().set_selected(selected);
        self.inner.forward_node_selection();
    }

    /// Recompute the node position after the scene zoom level changed.
    /// Every other attribute is zoom-invariant.
    pub fn handle_zoom_level_changed(&self) {
        match self.inner.object() {
            Ok(object) => self.inner.handle_position_changed(&object),
            Err(e) => warn!(error = %e, operation = "zoom_level_changed", "Skipping reposition"),
        }
    }
}

impl<N: SceneNode> AdapterInner<N> {
    fn object(&self) -> Result<Rc<GeoObject>, SyncError> {
        self.object.borrow().upgrade().ok_or(SyncError::ObjectDropped)
    }

    fn projector(&self) -> Result<Rc<dyn TileProjector>, SyncError> {
        self.info.tile_projector().ok_or(SyncError::NoTileProjector)
    }

    fn detach(&self) {
        let object = self.object.replace(Weak::new()).upgrade();
        if let (Some(object), Some(id)) = (object, self.subscription.take()) {
            object.unsubscribe(id);
            debug!("Detached scene node from map object");
        }
    }

    fn update_all_from_object(&self) {
        // Position needs the projector and zoom, which are in place by now
        for change in ObjectChange::ALL {
            self.handle_change(change);
        }
    }

    fn handle_change(&self, change: ObjectChange) {
        let object = match self.object() {
            Ok(object) => object,
            Err(e) => {
                warn!(error = %e, ?change, "Ignoring change notification");
                return;
            }
        };

        trace!(?change, "Syncing scene node");
        match change {
            ObjectChange::Enabled => {
                let dropped = self.write_node(|node| node.set_enabled(object.enabled()));
                if dropped {
                    self.adopt_dropped_selection(&object);
                }
            }
            ObjectChange::Opacity => self.node.borrow_mut().set_opacity(object.opacity()),
            ObjectChange::Parent => self.handle_parent_changed(&object),
            ObjectChange::Position => self.handle_position_changed(&object),
            ObjectChange::Rotation => self.node.borrow_mut().set_rotation(object.rotation()),
            ObjectChange::Visible => {
                let dropped = self.write_node(|node| node.set_visible(object.visible()));
                if dropped {
                    self.adopt_dropped_selection(&object);
                }
            }
            ObjectChange::ZOrder => self.node.borrow_mut().set_z_value(object.z_order()),
            ObjectChange::Selected => self.handle_object_selected_changed(&object),
        }
    }

    fn handle_parent_changed(&self, object: &GeoObject) {
        // Reparenting between nodes belongs to the scene container; node
        // placement stays absolute.
        debug!(has_parent = object.parent().is_some(), "Parent changed");
    }

    fn handle_position_changed(&self, object: &GeoObject) {
        let projector = match self.projector() {
            Ok(projector) => projector,
            Err(e) => {
                warn!(error = %e, operation = "position", "Keeping previous node position");
                return;
            }
        };

        let pos = projector.project(object.position(), self.info.zoom_level());
        self.node.borrow_mut().set_pos(pos);
    }

    fn handle_object_selected_changed(&self, object: &GeoObject) {
        let wanted = object.is_selected();
        let settled = {
            let mut node = self.node.borrow_mut();
            if node.is_selected() == wanted {
                return;
            }
            node.set_selected(wanted);
            node.is_selected()
        };

        object.reconcile_selected(settled);
        self.node.borrow_mut().update();
    }

    /// Apply a node write. Returns whether the write itself cleared the
    /// node's selection.
    fn write_node(&self, write: impl FnOnce(&mut N)) -> bool {
        let mut node = self.node.borrow_mut();
        let was_selected = node.is_selected();
        write(&mut *node);
        was_selected && !node.is_selected()
    }

    /// Take over a selection the node dropped on its own (hidden, disabled).
    fn adopt_dropped_selection(&self, object: &GeoObject) {
        if object.reconcile_selected(false) {
            self.node.borrow_mut().update();
        }
    }

    fn forward_node_selection(&self) {
        let Ok(object) = self.object() else {
            return;
        };

        let selected = self.node.borrow().is_selected();
        if selected == object.is_selected() {
            return;
        }

        match object.item_change(ItemChange::Selected(selected)) {
            ItemChange::Selected(selected) => object.set_selected(selected),
            other => debug!(?other, "Selection change rewritten to another kind; ignoring"),
        }
        self.node.borrow_mut().update();
    }

    fn default_event(&self, event: &InputEvent) -> EventResponse {
        let before = self.node.borrow().pos();
        let response = self.node.borrow_mut().default_event(event);

        let after = self.node.borrow().pos();
        if after != before {
            self.write_back_position(after);
        }
        self.forward_node_selection();
        response
    }

    /// Push a backend-side move (a drag) back onto the object.
    fn write_back_position(&self, pos: PixelPoint) {
        let Ok(object) = self.object() else {
            return;
        };
        let projector = match self.projector() {
            Ok(projector) => projector,
            Err(e) => {
                warn!(error = %e, operation = "drag", "Cannot map dragged node back to geographic position");
                return;
            }
        };

        let geo = projector.unproject(pos, self.info.zoom_level());
        match object.item_change(ItemChange::Position(geo)) {
            ItemChange::Position(position) => object.set_position(position),
            other => debug!(?other, "Position change rewritten to another kind; ignoring"),
        }
    }
}

impl<N: SceneNode> Drop for AdapterInner<N> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::{WGS84_A, WGS84_E2};
    use crate::input::{KeyEvent, MouseButton, MouseEvent};
    use crate::object::{CircleShape, ObjectBehavior, RectShape};
    use crate::projector::MercatorProjector;
    use crate::render::{DisplayList, PaintCommand};
    use crate::scene::SceneInfo;

    /// Plate carrée scaled so one meter is one pixel at the equator.
    struct MeterProjector;

    impl MeterProjector {
        fn x_scale() -> f64 {
            WGS84_A * std::f64::consts::PI / 180.0
        }

        fn y_scale() -> f64 {
            WGS84_A * (1.0 - WGS84_E2) * std::f64::consts::PI / 180.0
        }
    }

    impl TileProjector for MeterProjector {
        fn project(&self, point: GeoPoint, _zoom: u8) -> PixelPoint {
            PixelPoint::new(point.lon * Self::x_scale(), -point.lat * Self::y_scale())
        }

        fn unproject(&self, pixel: PixelPoint, _zoom: u8) -> GeoPoint {
            GeoPoint::new(pixel.x / Self::x_scale(), -pixel.y / Self::y_scale())
        }

        fn name(&self) -> &str {
            "meter"
        }
    }

    fn mercator_info(zoom: u8) -> Rc<SceneInfo> {
        Rc::new(SceneInfo::new(Some(Rc::new(MercatorProjector::default())), zoom))
    }

    fn adapter_for(object: &Rc<GeoObject>, info: &Rc<SceneInfo>) -> SceneNodeAdapter {
        SceneNodeAdapter::new(object, Rc::clone(info) as Rc<dyn InfoSource>, RetainedNode::new())
    }

    #[test]
    fn test_twenty_meter_box_is_twenty_pixels() {
        let extent = EnuRect::new(-10.0, -10.0, 20.0, 20.0);
        let rect = enu_extent_to_pixels(extent, GeoPoint::new(0.0, 0.0), &MeterProjector, 0);

        assert!((rect.width - 20.0).abs() < 1e-3, "width {}", rect.width);
        assert!((rect.height - 20.0).abs() < 1e-3, "height {}", rect.height);
        assert!(rect.center().x.abs() < 1e-9);
        assert!(rect.center().y.abs() < 1e-9);
    }

    #[test]
    fn test_mercator_extent_follows_ground_resolution() {
        let projector = MercatorProjector::default();
        let extent = EnuRect::centered(100.0, 100.0);
        let rect = enu_extent_to_pixels(extent, GeoPoint::new(0.0, 0.0), &projector, 17);
        let expected = 100.0 / projector.meters_per_pixel(0.0, 17);

        assert!((rect.width - expected).abs() < 0.01, "{} vs {}", rect.width, expected);
        // Meridional radius at the equator is a(1 - e²)
        let expected_height = expected / (1.0 - WGS84_E2);
        assert!(
            (rect.height - expected_height).abs() < 0.01,
            "{} vs {}",
            rect.height,
            expected_height
        );
    }

    #[test]
    fn test_snapshot_pulled_on_bind() {
        let object = GeoObject::shared(CircleShape::default());
        object.set_enabled(false);
        object.set_opacity(0.25);
        object.set_rotation(45.0);
        object.set_z_order(7.0);
        object.set_position(GeoPoint::new(10.0, 54.3));

        let info = mercator_info(12);
        let adapter = adapter_for(&object, &info);
        let node = adapter.node();

        assert!(!node.is_enabled());
        assert_eq!(node.opacity(), 0.25);
        assert_eq!(node.rotation(), 45.0);
        assert!(node.is_visible());
        assert_eq!(node.z_value(), 7.0);
        assert_eq!(
            node.pos(),
            MercatorProjector::default().project(GeoPoint::new(10.0, 54.3), 12)
        );
        assert!(!node.is_selected());
    }

    #[test]
    fn test_snapshot_includes_selection() {
        let object = GeoObject::shared(CircleShape::default());
        object.set_selected(true);

        let adapter = adapter_for(&object, &mercator_info(5));
        assert!(adapter.node().is_selected());
        assert!(object.is_selected());
    }

    #[test]
    fn test_snapshot_coerces_selection_of_disabled_object() {
        let object = GeoObject::shared(CircleShape::default());
        object.set_selected(true);
        object.set_enabled(false);

        let adapter = adapter_for(&object, &mercator_info(5));
        assert!(!adapter.node().is_selected());
        assert!(!object.is_selected());
    }

    #[test]
    fn test_reenabling_keeps_selection() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(5));

        object.set_selected(true);
        object.set_enabled(true);
        object.set_visible(true);

        assert!(adapter.node().is_selected());
        assert!(object.is_selected());
    }

    #[test]
    fn test_changes_are_mirrored() {
        let object = GeoObject::shared(CircleShape::default());
        let info = mercator_info(3);
        let adapter = adapter_for(&object, &info);

        object.set_opacity(0.5);
        object.set_rotation(-30.0);
        object.set_visible(false);
        object.set_z_order(2.5);
        object.set_position(GeoPoint::new(-74.006, 40.7128));

        let node = adapter.node();
        assert_eq!(node.opacity(), 0.5);
        assert_eq!(node.rotation(), -30.0);
        assert!(!node.is_visible());
        assert_eq!(node.z_value(), 2.5);
        assert_eq!(
            node.pos(),
            MercatorProjector::default().project(GeoPoint::new(-74.006, 40.7128), 3)
        );
    }

    #[test]
    fn test_zoom_change_repositions_node() {
        let object = GeoObject::shared(CircleShape::default());
        object.set_position(GeoPoint::new(2.35, 48.85));
        let info = mercator_info(10);
        let adapter = adapter_for(&object, &info);
        let at_ten = adapter.node().pos();

        info.set_zoom_level(11).unwrap();
        adapter.handle_zoom_level_changed();

        let at_eleven = adapter.node().pos();
        assert!((at_eleven.x - 2.0 * at_ten.x).abs() < 1e-6);
        assert!((at_eleven.y - 2.0 * at_ten.y).abs() < 1e-6);
    }

    #[test]
    fn test_missing_projector_keeps_position_and_uses_placeholder() {
        let object = GeoObject::shared(CircleShape::default());
        let info = mercator_info(4);
        let adapter = adapter_for(&object, &info);
        let before = adapter.node().pos();

        info.set_tile_projector(None);
        object.set_position(GeoPoint::new(100.0, 20.0));

        assert_eq!(adapter.node().pos(), before);
        assert_eq!(adapter.try_bounding_rect(), Err(SyncError::NoTileProjector));
        assert_eq!(adapter.bounding_rect(), PLACEHOLDER_RECT);
    }

    #[test]
    fn test_selection_round_trip_does_not_recurse() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(4));

        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        object.subscribe(move |change| {
            if change == ObjectChange::Selected {
                counter.set(counter.get() + 1);
            }
        });

        // User selects on the backend; the object follows once
        adapter.set_node_selected(true);
        assert!(object.is_selected());
        assert_eq!(notifications.get(), 1);

        // Object already agrees with the backend: nothing happens
        let repaints = adapter.node().repaint_requests();
        object.set_selected(true);
        assert_eq!(notifications.get(), 1);
        assert!(adapter.node().is_selected());
        assert_eq!(adapter.node().repaint_requests(), repaints);
    }

    #[test]
    fn test_coerced_selection_is_adopted_silently() {
        let object = GeoObject::shared(CircleShape::default());
        let info = mercator_info(4);
        let adapter = SceneNodeAdapter::new(
            &object,
            Rc::clone(&info) as Rc<dyn InfoSource>,
            RetainedNode::new().with_selectable(false),
        );

        object.set_selected(true);

        assert!(!adapter.node().is_selected());
        assert!(!object.is_selected());
    }

    #[test]
    fn test_hiding_drops_selection() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(4));

        object.set_selected(true);
        object.set_visible(false);

        assert!(!adapter.node().is_selected());
        assert!(!object.is_selected());
    }

    #[test]
    fn test_paint_scales_extent_to_pixels() {
        let object = GeoObject::shared(RectShape::new(20.0, 20.0, Color::BLACK));
        let info: Rc<SceneInfo> = Rc::new(SceneInfo::new(Some(Rc::new(MeterProjector)), 0));
        let adapter = adapter_for(&object, &info);

        let mut list = DisplayList::new();
        adapter.paint(&mut list).unwrap();

        let commands = list.commands();
        assert_eq!(commands.first(), Some(&PaintCommand::Save));
        match commands[1] {
            PaintCommand::Scale { sx, sy } => {
                assert!((sx - 1.0).abs() < 1e-4);
                assert!((sy - 1.0).abs() < 1e-4);
            }
            ref other => panic!("expected scale, got {:?}", other),
        }
        assert_eq!(list.fill_count(), 1);
        assert_eq!(commands.last(), Some(&PaintCommand::Restore));
    }

    #[test]
    fn test_selected_paint_draws_highlight_first() {
        let object = GeoObject::shared(CircleShape::new(5.0, Color::BLUE));
        let adapter = adapter_for(&object, &mercator_info(18));
        object.set_selected(true);

        let mut list = DisplayList::new();
        adapter.paint(&mut list).unwrap();

        assert_eq!(
            list.commands()[2],
            PaintCommand::FillRect {
                rect: EnuRect::centered(10.0, 10.0),
                color: SELECTION_HIGHLIGHT,
            }
        );
        assert_eq!(list.fill_count(), 2);
    }

    #[test]
    fn test_dropped_object_skips_paint() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(4));
        drop(object);

        let mut list = DisplayList::new();
        assert_eq!(adapter.paint(&mut list), Err(SyncError::ObjectDropped));
        assert!(list.is_empty());
        assert!(!adapter.is_bound());
        assert_eq!(adapter.bounding_rect(), PLACEHOLDER_RECT);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(4));
        assert_eq!(object.observer_count(), 1);

        drop(adapter);
        assert_eq!(object.observer_count(), 0);
        object.set_rotation(1.0);
    }

    #[test]
    fn test_detach_stops_mirroring() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(4));

        adapter.detach();
        object.set_opacity(0.1);

        assert_eq!(object.observer_count(), 0);
        assert_eq!(adapter.node().opacity(), 1.0);
        assert!(adapter.object().is_none());
    }

    #[test]
    fn test_parent_change_leaves_node_in_place() {
        let parent = GeoObject::shared(CircleShape::default());
        let child = GeoObject::shared(CircleShape::default());
        child.set_position(GeoPoint::new(5.0, 5.0));
        let adapter = adapter_for(&child, &mercator_info(8));
        let before = adapter.node().pos();

        child.set_parent(Some(&parent));
        assert_eq!(adapter.node().pos(), before);
    }

    struct Stubborn;

    impl ObjectBehavior for Stubborn {
        fn bounding_rect(&self) -> EnuRect {
            EnuRect::centered(10.0, 10.0)
        }

        fn paint(&self, _painter: &mut dyn Painter) {}

        fn mouse_press(&self, _object: &GeoObject, _event: &MouseEvent) -> EventResponse {
            EventResponse::Ignored
        }

        fn mouse_move(&self, _object: &GeoObject, _event: &MouseEvent) -> EventResponse {
            panic!("pointer moves must not reach the object");
        }

        fn key_press(&self, object: &GeoObject, _event: &KeyEvent) -> EventResponse {
            object.set_visible(false);
            EventResponse::Accepted
        }

        fn item_change(&self, object: &GeoObject, change: ItemChange) -> ItemChange {
            match change {
                // Refuse to be dragged
                ItemChange::Position(_) => ItemChange::Position(object.position()),
                other => other,
            }
        }
    }

    #[test]
    fn test_ignored_press_falls_back_to_backend_default() {
        let object = GeoObject::shared(Stubborn);
        let adapter = adapter_for(&object, &mercator_info(10));
        let pos = adapter.node().pos();

        let response = adapter.dispatch(&InputEvent::MousePress(MouseEvent::primary(pos)));

        assert_eq!(response, EventResponse::Accepted);
        assert!(adapter.node().is_selected());
        assert!(adapter.node().is_grabbing());
        assert!(object.is_selected());
    }

    #[test]
    fn test_pointer_move_bypasses_object_and_veto_restores_position() {
        let object = GeoObject::shared(Stubborn);
        object.set_position(GeoPoint::new(1.0, 1.0));
        let adapter = adapter_for(&object, &mercator_info(10));
        let start = adapter.node().pos();

        adapter.dispatch(&InputEvent::MousePress(MouseEvent::primary(start)));
        adapter.dispatch(&InputEvent::MouseMove(MouseEvent::primary(
            start + PixelPoint::new(40.0, 0.0),
        )));

        // item_change vetoed the drag, so the node snaps back
        assert_eq!(object.position(), GeoPoint::new(1.0, 1.0));
        assert_eq!(adapter.node().pos(), start);
    }

    #[test]
    fn test_drag_writes_position_back() {
        let object = GeoObject::shared(CircleShape::default());
        let info = mercator_info(10);
        let adapter = adapter_for(&object, &info);
        let start = adapter.node().pos();

        // Default press handler accepts; the node still grabs the pointer
        let response = adapter.dispatch(&InputEvent::MousePress(MouseEvent::primary(start)));
        assert_eq!(response, EventResponse::Accepted);
        assert!(!object.is_selected());

        let target = start + PixelPoint::new(256.0, 0.0);
        adapter.dispatch(&InputEvent::MouseMove(MouseEvent::primary(target)));
        adapter.dispatch(&InputEvent::MouseRelease(MouseEvent::primary(target)));

        let expected = MercatorProjector::default().unproject(target, 10);
        assert!((object.longitude() - expected.lon).abs() < 1e-9);
        assert!((object.latitude() - expected.lat).abs() < 1e-9);
        assert!((adapter.node().pos().x - target.x).abs() < 1e-6);
        // Dragged, not clicked
        assert!(!object.is_selected());
    }

    #[test]
    fn test_secondary_press_does_not_drag() {
        let object = GeoObject::shared(CircleShape::default());
        object.set_position(GeoPoint::new(1.0, 1.0));
        let adapter = adapter_for(&object, &mercator_info(10));
        let start = adapter.node().pos();

        for button in [MouseButton::Secondary, MouseButton::Middle] {
            let press = MouseEvent::new(button, start);
            assert_eq!(
                adapter.dispatch(&InputEvent::MousePress(press)),
                EventResponse::Ignored
            );

            let target = start + PixelPoint::new(100.0, 0.0);
            adapter.dispatch(&InputEvent::MouseMove(MouseEvent::new(button, target)));
            adapter.dispatch(&InputEvent::MouseRelease(MouseEvent::new(button, target)));
        }

        assert_eq!(object.position(), GeoPoint::new(1.0, 1.0));
        assert_eq!(adapter.node().pos(), start);
        assert!(!object.is_selected());
    }

    #[test]
    fn test_click_selects_via_release() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(10));
        let pos = adapter.node().pos();

        adapter.dispatch(&InputEvent::MousePress(MouseEvent::primary(pos)));
        adapter.dispatch(&InputEvent::MouseRelease(MouseEvent::primary(pos)));

        assert!(object.is_selected());
        assert!(adapter.node().is_selected());
    }

    #[test]
    fn test_accepted_key_skips_backend() {
        let object = GeoObject::shared(Stubborn);
        let adapter = adapter_for(&object, &mercator_info(10));

        let response = adapter.dispatch(&InputEvent::KeyPress(KeyEvent::new("h")));
        assert_eq!(response, EventResponse::Accepted);
        assert!(!adapter.node().is_visible());
    }

    #[test]
    fn test_dropped_object_input_uses_backend_default() {
        let object = GeoObject::shared(CircleShape::default());
        let adapter = adapter_for(&object, &mercator_info(10));
        let pos = adapter.node().pos();
        drop(object);

        let response = adapter.dispatch(&InputEvent::MousePress(MouseEvent::primary(pos)));
        assert_eq!(response, EventResponse::Accepted);
        assert!(adapter.node().is_selected());
    }
}
