//! A scene holding many adapted objects over one shared info source.

use std::rc::Rc;

use tracing::{debug, info, trace};

use super::adapter::SceneNodeAdapter;
use super::info::{InfoSource, SceneInfo};
use super::node::{RetainedNode, SceneNode};
use crate::coord::{CoordError, GeoPoint, PixelPoint, PixelRect};
use crate::input::{EventResponse, InputEvent, MouseButton};
use crate::object::GeoObject;
use crate::projector::TileProjector;
use crate::render::Painter;

/// Owns the scene nodes for a set of map objects and routes paint and input
/// to them.
///
/// Objects stay owned by the caller; the scene only keeps weak references
/// through its adapters. Adapters whose object was dropped are skipped when
/// rendering and removed by [`prune`](Self::prune).
pub struct MapScene {
    info: Rc<SceneInfo>,
    adapters: Vec<SceneNodeAdapter<RetainedNode>>,
}

impl MapScene {
    pub fn new(projector: Option<Rc<dyn TileProjector>>, zoom: u8) -> Self {
        Self {
            info: Rc::new(SceneInfo::new(projector, zoom)),
            adapters: Vec::new(),
        }
    }

    pub fn info(&self) -> &Rc<SceneInfo> {
        &self.info
    }

    /// Create a node for `object`. Adding the same object twice is a no-op.
    pub fn add_object(&mut self, object: &Rc<GeoObject>) {
        if self.adapter_for(object).is_some() {
            return;
        }
        let info = Rc::clone(&self.info) as Rc<dyn InfoSource>;
        self.adapters
            .push(SceneNodeAdapter::new(object, info, RetainedNode::new()));
        trace!(nodes = self.adapters.len(), "Added object to scene");
    }

    /// Remove the node for `object`. Returns whether it was present.
    pub fn remove_object(&mut self, object: &Rc<GeoObject>) -> bool {
        let Some(index) = self.index_of(object) else {
            return false;
        };
        let adapter = self.adapters.remove(index);
        adapter.detach();
        true
    }

    /// Drop nodes whose object no longer exists. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.adapters.len();
        self.adapters.retain(SceneNodeAdapter::is_bound);
        let removed = before - self.adapters.len();
        if removed > 0 {
            debug!(removed, remaining = self.adapters.len(), "Pruned orphaned scene nodes");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn adapters(&self) -> &[SceneNodeAdapter<RetainedNode>] {
        &self.adapters
    }

    pub fn adapter_for(&self, object: &Rc<GeoObject>) -> Option<&SceneNodeAdapter<RetainedNode>> {
        self.index_of(object).map(|i| &self.adapters[i])
    }

    pub fn zoom_level(&self) -> u8 {
        self.info.zoom_level()
    }

    /// Change the zoom level and reposition every node.
    pub fn set_zoom_level(&mut self, zoom: u8) -> Result<(), CoordError> {
        if self.info.set_zoom_level(zoom)? {
            info!(zoom, nodes = self.adapters.len(), "Zoom level changed");
            self.reposition_all();
        }
        Ok(())
    }

    /// Swap the tile projector and reposition every node.
    pub fn set_tile_projector(&mut self, projector: Option<Rc<dyn TileProjector>>) {
        self.info.set_tile_projector(projector);
        self.reposition_all();
    }

    /// Pixel viewport of `width` by `height` centered on `center`.
    ///
    /// Returns `None` while no projector is configured.
    pub fn viewport_centered_on(&self, center: GeoPoint, width: f64, height: f64) -> Option<PixelRect> {
        let projector = self.info.tile_projector()?;
        let mid = projector.project(center, self.info.zoom_level());
        let mut viewport = PixelRect::new(0.0, 0.0, width, height);
        viewport.move_center(mid);
        Some(viewport)
    }

    /// Paint every visible node into `painter`, lowest z first.
    ///
    /// `viewport` maps scene pixels to the painter's device space: its
    /// top-left corner becomes the painter origin. Returns the number of
    /// nodes painted.
    pub fn render(&self, painter: &mut dyn Painter, viewport: PixelRect) -> usize {
        let mut painted = 0;
        for adapter in self.paint_order() {
            let (pos, rotation, opacity) = {
                let node = adapter.node();
                (node.pos(), node.rotation(), node.opacity())
            };

            painter.save();
            painter.translate(pos.x - viewport.x, pos.y - viewport.y);
            painter.rotate(rotation);
            painter.set_opacity(opacity);
            if adapter.paint(painter).is_ok() {
                painted += 1;
            }
            painter.restore();
        }
        debug!(painted, "Rendered scene");
        painted
    }

    /// Topmost visible node whose bounds contain `point`.
    ///
    /// Hit testing uses the unrotated bounding rect.
    pub fn item_at(&self, point: PixelPoint) -> Option<&SceneNodeAdapter<RetainedNode>> {
        self.paint_order().into_iter().rev().find(|adapter| {
            let pos = adapter.node().pos();
            adapter
                .try_bounding_rect()
                .map(|rect| rect.translated(pos).contains(point))
                .unwrap_or(false)
        })
    }

    /// Route an input event to the node that should receive it.
    ///
    /// Pointer moves and releases go to the node holding the grab, if any;
    /// other pointer events go to the node under the pointer. Keyboard
    /// events go to the topmost selected node. A primary press clears the
    /// selection of every other node first.
    pub fn dispatch(&self, event: &InputEvent) -> EventResponse {
        let target = match event {
            InputEvent::MouseMove(e) | InputEvent::MouseRelease(e) => self
                .grabbing()
                .or_else(|| self.item_at(e.scene_pos)),
            InputEvent::KeyPress(_) | InputEvent::KeyRelease(_) => self
                .paint_order()
                .into_iter()
                .rev()
                .find(|a| a.node().is_selected()),
            other => other.scene_pos().and_then(|pos| self.item_at(pos)),
        };

        if let InputEvent::MousePress(e) = event {
            if e.button == MouseButton::Primary {
                self.clear_selection_except(target);
            }
        }

        match target {
            Some(adapter) => adapter.dispatch(event),
            None => EventResponse::Ignored,
        }
    }

    fn clear_selection_except(&self, keep: Option<&SceneNodeAdapter<RetainedNode>>) {
        for adapter in &self.adapters {
            let is_kept = keep.map_or(false, |k| std::ptr::eq(k, adapter));
            if !is_kept && adapter.node().is_selected() {
                adapter.set_node_selected(false);
            }
        }
    }

    fn grabbing(&self) -> Option<&SceneNodeAdapter<RetainedNode>> {
        self.adapters.iter().find(|a| a.node().is_grabbing())
    }

    /// Visible, bound nodes sorted by z value (stable for ties).
    fn paint_order(&self) -> Vec<&SceneNodeAdapter<RetainedNode>> {
        let mut order: Vec<_> = self
            .adapters
            .iter()
            .filter(|a| a.is_bound() && a.node().is_visible())
            .collect();
        order.sort_by(|a, b| a.node().z_value().total_cmp(&b.node().z_value()));
        order
    }

    fn reposition_all(&self) {
        for adapter in &self.adapters {
            adapter.handle_zoom_level_changed();
        }
    }

    fn index_of(&self, object: &Rc<GeoObject>) -> Option<usize> {
        self.adapters.iter().position(|a| {
            a.object()
                .map(|bound| Rc::ptr_eq(&bound, object))
                .unwrap_or(false)
        })
    }
}

impl std::fmt::Debug for MapScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapScene")
            .field("info", &self.info)
            .field("nodes", &self.adapters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyEvent, MouseEvent};
    use crate::object::{CircleShape, RectShape};
    use crate::projector::MercatorProjector;
    use crate::render::{Color, DisplayList, PaintCommand};

    fn scene(zoom: u8) -> MapScene {
        MapScene::new(Some(Rc::new(MercatorProjector::default())), zoom)
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut scene = scene(10);
        let object = GeoObject::shared(CircleShape::default());
        scene.add_object(&object);
        scene.add_object(&object);
        assert_eq!(scene.len(), 1);
        assert_eq!(object.observer_count(), 1);
    }

    #[test]
    fn test_remove_detaches() {
        let mut scene = scene(10);
        let object = GeoObject::shared(CircleShape::default());
        scene.add_object(&object);

        assert!(scene.remove_object(&object));
        assert!(!scene.remove_object(&object));
        assert!(scene.is_empty());
        assert_eq!(object.observer_count(), 0);
    }

    #[test]
    fn test_prune_drops_orphans() {
        let mut scene = scene(10);
        let kept = GeoObject::shared(CircleShape::default());
        let dropped = GeoObject::shared(CircleShape::default());
        scene.add_object(&kept);
        scene.add_object(&dropped);
        drop(dropped);

        let mut list = DisplayList::new();
        assert_eq!(scene.render(&mut list, PixelRect::default()), 1);

        assert_eq!(scene.prune(), 1);
        assert_eq!(scene.len(), 1);
        assert!(scene.adapter_for(&kept).is_some());
    }

    #[test]
    fn test_render_orders_by_z_and_skips_hidden() {
        let mut scene = scene(16);
        let top = GeoObject::shared(RectShape::new(5.0, 5.0, Color::RED));
        let bottom = GeoObject::shared(RectShape::new(5.0, 5.0, Color::BLUE));
        let hidden = GeoObject::shared(RectShape::new(5.0, 5.0, Color::BLACK));
        top.set_z_order(2.0);
        hidden.set_visible(false);
        scene.add_object(&top);
        scene.add_object(&bottom);
        scene.add_object(&hidden);

        let mut list = DisplayList::new();
        assert_eq!(scene.render(&mut list, PixelRect::default()), 2);

        let colors: Vec<Color> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                PaintCommand::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::BLUE, Color::RED]);
    }

    #[test]
    fn test_render_applies_node_transform() {
        let mut scene = scene(16);
        let object = GeoObject::shared(CircleShape::default());
        object.set_rotation(30.0);
        object.set_opacity(0.5);
        scene.add_object(&object);

        let pos = scene.adapter_for(&object).unwrap().node().pos();
        let viewport = PixelRect::new(pos.x - 50.0, pos.y - 40.0, 100.0, 80.0);

        let mut list = DisplayList::new();
        scene.render(&mut list, viewport);

        let commands = list.commands();
        assert_eq!(commands[0], PaintCommand::Save);
        assert_eq!(commands[1], PaintCommand::Translate { dx: 50.0, dy: 40.0 });
        assert_eq!(commands[2], PaintCommand::Rotate { degrees: 30.0 });
        assert_eq!(commands[3], PaintCommand::Opacity(0.5));
    }

    #[test]
    fn test_zoom_change_repositions_nodes() {
        let mut scene = scene(10);
        let object = GeoObject::shared(CircleShape::default());
        object.set_position(GeoPoint::new(13.4, 52.5));
        scene.add_object(&object);

        scene.set_zoom_level(12).unwrap();
        let expected = MercatorProjector::default().project(GeoPoint::new(13.4, 52.5), 12);
        assert_eq!(scene.adapter_for(&object).unwrap().node().pos(), expected);

        assert_eq!(scene.set_zoom_level(30), Err(CoordError::InvalidZoom(30)));
        assert_eq!(scene.zoom_level(), 12);
    }

    #[test]
    fn test_item_at_prefers_topmost() {
        let mut scene = scene(18);
        let lower = GeoObject::shared(CircleShape::new(20.0, Color::BLUE));
        let upper = GeoObject::shared(CircleShape::new(20.0, Color::RED));
        upper.set_z_order(1.0);
        scene.add_object(&lower);
        scene.add_object(&upper);

        let pos = scene.adapter_for(&lower).unwrap().node().pos();
        let hit = scene.item_at(pos).and_then(|a| a.object()).unwrap();
        assert!(Rc::ptr_eq(&hit, &upper));

        assert!(scene.item_at(pos + PixelPoint::new(5000.0, 0.0)).is_none());
    }

    #[test]
    fn test_press_moves_selection() {
        let mut scene = scene(18);
        let a = GeoObject::shared(CircleShape::default());
        let b = GeoObject::shared(CircleShape::default());
        b.set_position(GeoPoint::new(0.01, 0.0));
        scene.add_object(&a);
        scene.add_object(&b);
        a.set_selected(true);

        let b_pos = scene.adapter_for(&b).unwrap().node().pos();
        scene.dispatch(&InputEvent::MousePress(MouseEvent::primary(b_pos)));
        scene.dispatch(&InputEvent::MouseRelease(MouseEvent::primary(b_pos)));

        assert!(!a.is_selected());
        assert!(b.is_selected());
    }

    #[test]
    fn test_keys_go_to_selected_node() {
        let mut scene = scene(18);
        let object = GeoObject::shared(CircleShape::default());
        scene.add_object(&object);

        let key = InputEvent::KeyPress(KeyEvent::new("Delete"));
        assert_eq!(scene.dispatch(&key), EventResponse::Ignored);

        object.set_selected(true);
        // Stock shapes ignore keys and so does the default node
        assert_eq!(scene.dispatch(&key), EventResponse::Ignored);
    }

    #[test]
    fn test_viewport_needs_projector() {
        let mut scene = scene(4);
        let viewport = scene
            .viewport_centered_on(GeoPoint::new(0.0, 0.0), 200.0, 100.0)
            .unwrap();
        assert_eq!(viewport.center(), PixelPoint::new(2048.0, 2048.0));

        scene.set_tile_projector(None);
        assert!(scene
            .viewport_centered_on(GeoPoint::new(0.0, 0.0), 200.0, 100.0)
            .is_none());
    }
}
