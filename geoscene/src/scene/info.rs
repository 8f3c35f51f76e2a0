//! Zoom level and projector shared by every adapter in a scene.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::coord::{CoordError, MAX_ZOOM};
use crate::projector::TileProjector;

/// Supplies the current zoom level and tile projector to scene adapters.
///
/// Adapters only ever read from an info source, so one instance can be
/// shared by any number of them.
pub trait InfoSource {
    fn zoom_level(&self) -> u8;

    /// The active projector, or `None` while no tile source is configured.
    fn tile_projector(&self) -> Option<Rc<dyn TileProjector>>;
}

/// Mutable info source owned by a scene container.
pub struct SceneInfo {
    zoom: Cell<u8>,
    projector: RefCell<Option<Rc<dyn TileProjector>>>,
}

impl SceneInfo {
    pub fn new(projector: Option<Rc<dyn TileProjector>>, zoom: u8) -> Self {
        Self {
            zoom: Cell::new(zoom.min(MAX_ZOOM)),
            projector: RefCell::new(projector),
        }
    }

    /// Set the zoom level. Returns whether it changed.
    pub fn set_zoom_level(&self, zoom: u8) -> Result<bool, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        Ok(self.zoom.replace(zoom) != zoom)
    }

    pub fn set_tile_projector(&self, projector: Option<Rc<dyn TileProjector>>) {
        *self.projector.borrow_mut() = projector;
    }
}

impl InfoSource for SceneInfo {
    fn zoom_level(&self) -> u8 {
        self.zoom.get()
    }

    fn tile_projector(&self) -> Option<Rc<dyn TileProjector>> {
        self.projector.borrow().clone()
    }
}

impl fmt::Debug for SceneInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneInfo")
            .field("zoom", &self.zoom.get())
            .field(
                "projector",
                &self.projector.borrow().as_ref().map(|p| p.name().to_string()),
            )
            .finish()
    }
}
