//! Scene synchronization.
//!
//! Bridges backend-agnostic [`GeoObject`](crate::object::GeoObject)s onto
//! retained-mode scene nodes:
//!
//! - [`SceneNodeAdapter`] mirrors one object onto one [`SceneNode`], keeps
//!   selection consistent in both directions, converts the object's ENU
//!   extent to pixels and relays input
//! - [`InfoSource`] supplies the zoom level and [`TileProjector`](crate::projector::TileProjector)
//!   every adapter reads from
//! - [`MapScene`] owns a set of adapters and routes paint and input to them
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use geoscene::coord::GeoPoint;
//! use geoscene::object::{CircleShape, GeoObject};
//! use geoscene::projector::MercatorProjector;
//! use geoscene::scene::{MapScene, SceneNode};
//!
//! let mut scene = MapScene::new(Some(Rc::new(MercatorProjector::default())), 17);
//! let marker = GeoObject::shared(CircleShape::default());
//! scene.add_object(&marker);
//!
//! marker.set_position(GeoPoint::new(-122.4194, 37.7749));
//! let node_pos = scene.adapter_for(&marker).unwrap().node().pos();
//! assert!(node_pos.x > 0.0);
//! ```

mod adapter;
mod container;
mod error;
mod info;
mod node;

pub use adapter::{enu_extent_to_pixels, SceneNodeAdapter, PLACEHOLDER_RECT, SELECTION_HIGHLIGHT};
pub use container::MapScene;
pub use error::SyncError;
pub use info::{InfoSource, SceneInfo};
pub use node::{RetainedNode, SceneNode};
