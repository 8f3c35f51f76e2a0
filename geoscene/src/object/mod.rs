//! Backend-agnostic map objects.
//!
//! A [`GeoObject`] holds a geographic pose (position, rotation) and display
//! attributes (visibility, opacity, z-order, selection) and announces every
//! change through [`ObjectChange`] notifications. What the object looks like
//! and how it reacts to input is supplied by an [`ObjectBehavior`].
//!
//! # Example
//!
//! ```
//! use geoscene::coord::GeoPoint;
//! use geoscene::object::{CircleShape, GeoObject, ObjectChange};
//!
//! let marker = GeoObject::shared(CircleShape::default());
//! marker.subscribe(|change| {
//!     if change == ObjectChange::Position {
//!         // react to the move
//!     }
//! });
//! marker.set_position(GeoPoint::new(10.0, 54.3));
//! ```

mod behavior;
mod model;
mod shapes;

pub use behavior::{ItemChange, ObjectBehavior};
pub use model::{GeoObject, ObjectChange, SubscriptionId};
pub use shapes::{CircleShape, RectShape};
