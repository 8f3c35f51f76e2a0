//! Scene synchronization errors.

use thiserror::Error;

/// A dependency the adapter needs is unavailable.
///
/// These are never fatal: the affected update is skipped and the node keeps
/// its previous (or placeholder) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The bound map object was dropped or detached.
    #[error("map object is no longer available")]
    ObjectDropped,

    /// The info source has no tile projector.
    #[error("no tile projector available")]
    NoTileProjector,
}
