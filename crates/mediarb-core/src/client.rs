//! Client callback capability.
//!
//! Each registered client hands the arbiter an opaque handle exposing a
//! single operation: *surrender*, which asks the client to release its
//! resources. The handle is shared between the registry and any victim list
//! built during reclamation, so it travels as an `Arc`.

use std::sync::Arc;

/// Opaque per-client capability used to reclaim resources.
///
/// # Thread Safety
///
/// `surrender` may be called from any service thread, but never while the
/// registry lock is held: the callback typically re-enters the service to
/// withdraw the client's own declarations.
pub trait ClientHandle: Send + Sync + std::fmt::Debug {
    /// Asks the client to release its resources.
    ///
    /// Returns `true` when the client released everything, `false` when it
    /// refused or failed. May block on cross-process work.
    fn surrender(&self) -> bool;
}

/// A shared reference to a [`ClientHandle`].
///
/// The victim list snapshots strong references before the registry lock is
/// dropped, so a handle stays alive even if its client record is removed
/// re-entrantly mid-surrender.
pub type SharedClientHandle = Arc<dyn ClientHandle>;
