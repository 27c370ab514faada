//! # mediarb-core
//!
//! Building blocks for a media resource arbitration service: a registry of
//! which client processes hold which scarce media resources (secure codec
//! slots, non-secure codec slots, graphic memory), and a reclamation engine
//! that decides whether those resources may be taken from existing holders
//! so a new client can proceed.
//!
//! ## Features
//!
//! - **Resource model**: declared resources with a closed kind vocabulary
//! - **Registry**: insertion-ordered process → clients → resources store
//! - **Arbitration**: two-pass victim selection balancing process priority
//!   against codec conflict policy
//! - **Collaborator seams**: traits for the process-priority oracle and the
//!   client surrender callback
//!
//! ## Example
//!
//! ```rust
//! use mediarb_core::arbitration::select_victims;
//! use mediarb_core::policy::PolicyFlags;
//! use mediarb_core::process::FixedPriorityOracle;
//! use mediarb_core::registry::Registry;
//! use mediarb_core::resource::Resource;
//!
//! let registry = Registry::new();
//! let oracle = FixedPriorityOracle::new().with_priority(10, 10);
//!
//! // An empty registry has nothing to evict.
//! let victims = select_victims(
//!     &registry,
//!     &oracle,
//!     &PolicyFlags::default(),
//!     10,
//!     &[Resource::secure_codec()],
//! )
//! .unwrap();
//! assert!(victims.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arbitration;
pub mod client;
pub mod policy;
pub mod process;
pub mod registry;
pub mod resource;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::arbitration::{ReclaimDenied, select_victims};
    pub use crate::client::{ClientHandle, SharedClientHandle};
    pub use crate::policy::{PolicyDirective, PolicyFlags};
    pub use crate::process::{FixedPriorityOracle, ProcessPriorityOracle};
    pub use crate::registry::{ClientId, Registry};
    pub use crate::resource::{Resource, ResourceKind};
}

/// Re-export commonly used types at the crate root.
pub use client::{ClientHandle, SharedClientHandle};
pub use policy::{PolicyDirective, PolicyFlags};
pub use process::ProcessPriorityOracle;
pub use registry::{ClientId, Registry};
pub use resource::{Resource, ResourceKind};
