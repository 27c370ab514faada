//! # mediarb-service
//!
//! The synchronized facade of the media resource arbiter. This crate wires
//! the `mediarb-core` registry and arbitration engine behind a single
//! mutex and exposes the four entry points an RPC dispatcher would call:
//! `config`, `add_resource`, `remove_resource`, and `reclaim_resource`.
//!
//! Surrender callbacks run outside the lock so that victims can re-enter
//! `remove_resource` without deadlocking.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mediarb_core::process::FixedPriorityOracle;
//! use mediarb_service::ArbiterService;
//!
//! let oracle = Arc::new(FixedPriorityOracle::new().with_priority(10, 10));
//! let service = ArbiterService::new(oracle);
//!
//! // Nothing registered yet, so there is nothing to reclaim.
//! assert!(!service.reclaim_resource(10, &[]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod service;
pub mod snapshot;

pub use service::ArbiterService;
pub use snapshot::{ClientSnapshot, ProcessSnapshot, ServiceSnapshot};
