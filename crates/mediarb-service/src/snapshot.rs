//! Point-in-time view of the service state.
//!
//! A snapshot is taken under the service lock and is fully detached from
//! the live registry: serializing or inspecting it races with nothing.
//! Intended for status surfaces and debugging, not persistence.

use mediarb_core::policy::PolicyFlags;
use mediarb_core::registry::{ClientId, Registry};
use mediarb_core::resource::Resource;
use serde::{Deserialize, Serialize};

/// One client's declarations as seen at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    /// Caller-assigned client identifier.
    pub client_id: ClientId,

    /// Declared resources in declaration order.
    pub resources: Vec<Resource>,
}

/// One process bucket as seen at capture time.
///
/// Buckets stay in the snapshot even when all their clients have been
/// removed, mirroring the registry's retention of empty buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    /// Owning process id.
    pub pid: i32,

    /// Clients in registration order.
    pub clients: Vec<ClientSnapshot>,
}

/// The whole service state as seen at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    /// Policy flags in effect.
    pub flags: PolicyFlags,

    /// Process buckets in creation order.
    pub processes: Vec<ProcessSnapshot>,
}

impl ServiceSnapshot {
    /// Captures the registry and flags. Called under the service lock.
    pub(crate) fn capture(registry: &Registry, flags: PolicyFlags) -> Self {
        let processes = registry
            .buckets()
            .map(|bucket| ProcessSnapshot {
                pid: bucket.pid(),
                clients: bucket
                    .clients()
                    .iter()
                    .map(|record| ClientSnapshot {
                        client_id: record.client_id(),
                        resources: record.resources().to_vec(),
                    })
                    .collect(),
            })
            .collect();
        Self { flags, processes }
    }

    /// Returns the number of client records across all processes.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.processes.iter().map(|p| p.clients.len()).sum()
    }
}
