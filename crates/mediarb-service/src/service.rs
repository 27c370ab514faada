//! Synchronized service facade.
//!
//! [`ArbiterService`] is the layer an RPC dispatcher calls into. One mutex
//! serializes every entry point over the registry and the policy flags, so
//! each call sees a consistent snapshot. The only blocking work is the
//! victims' surrender callbacks, and those run strictly outside the lock:
//! a surrendering client calls back into [`remove_resource`] and the lock
//! is not recursive.
//!
//! [`remove_resource`]: ArbiterService::remove_resource

use std::sync::{Arc, Mutex};

use mediarb_core::SharedClientHandle;
use mediarb_core::arbitration::select_victims;
use mediarb_core::policy::{PolicyDirective, PolicyFlags};
use mediarb_core::process::ProcessPriorityOracle;
use mediarb_core::registry::{ClientId, Registry};
use mediarb_core::resource::Resource;

use crate::snapshot::ServiceSnapshot;

/// State guarded by the service mutex.
struct ArbiterState {
    registry: Registry,
    flags: PolicyFlags,
}

/// The media resource arbitration service.
///
/// # Thread Safety
///
/// All entry points take `&self` and are safe to call from any number of
/// threads; each call runs to completion on the caller's thread. There is
/// no worker pool and no internal queueing.
pub struct ArbiterService {
    state: Mutex<ArbiterState>,
    oracle: Arc<dyn ProcessPriorityOracle>,
}

impl ArbiterService {
    /// Creates a service with default (permissive) policy flags.
    #[must_use]
    pub fn new(oracle: Arc<dyn ProcessPriorityOracle>) -> Self {
        Self {
            state: Mutex::new(ArbiterState {
                registry: Registry::new(),
                flags: PolicyFlags::default(),
            }),
            oracle,
        }
    }

    /// Applies policy directives in order.
    ///
    /// Recognized tags set their flag (non-zero value means enabled);
    /// unrecognized tags are ignored. Idempotent.
    pub fn config(&self, directives: &[PolicyDirective]) {
        tracing::debug!(count = directives.len(), "applying policy directives");

        let mut state = self.state.lock().expect("lock poisoned");
        for directive in directives {
            state.flags.apply(directive);
        }
    }

    /// Declares resources held by a client.
    ///
    /// The bucket and the client record are created lazily; resources
    /// append to any existing declarations. A record created by an earlier
    /// add keeps its original handle.
    pub fn add_resource(
        &self,
        pid: i32,
        client_id: ClientId,
        handle: &SharedClientHandle,
        resources: &[Resource],
    ) {
        tracing::debug!(pid, client_id, count = resources.len(), "adding resources");

        let mut state = self.state.lock().expect("lock poisoned");
        state
            .registry
            .bucket_mut(pid)
            .client_mut(client_id, handle)
            .append_resources(resources);
    }

    /// Withdraws a client and all of its declarations.
    ///
    /// Silent no-op when the client id is unknown.
    pub fn remove_resource(&self, client_id: ClientId) {
        tracing::debug!(client_id, "removing client");

        let mut state = self.state.lock().expect("lock poisoned");
        if !state.registry.remove_client(client_id) {
            tracing::debug!(client_id, "client not found");
        }
    }

    /// Reclaims resources from existing holders on behalf of `calling_pid`.
    ///
    /// Selects victims under the lock, releases the lock, then invokes each
    /// victim's surrender in selection order. Returns `true` only when at
    /// least one victim was selected and every surrender succeeded. The
    /// first refusal short-circuits with `false`; earlier surrenders are
    /// not rolled back.
    pub fn reclaim_resource(&self, calling_pid: i32, requested: &[Resource]) -> bool {
        tracing::debug!(calling_pid, count = requested.len(), "reclaim requested");

        let victims = {
            let state = self.state.lock().expect("lock poisoned");
            match select_victims(
                &state.registry,
                self.oracle.as_ref(),
                &state.flags,
                calling_pid,
                requested,
            ) {
                Ok(victims) => victims,
                Err(denied) => {
                    tracing::warn!(calling_pid, error = %denied, "reclaim denied");
                    return false;
                },
            }
        };

        if victims.is_empty() {
            tracing::debug!(calling_pid, "no victims selected");
            return false;
        }

        for victim in &victims {
            if !victim.surrender() {
                tracing::warn!(calling_pid, "victim refused to surrender");
                return false;
            }
        }
        true
    }

    /// Takes a point-in-time snapshot of the registry and policy flags.
    #[must_use]
    pub fn snapshot(&self) -> ServiceSnapshot {
        let state = self.state.lock().expect("lock poisoned");
        ServiceSnapshot::capture(&state.registry, state.flags)
    }
}

impl std::fmt::Debug for ArbiterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().expect("lock poisoned");
        f.debug_struct("ArbiterService")
            .field("buckets", &state.registry.bucket_count())
            .field("clients", &state.registry.client_count())
            .field("flags", &state.flags)
            .finish_non_exhaustive()
    }
}
