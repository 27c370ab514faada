//! In-memory registry of declared resources.
//!
//! The registry maps processes to their clients and each client to the
//! resources it has declared. Buckets, clients, and resources all preserve
//! insertion order; the arbitration engine depends on that order when it
//! builds victim lists.
//!
//! # Thread Safety
//!
//! The registry is not internally synchronized. The service facade wraps it
//! in a mutex together with the policy flags.

use std::sync::Arc;

use crate::client::SharedClientHandle;
use crate::resource::{Resource, ResourceKind};

/// Caller-assigned client identifier, unique across the whole registry.
pub type ClientId = i64;

/// Returns `true` if any resource in the slice is of the given kind.
///
/// Magnitude is irrelevant here: a zero-valued resource still marks
/// presence of its kind.
#[must_use]
pub fn has_kind(kind: ResourceKind, resources: &[Resource]) -> bool {
    resources.iter().any(|resource| resource.kind == kind)
}

/// One client's declarations: its identity, callback handle, and resources.
#[derive(Clone)]
pub struct ClientRecord {
    /// Caller-assigned identifier.
    client_id: ClientId,

    /// Callback capability, fixed by the add that created the record.
    handle: SharedClientHandle,

    /// Declared resources in declaration order. Duplicate kinds are legal
    /// and cumulative.
    resources: Vec<Resource>,
}

impl ClientRecord {
    /// Returns the client identifier.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the client's callback handle.
    #[must_use]
    pub const fn handle(&self) -> &SharedClientHandle {
        &self.handle
    }

    /// Returns the declared resources in declaration order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Appends declarations to the record. Existing entries are never
    /// replaced.
    pub fn append_resources(&mut self, resources: &[Resource]) {
        self.resources.extend_from_slice(resources);
    }

    /// Returns `true` if the client holds any resource of `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: ResourceKind) -> bool {
        has_kind(kind, &self.resources)
    }
}

impl std::fmt::Debug for ClientRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRecord")
            .field("client_id", &self.client_id)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

/// All clients of one process, in registration order.
#[derive(Debug, Clone)]
pub struct ProcessBucket {
    /// Owning process id.
    pid: i32,

    /// Client records in registration order.
    clients: Vec<ClientRecord>,
}

impl ProcessBucket {
    fn new(pid: i32) -> Self {
        Self {
            pid,
            clients: Vec::new(),
        }
    }

    /// Returns the owning process id.
    #[must_use]
    pub const fn pid(&self) -> i32 {
        self.pid
    }

    /// Returns the client records in registration order.
    #[must_use]
    pub fn clients(&self) -> &[ClientRecord] {
        &self.clients
    }

    /// Returns `true` if the bucket has no clients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Returns `true` if any client in the bucket holds `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: ResourceKind) -> bool {
        self.clients.iter().any(|client| client.has_kind(kind))
    }

    /// Finds the record for `client_id`, creating it if absent.
    ///
    /// A newly created record adopts `handle`; an existing record keeps the
    /// handle from the add that created it.
    pub fn client_mut(
        &mut self,
        client_id: ClientId,
        handle: &SharedClientHandle,
    ) -> &mut ClientRecord {
        if let Some(index) = self
            .clients
            .iter()
            .position(|client| client.client_id == client_id)
        {
            return &mut self.clients[index];
        }
        self.clients.push(ClientRecord {
            client_id,
            handle: Arc::clone(handle),
            resources: Vec::new(),
        });
        self.clients.last_mut().expect("record was just pushed")
    }
}

/// The process-to-clients-to-resources data store.
///
/// Buckets are created lazily on the first declaration for a pid and are
/// retained (possibly empty) after their last client is removed, so bucket
/// order stays stable across re-registration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Buckets in creation order.
    buckets: Vec<ProcessBucket>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for `pid`, if it exists.
    #[must_use]
    pub fn bucket(&self, pid: i32) -> Option<&ProcessBucket> {
        self.buckets.iter().find(|bucket| bucket.pid == pid)
    }

    /// Returns the bucket for `pid`, creating it if absent.
    pub fn bucket_mut(&mut self, pid: i32) -> &mut ProcessBucket {
        if let Some(index) = self.buckets.iter().position(|bucket| bucket.pid == pid) {
            return &mut self.buckets[index];
        }
        self.buckets.push(ProcessBucket::new(pid));
        self.buckets.last_mut().expect("bucket was just pushed")
    }

    /// Removes the record for `client_id`.
    ///
    /// Client ids are unique across the registry, so the scan stops at the
    /// first hit. The owning bucket is retained even when it becomes empty.
    /// Returns whether a record was removed.
    pub fn remove_client(&mut self, client_id: ClientId) -> bool {
        for bucket in &mut self.buckets {
            if let Some(index) = bucket
                .clients
                .iter()
                .position(|client| client.client_id == client_id)
            {
                bucket.clients.remove(index);
                return true;
            }
        }
        false
    }

    /// Iterates over buckets in creation order.
    pub fn buckets(&self) -> impl Iterator<Item = &ProcessBucket> {
        self.buckets.iter()
    }

    /// Returns the number of buckets, including empty ones.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of client records across all buckets.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.clients.len()).sum()
    }
}
