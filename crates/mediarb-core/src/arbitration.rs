//! Two-pass reclamation engine.
//!
//! Given a registry snapshot, the policy flags, and a priority oracle, the
//! engine decides which clients must surrender so a new request can
//! proceed. The decision runs in two ordered passes over the requested
//! resources:
//!
//! 1. **Codec conflict.** When the hardware forbids a codec combination,
//!    every holder of the conflicting kind is collected, across all
//!    processes. The caller must strictly outrank every holder; a single
//!    unevictable holder aborts the whole request.
//! 2. **Magnitude.** Only when pass 1 chose nobody. For graphic memory the
//!    engine picks one victim: the biggest holder within the least
//!    important holding process.
//!
//! The engine never mutates the registry. Victims release their resources
//! themselves, by re-entering the service from their surrender callbacks.

use std::sync::Arc;

use crate::client::SharedClientHandle;
use crate::policy::PolicyFlags;
use crate::process::ProcessPriorityOracle;
use crate::registry::Registry;
use crate::resource::{Resource, ResourceKind};

/// Why a reclamation request could not be satisfied.
///
/// The service facade reports a bare `false` to callers; the denial reason
/// exists for structured logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReclaimDenied {
    /// A holder's process is at least as important as the caller, or one of
    /// the two priorities could not be resolved.
    #[error("pid {calling_pid} does not outrank pid {holder_pid} holding {kind}")]
    CallerOutranked {
        /// The requesting process.
        calling_pid: i32,
        /// The process holding the contested resource.
        holder_pid: i32,
        /// The contested resource kind.
        kind: ResourceKind,
    },

    /// The caller's own priority could not be resolved.
    #[error("no priority recorded for calling pid {calling_pid}")]
    CallerPriorityUnresolved {
        /// The requesting process.
        calling_pid: i32,
    },

    /// No process holds a claimable resource of the requested kind.
    #[error("no eligible holder of {kind}")]
    NoEligibleHolder {
        /// The requested resource kind.
        kind: ResourceKind,
    },
}

/// Selects the clients that must surrender for the request to proceed.
///
/// Victims are ordered by bucket creation order, then client registration
/// order within a bucket; surrender must be invoked in that order. An empty
/// list means no conflict required eviction, which the facade treats as a
/// failed reclaim.
///
/// # Errors
///
/// Returns [`ReclaimDenied`] when a conflicting holder cannot be evicted
/// under the priority rules. Partially collected victims are discarded.
pub fn select_victims(
    registry: &Registry,
    oracle: &dyn ProcessPriorityOracle,
    flags: &PolicyFlags,
    calling_pid: i32,
    requested: &[Resource],
) -> Result<Vec<SharedClientHandle>, ReclaimDenied> {
    let mut victims = Vec::new();

    // Pass 1: secure/non-secure codec conflicts.
    for resource in requested {
        match resource.kind {
            ResourceKind::SecureCodec => {
                if !flags.multiple_secure_codecs_supported {
                    victims.extend(all_holders(
                        registry,
                        oracle,
                        calling_pid,
                        ResourceKind::SecureCodec,
                    )?);
                }
                if !flags.secure_with_nonsecure_codec_supported {
                    victims.extend(all_holders(
                        registry,
                        oracle,
                        calling_pid,
                        ResourceKind::NonSecureCodec,
                    )?);
                }
            },
            ResourceKind::NonSecureCodec => {
                if !flags.secure_with_nonsecure_codec_supported {
                    victims.extend(all_holders(
                        registry,
                        oracle,
                        calling_pid,
                        ResourceKind::SecureCodec,
                    )?);
                }
            },
            ResourceKind::GraphicMemory => {},
        }
    }

    // Pass 2: magnitude-based selection, only when no codec conflict chose
    // a victim.
    if victims.is_empty() {
        for resource in requested {
            if resource.kind == ResourceKind::GraphicMemory {
                victims.push(lowest_priority_biggest_holder(
                    registry,
                    oracle,
                    calling_pid,
                    resource.kind,
                )?);
            }
        }
    }

    Ok(victims)
}

/// Collects every client holding `kind`, across all processes.
///
/// The caller must strictly outrank each holder's process; an unresolvable
/// priority on either side counts as not outranking. Succeeds with an empty
/// list when nobody holds the kind.
fn all_holders(
    registry: &Registry,
    oracle: &dyn ProcessPriorityOracle,
    calling_pid: i32,
    kind: ResourceKind,
) -> Result<Vec<SharedClientHandle>, ReclaimDenied> {
    let mut holders = Vec::new();
    for bucket in registry.buckets() {
        for record in bucket.clients() {
            if !record.has_kind(kind) {
                continue;
            }
            if !caller_outranks(oracle, calling_pid, bucket.pid()) {
                return Err(ReclaimDenied::CallerOutranked {
                    calling_pid,
                    holder_pid: bucket.pid(),
                    kind,
                });
            }
            holders.push(Arc::clone(record.handle()));
        }
    }
    if holders.is_empty() {
        tracing::debug!(kind = %kind, "no holders of requested kind");
    }
    Ok(holders)
}

/// Returns `true` only when `calling_pid` resolves to a strictly lower
/// (more important) priority value than `pid`.
fn caller_outranks(oracle: &dyn ProcessPriorityOracle, calling_pid: i32, pid: i32) -> bool {
    match (oracle.priority(calling_pid), oracle.priority(pid)) {
        (Some(calling), Some(holding)) => calling < holding,
        _ => false,
    }
}

/// Picks the single pass-2 victim: the biggest holder of `kind` inside the
/// least important process that holds it.
fn lowest_priority_biggest_holder(
    registry: &Registry,
    oracle: &dyn ProcessPriorityOracle,
    calling_pid: i32,
    kind: ResourceKind,
) -> Result<SharedClientHandle, ReclaimDenied> {
    let Some(calling_priority) = oracle.priority(calling_pid) else {
        return Err(ReclaimDenied::CallerPriorityUnresolved { calling_pid });
    };

    let (holder_pid, holder_priority) = lowest_priority_pid(registry, oracle, kind)
        .ok_or(ReclaimDenied::NoEligibleHolder { kind })?;

    if holder_priority <= calling_priority {
        return Err(ReclaimDenied::CallerOutranked {
            calling_pid,
            holder_pid,
            kind,
        });
    }

    biggest_holder_in(registry, holder_pid, kind).ok_or(ReclaimDenied::NoEligibleHolder { kind })
}

/// Among processes holding `kind`, returns the pid with the numerically
/// largest (least important) priority, together with that priority.
///
/// Pids whose priority cannot be resolved are skipped, not evicted. Ties
/// keep the first bucket encountered.
fn lowest_priority_pid(
    registry: &Registry,
    oracle: &dyn ProcessPriorityOracle,
    kind: ResourceKind,
) -> Option<(i32, i32)> {
    let mut lowest: Option<(i32, i32)> = None;
    for bucket in registry.buckets() {
        if bucket.is_empty() || !bucket.has_kind(kind) {
            continue;
        }
        let Some(priority) = oracle.priority(bucket.pid()) else {
            tracing::debug!(pid = bucket.pid(), "skipping pid with unresolved priority");
            continue;
        };
        match lowest {
            Some((_, lowest_priority)) if priority <= lowest_priority => {},
            _ => lowest = Some((bucket.pid(), priority)),
        }
    }
    lowest
}

/// Within one process, returns the handle of the client owning the
/// largest-valued resource of `kind`.
///
/// The comparison is strictly greater starting from zero, so holders whose
/// entries are all zero-valued are never selected. Ties keep the first
/// entry found.
fn biggest_holder_in(
    registry: &Registry,
    pid: i32,
    kind: ResourceKind,
) -> Option<SharedClientHandle> {
    let bucket = registry.bucket(pid)?;
    let mut biggest: Option<SharedClientHandle> = None;
    let mut largest_value = 0u64;
    for record in bucket.clients() {
        for resource in record.resources() {
            if resource.kind == kind && resource.value > largest_value {
                largest_value = resource.value;
                biggest = Some(Arc::clone(record.handle()));
            }
        }
    }
    biggest
}
