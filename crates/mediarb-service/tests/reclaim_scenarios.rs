//! End-to-end reclamation scenarios.
//!
//! Exercises the full facade with a deterministic priority oracle: codec
//! conflict eviction under each policy flag, magnitude-based selection for
//! graphic memory, and the interaction between the two passes.

use std::sync::{Arc, Mutex};

use mediarb_core::policy::{
    POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS, POLICY_SUPPORTS_SECURE_WITH_NONSECURE_CODEC,
    PolicyDirective,
};
use mediarb_core::process::FixedPriorityOracle;
use mediarb_core::registry::ClientId;
use mediarb_core::resource::Resource;
use mediarb_core::{ClientHandle, SharedClientHandle};
use mediarb_service::ArbiterService;

/// A client that records surrender calls into a shared log.
#[derive(Debug)]
struct RecordingClient {
    id: ClientId,
    result: bool,
    order_log: Arc<Mutex<Vec<ClientId>>>,
}

impl ClientHandle for RecordingClient {
    fn surrender(&self) -> bool {
        self.order_log.lock().expect("lock poisoned").push(self.id);
        self.result
    }
}

struct Fixture {
    service: ArbiterService,
    order_log: Arc<Mutex<Vec<ClientId>>>,
}

impl Fixture {
    /// Service backed by an identity oracle: pid `x` has priority `x`.
    fn new(pids: &[i32]) -> Self {
        let mut oracle = FixedPriorityOracle::new();
        for &pid in pids {
            oracle.set_priority(pid, pid);
        }
        Self {
            service: ArbiterService::new(Arc::new(oracle)),
            order_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn add_client(&self, pid: i32, client_id: ClientId, resources: &[Resource]) {
        let handle: SharedClientHandle = Arc::new(RecordingClient {
            id: client_id,
            result: true,
            order_log: Arc::clone(&self.order_log),
        });
        self.service.add_resource(pid, client_id, &handle, resources);
    }

    fn add_refusing_client(&self, pid: i32, client_id: ClientId, resources: &[Resource]) {
        let handle: SharedClientHandle = Arc::new(RecordingClient {
            id: client_id,
            result: false,
            order_log: Arc::clone(&self.order_log),
        });
        self.service.add_resource(pid, client_id, &handle, resources);
    }

    fn surrendered(&self) -> Vec<ClientId> {
        self.order_log.lock().expect("lock poisoned").clone()
    }
}

#[test]
fn single_secure_codec_holder_is_evicted_by_more_important_caller() {
    let fixture = Fixture::new(&[10, 20]);
    fixture.service.config(&[PolicyDirective::new(
        POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS,
        0,
    )]);
    fixture.add_client(20, 1, &[Resource::secure_codec()]);

    assert!(fixture
        .service
        .reclaim_resource(10, &[Resource::secure_codec()]));
    assert_eq!(fixture.surrendered(), vec![1]);
}

#[test]
fn secure_codec_held_by_more_important_process_blocks_reclaim() {
    // The holder's pid doubles as its priority, so pid 5 outranks pid 10.
    let fixture = Fixture::new(&[5, 10]);
    fixture.service.config(&[PolicyDirective::new(
        POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS,
        0,
    )]);
    fixture.add_client(5, 1, &[Resource::secure_codec()]);

    assert!(!fixture
        .service
        .reclaim_resource(10, &[Resource::secure_codec()]));
    assert!(fixture.surrendered().is_empty());
}

#[test]
fn secure_request_evicts_all_nonsecure_holders_in_bucket_order() {
    let fixture = Fixture::new(&[10, 20, 30]);
    fixture.service.config(&[PolicyDirective::new(
        POLICY_SUPPORTS_SECURE_WITH_NONSECURE_CODEC,
        0,
    )]);
    fixture.add_client(20, 1, &[Resource::non_secure_codec()]);
    fixture.add_client(30, 2, &[Resource::non_secure_codec()]);

    assert!(fixture
        .service
        .reclaim_resource(10, &[Resource::secure_codec()]));
    assert_eq!(fixture.surrendered(), vec![1, 2]);
}

#[test]
fn graphic_memory_evicts_biggest_client_of_least_important_process() {
    let fixture = Fixture::new(&[10, 20, 30]);
    fixture.add_client(20, 1, &[Resource::graphic_memory(100)]);
    fixture.add_client(30, 2, &[Resource::graphic_memory(50)]);
    fixture.add_client(30, 3, &[Resource::graphic_memory(200)]);

    assert!(fixture
        .service
        .reclaim_resource(10, &[Resource::graphic_memory(1)]));
    // pid 30 is least important; its biggest holder is client 3.
    assert_eq!(fixture.surrendered(), vec![3]);
}

#[test]
fn codec_conflict_victims_suppress_graphic_memory_eviction() {
    let fixture = Fixture::new(&[10, 20, 30]);
    fixture.service.config(&[PolicyDirective::new(
        POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS,
        0,
    )]);
    fixture.add_client(20, 1, &[Resource::secure_codec()]);
    fixture.add_client(30, 2, &[Resource::graphic_memory(999)]);

    assert!(fixture.service.reclaim_resource(
        10,
        &[Resource::secure_codec(), Resource::graphic_memory(1)],
    ));
    // Only the codec holder pays; the graphic memory client survives.
    assert_eq!(fixture.surrendered(), vec![1]);
    assert_eq!(fixture.service.snapshot().client_count(), 2);
}

#[test]
fn first_surrender_refusal_stops_the_round() {
    let fixture = Fixture::new(&[10, 20, 30]);
    fixture.service.config(&[PolicyDirective::new(
        POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS,
        0,
    )]);
    fixture.add_refusing_client(20, 1, &[Resource::secure_codec()]);
    fixture.add_client(30, 2, &[Resource::secure_codec()]);

    assert!(!fixture
        .service
        .reclaim_resource(10, &[Resource::secure_codec()]));
    // Client 2 is never asked once client 1 refuses.
    assert_eq!(fixture.surrendered(), vec![1]);
}

#[test]
fn reconfigured_flags_change_the_outcome() {
    let fixture = Fixture::new(&[10, 20]);
    fixture.add_client(20, 1, &[Resource::secure_codec()]);

    // Multiple secure codecs allowed: no conflict, nothing reclaimed.
    assert!(!fixture
        .service
        .reclaim_resource(10, &[Resource::secure_codec()]));
    assert!(fixture.surrendered().is_empty());

    fixture.service.config(&[PolicyDirective::new(
        POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS,
        0,
    )]);
    assert!(fixture
        .service
        .reclaim_resource(10, &[Resource::secure_codec()]));
    assert_eq!(fixture.surrendered(), vec![1]);
}
