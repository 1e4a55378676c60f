#![allow(missing_docs)]

mod common;

use common::{full_dog, init_tracing};
use graft::{hash_to_vertex_id, testkit::MemoryStore, GraftError, Mapper, Xid};

#[test]
fn failure_mid_graph_keeps_flushed_children() {
    init_tracing();
    let store = MemoryStore::new();
    // both liked places flush, then lives_at fails
    store.fail_mutations_after(2);
    let mapper = Mapper::new(store);

    let err = mapper.add(&full_dog()).unwrap_err();
    assert!(matches!(err, GraftError::Transport(_)));

    let store = mapper.transport();
    assert_eq!(store.mutation_count(), 2);
    assert!(store.vertex(hash_to_vertex_id(&Xid::from("1_place"))).is_some());
    assert!(store.vertex(hash_to_vertex_id(&Xid::from("2_place"))).is_some());
    assert!(store.vertex(hash_to_vertex_id(&Xid::from("3_place"))).is_none());
    assert!(store.vertex(hash_to_vertex_id(&Xid::from("1_dog"))).is_none());
}

#[test]
fn transport_error_message_passes_through() {
    let store = MemoryStore::new();
    store.fail_mutations_after(0);
    let mapper = Mapper::new(store);
    let err = mapper.add(&full_dog()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "transport error: mutation rejected by failure injection"
    );
}

#[test]
fn shared_store_behind_arc() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let writer = Mapper::new(store.clone());
    let reader = Mapper::new(&*store);

    writer.add(&full_dog()).expect("write");
    let mut read = common::Dog {
        id: 1,
        ..common::Dog::default()
    };
    reader.find_by_id(&mut read).expect("read");
    assert_eq!(read, full_dog());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let mapper = Mapper::new(store);
                let mut dog = full_dog();
                dog.id = 100 + i;
                mapper.add(&dog).expect("concurrent write");
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }
    // 4 new dogs; places are shared
    assert_eq!(store.vertex_count(), 8);
}
