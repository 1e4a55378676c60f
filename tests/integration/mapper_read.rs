#![allow(missing_docs)]

mod common;

use common::{full_dog, init_tracing, Dog, Dog1, Kennel, Place, Reading, Tagged};
use graft::{
    testkit::MemoryStore, GeoPoint, GraftError, Mapper, Result, ResultNode, SkipReason, Value,
};
use time::macros::datetime;

#[test]
fn full_record_round_trips() -> Result<()> {
    init_tracing();
    let mapper = Mapper::new(MemoryStore::new());
    let original = full_dog();
    mapper.add(&original)?;

    let mut read = Dog {
        id: 1,
        ..Dog::default()
    };
    let diagnostics = mapper.find_by_id(&mut read)?;
    assert!(diagnostics.is_clean(), "{diagnostics:?}");
    assert_eq!(read, original);
    Ok(())
}

#[test]
fn lookup_query_uses_derived_projection() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    mapper.add(&full_dog())?;
    let mut read = Dog {
        id: 1,
        ..Dog::default()
    };
    mapper.find_by_id(&mut read)?;
    let queries = mapper.transport().queries();
    assert_eq!(
        queries[0],
        format!(
            "{{ Dog(id: {}) {{ _xid_ _uid_ uid name color likes_places {{ _xid_ _uid_ uid name }} \
             nicknames lives_at {{ _xid_ _uid_ uid name }} born_at {{ _xid_ _uid_ uid name }} }} }}",
            graft::hash_to_vertex_id(&"1_dog".into())
        )
    );
    Ok(())
}

#[test]
fn every_scalar_kind_round_trips() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    let original = Reading {
        sensor: r#"probe "a""#.into(),
        count: 42,
        delta: -3,
        ratio: 0.1 + 0.2,
        gain: 1.5e-3,
        ok: true,
        raw: vec![0, 159, 146, 150],
        taken_at: datetime!(2017-09-01 10:04:05.000000123 +05:30),
        location: GeoPoint::point(73.5, 18.25).with_property("city", "Pune"),
    };
    mapper.add(&original)?;

    let mut read = Reading {
        sensor: original.sensor.clone(),
        ..Reading::default()
    };
    let diagnostics = mapper.find_by_id(&mut read)?;
    assert!(diagnostics.is_clean(), "{diagnostics:?}");
    assert_eq!(read.ratio.to_bits(), original.ratio.to_bits());
    assert_eq!(read.gain.to_bits(), original.gain.to_bits());
    assert_eq!(read, original);
    Ok(())
}

#[test]
fn boxed_collections_and_optional_elements() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    let original = Kennel {
        code: "east".into(),
        dogs: vec![
            Box::new(Dog1 {
                id: 11,
                name: "a".into(),
                color: "black".into(),
            }),
            Box::new(Dog1 {
                id: 12,
                name: "b".into(),
                color: "brown".into(),
            }),
        ],
        ratings: vec![None, Some(-1)],
    };
    mapper.add(&original)?;

    let mut read = Kennel {
        code: "east".into(),
        ..Kennel::default()
    };
    mapper.find_by_id(&mut read)?;
    assert_eq!(read, original);
    Ok(())
}

#[test]
fn excluded_field_is_not_read() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    mapper.add(&Tagged {
        id: "t2".into(),
        both: "b".into(),
        serde_only: "s".into(),
        plain: "p".into(),
        hidden: "secret".into(),
    })?;
    let mut read = Tagged {
        id: "t2".into(),
        hidden: "kept".into(),
        ..Tagged::default()
    };
    let diagnostics = mapper.find_by_id(&mut read)?;
    assert!(diagnostics.is_clean());
    assert_eq!(read.both, "b");
    assert_eq!(read.serde_only, "s");
    assert_eq!(read.plain, "p");
    assert_eq!(read.hidden, "kept");
    Ok(())
}

#[test]
fn unknown_identity_is_not_found() {
    let mapper = Mapper::new(MemoryStore::new());
    let mut read = Dog1 {
        id: 404,
        ..Dog1::default()
    };
    assert!(matches!(
        mapper.find_by_id(&mut read),
        Err(GraftError::NotFound(_))
    ));

    mapper.transport().answer_queries_with(Vec::new());
    assert!(matches!(
        mapper.find_by_id(&mut read),
        Err(GraftError::NotFound(_))
    ));
}

#[test]
fn schema_drift_is_absorbed() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    let drifted = ResultNode::new("_root_").with_child(
        ResultNode::new("Dog")
            .with_property("name", Value::Int(7))
            .with_property("color", Value::Str("grey".into()))
            .with_property("nicknames", Value::Str("chotu".into()))
            .with_property("extra", Value::Bool(true))
            .with_child(ResultNode::new("born_at").with_property("name", Value::Str("Goa".into())))
            .with_child(ResultNode::new("likes_places").with_property("uid", Value::Int(5))),
    );
    mapper.transport().answer_queries_with(vec![drifted]);

    let mut read = Dog {
        id: 1,
        name: "before".into(),
        ..Dog::default()
    };
    let diagnostics = mapper.find_by_id(&mut read)?;
    assert_eq!(read.name, "before");
    assert_eq!(read.color.as_deref(), Some("grey"));
    assert!(read.nicknames.is_empty());
    assert_eq!(read.born_at.as_deref(), Some(&Place::new(0, "Goa")));
    assert_eq!(read.likes, vec![Place::new(5, "")]);
    assert!(matches!(
        diagnostics.reason("name"),
        Some(SkipReason::TypeMismatch { .. })
    ));
    assert_eq!(diagnostics.reason("nicknames"), Some(&SkipReason::UndecodableList));
    assert_eq!(diagnostics.reason("lives_at"), Some(&SkipReason::Missing));
    assert_eq!(diagnostics.reason("born_at.uid"), Some(&SkipReason::Missing));
    assert_eq!(diagnostics.reason("likes_places.name"), Some(&SkipReason::Missing));
    assert_eq!(diagnostics.mismatches().count(), 2);
    Ok(())
}
