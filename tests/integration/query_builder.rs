#![allow(missing_docs)]

mod common;

use common::{full_dog, Dog, Dog1, Note};
use graft::{testkit::MemoryStore, GraftError, Mapper, MapperOptions, Result, SkipReason};

#[test]
fn derived_projection_by_default() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    mapper.add(&full_dog())?;

    let mut read = Dog {
        id: 1,
        ..Dog::default()
    };
    let diagnostics = mapper.query(&mut read).execute()?;
    assert!(diagnostics.is_clean());
    assert_eq!(read, full_dog());
    Ok(())
}

#[test]
fn explicit_id_overrides_record_identity() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    mapper.add(&Dog1 {
        id: 5,
        name: "bruno".into(),
        color: "tan".into(),
    })?;

    let mut read = Dog1::default();
    mapper.query(&mut read).id(5).execute()?;
    assert_eq!(read.name, "bruno");
    assert_eq!(read.id, 5);
    Ok(())
}

#[test]
fn explicit_fields_limit_the_read() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    mapper.add(&full_dog())?;

    let mut read = Dog::default();
    let diagnostics = mapper
        .query(&mut read)
        .id("1")
        .fields(["name", "color"])
        .execute()?;
    assert_eq!(read.name, "jarvis");
    assert_eq!(read.color.as_deref(), Some("white"));
    assert!(read.likes.is_empty());
    assert_eq!(diagnostics.reason("likes_places"), Some(&SkipReason::Missing));

    let last = mapper.transport().queries().pop().unwrap_or_default();
    assert!(last.ends_with("{ _xid_ _uid_ name color } }"), "{last}");
    Ok(())
}

#[test]
fn empty_field_list_keeps_derived_projection() -> Result<()> {
    let mapper = Mapper::new(MemoryStore::new());
    mapper.add(&full_dog())?;
    let mut read = Dog {
        id: 1,
        ..Dog::default()
    };
    mapper.query(&mut read).fields(Vec::<String>::new()).execute()?;
    assert_eq!(read.likes.len(), 2);
    Ok(())
}

#[test]
fn invalid_arguments_surface_on_execute() {
    let mapper = Mapper::new(MemoryStore::new());
    let mut read = Dog1::default();

    let err = mapper.query(&mut read).id("").execute().unwrap_err();
    assert!(matches!(err, GraftError::InvalidArgument(_)));

    let err = mapper
        .query(&mut read)
        .id(1)
        .fields(["name", "color } likes {"])
        .execute()
        .unwrap_err();
    assert!(matches!(err, GraftError::InvalidArgument(_)));
    assert!(mapper.transport().queries().is_empty());
}

#[test]
fn strict_identity_needs_explicit_id() -> Result<()> {
    let mapper = Mapper::with_options(
        MemoryStore::new(),
        MapperOptions {
            random_identity: false,
            ..MapperOptions::default()
        },
    );
    let mut note = Note::default();
    assert!(matches!(
        mapper.query(&mut note).execute(),
        Err(GraftError::InvalidArgument(_))
    ));
    assert!(matches!(
        mapper.query(&mut note).id("n1").execute(),
        Err(GraftError::NotFound(_))
    ));
    Ok(())
}
