#![allow(missing_docs)]

use std::fs;

use graft::{ConfigError, EmptyRelationList, MapperOptions};
use tempfile::tempdir;

#[test]
fn explicit_file_overrides_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("graft.toml");
    fs::write(
        &path,
        "[mapper]\nempty_relation_list = \"skip\"\nmax_projection_depth = 3\nrandom_identity = false\n",
    )?;

    let options = MapperOptions::load(Some(path))?;
    assert_eq!(options.empty_relation_list, EmptyRelationList::Skip);
    assert_eq!(options.max_projection_depth, 3);
    assert!(!options.random_identity);
    Ok(())
}

#[test]
fn missing_file_yields_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let options = MapperOptions::load(Some(dir.path().join("absent.toml")))?;
    assert_eq!(options.empty_relation_list, EmptyRelationList::Abort);
    assert_eq!(options.max_projection_depth, 8);
    Ok(())
}

#[test]
fn malformed_file_reports_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[mapper\nrandom_identity = maybe\n")?;

    let err = MapperOptions::load(Some(path.clone())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
    Ok(())
}

#[test]
fn unreadable_path_is_a_read_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    // a directory exists but cannot be read as a file
    let err = MapperOptions::from_file(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    Ok(())
}
