//! Mapper configuration.
//!
//! Options can be built in code or read from a TOML file:
//!
//! ```toml
//! [mapper]
//! empty_relation_list = "skip"
//! max_projection_depth = 4
//! random_identity = false
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GRAFT_CONFIG";

/// What to do with a relation collection that holds no elements.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum EmptyRelationList {
    /// Abandon the whole record write and report success with no vertex.
    /// Matches the layout of data already written by earlier mappers.
    #[default]
    Abort,
    /// Omit the field and keep writing the record.
    Skip,
}

/// Options controlling the write and read pipelines.
#[derive(Clone, Debug)]
pub struct MapperOptions {
    /// Handling of empty relation collections on write.
    pub empty_relation_list: EmptyRelationList,
    /// Relation nesting depth expanded by derived projections. Relations
    /// below the bound are left out of the query.
    pub max_projection_depth: usize,
    /// Whether records with neither an identity method nor a `uid` field get
    /// a random identity. When `false` such records are rejected.
    pub random_identity: bool,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            empty_relation_list: EmptyRelationList::Abort,
            max_projection_depth: 8,
            random_identity: true,
        }
    }
}

impl MapperOptions {
    /// Loads options from `explicit`, else `$GRAFT_CONFIG`, else the user
    /// config directory. A missing file yields the defaults.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        match config_path(explicit, std::env::var_os(CONFIG_ENV)) {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads options from a TOML file that must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })?;
        raw.mapper.into_options()
    }

    /// Parses options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: "<string>".to_string(),
            source,
        })?;
        raw.mapper.into_options()
    }
}

/// Default config location, `<config dir>/graft/graft.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("graft").join("graft.toml"))
}

fn config_path(explicit: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
    explicit
        .or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .or_else(default_config_path)
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    mapper: RawMapper,
}

#[derive(Debug, Default, Deserialize)]
struct RawMapper {
    empty_relation_list: Option<String>,
    max_projection_depth: Option<usize>,
    random_identity: Option<bool>,
}

impl RawMapper {
    fn into_options(self) -> Result<MapperOptions, ConfigError> {
        let mut options = MapperOptions::default();
        if let Some(value) = self.empty_relation_list {
            options.empty_relation_list = match value.to_ascii_lowercase().as_str() {
                "abort" => EmptyRelationList::Abort,
                "skip" => EmptyRelationList::Skip,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "empty_relation_list",
                        value,
                    })
                }
            };
        }
        if let Some(depth) = self.max_projection_depth {
            if depth == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "max_projection_depth",
                    value: depth.to_string(),
                });
            }
            options.max_projection_depth = depth;
        }
        if let Some(random) = self.random_identity {
            options.random_identity = random;
        }
        Ok(options)
    }
}

/// Failures while loading [`MapperOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read mapper config {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config text is not valid TOML for the expected layout.
    #[error("failed to parse mapper config {origin}: {source}")]
    Parse {
        /// File path, or `<string>` for in-memory text.
        origin: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// A key holds a value outside its domain.
    #[error("mapper config value '{value}' is invalid for {key}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}
