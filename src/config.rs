//! Server configuration, read from a TOML file.
//!
//! ```toml
//! data_dir = "data"
//! prototypes = "dynamicscene/prototypes.xml"
//! resource_types = "resourcetypes.xml"
//! affixes = "affixes.xml"
//! relationships = "relationships.xml"
//! ```
//!
//! All file entries are relative to `data_dir`, which itself is relative to
//! the directory holding the configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {err}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_prototypes() -> PathBuf {
    PathBuf::from("dynamicscene/prototypes.xml")
}

fn default_resource_types() -> PathBuf {
    PathBuf::from("resourcetypes.xml")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default = "default_prototypes")]
    pub prototypes: PathBuf,
    #[serde(default = "default_resource_types")]
    pub resource_types: PathBuf,
    #[serde(default)]
    pub affixes: Option<PathBuf>,
    #[serde(default)]
    pub relationships: Option<PathBuf>,
    /// Where `resave` writes when no directory is given on the command line.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            prototypes: default_prototypes(),
            resource_types: default_resource_types(),
            affixes: None,
            relationships: None,
            output_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads the file at `path` and makes `data_dir` relative to its
    /// directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::IoError {
            path: path.to_path_buf(),
            err,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            config.data_dir = dir.join(&config.data_dir);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Config rooted at `data_dir` with every other entry at its default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn prototypes_path(&self) -> PathBuf {
        self.data_dir.join(&self.prototypes)
    }

    pub fn resource_types_path(&self) -> PathBuf {
        self.data_dir.join(&self.resource_types)
    }

    pub fn affixes_path(&self) -> Option<PathBuf> {
        self.affixes.as_ref().map(|p| self.data_dir.join(p))
    }

    pub fn relationships_path(&self) -> Option<PathBuf> {
        self.relationships.as_ref().map(|p| self.data_dir.join(p))
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|p| self.data_dir.join(p))
    }
}
