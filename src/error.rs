use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal failure that aborts a whole load or save.
///
/// Per-prototype failures never surface here; they are logged and the
/// offending prototype is skipped (see [`crate::prototypes::LoadError`]).
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
}

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("I/O error on {}: {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("Malformed XML in {}: {detail}", .path.display())]
    MalformedXml { path: PathBuf, detail: String },
    #[error("Missing root tag in {}: expected <{expected}>, found <{found}>", .path.display())]
    MissingRootTag {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },
    #[error("Duplicate prototype name {name:?} in {}", .path.display())]
    DuplicatePrototype { name: String, path: PathBuf },
    #[error("Folder include cycle through {}", .path.display())]
    IncludeCycle { path: PathBuf },
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind }
    }
}

impl std::convert::From<crate::config::ConfigError> for Error {
    fn from(x: crate::config::ConfigError) -> Error {
        Error { kind: x.into() }
    }
}

pub type IResult<T> = Result<T, Error>;

pub fn failure_from_kind(kind: ErrorKind) -> Error {
    Error { kind }
}

pub(crate) fn io_error(path: &Path, err: std::io::Error) -> Error {
    failure_from_kind(ErrorKind::Io {
        path: path.to_path_buf(),
        err,
    })
}
