use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{Question, User};

/// Why a record file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist (yet).
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but is not a JSON array of the expected records.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

pub fn load_users<P: AsRef<Path>>(path: P) -> Result<Vec<User>, LoadError> {
    load_records(path.as_ref())
}

pub fn load_questions<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    load_records(path.as_ref())
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let json_content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    // A freshly created, still empty file holds no records.
    if json_content.trim().is_empty() {
        debug!(path = %path.display(), "record file is empty");
        return Ok(Vec::new());
    }

    let records: Vec<T> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}
