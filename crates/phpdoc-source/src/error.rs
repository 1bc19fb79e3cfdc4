//! Source loading errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading PHP source files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// Path of the file that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            SourceError::Io { path, .. } => path,
        }
    }
}
