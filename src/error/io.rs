use std::path::{Path, PathBuf};
use thiserror::Error;

/// Local file access failures: the service definition, the recorded
/// inventory and the output file.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("no such file: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IoError {
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

/// Reads `path` to a string, mapping a missing file to [`IoError::NotFound`].
pub fn read_to_string(path: &Path) -> Result<String, IoError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IoError::not_found(path),
        _ => IoError::read(path, e),
    })
}
