use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::perf_data;

/// Why a single hsperfdata file could not be used. All of these abort the
/// run: a partial report would silently under-report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file went away between listing the folder and opening it,
    /// usually because the JVM exited.
    #[error("file '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("can't read file '{}' could not open for reading", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't read file '{}' wrong format", .path.display())]
    BadMagic { path: PathBuf, magic: u32 },

    #[error("can't read file '{}' wrong format", .path.display())]
    Truncated {
        path: PathBuf,
        #[source]
        source: perf_data::Error,
    },
}

impl SourceError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            SourceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Unreadable {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub fn from_format(path: &Path, err: perf_data::Error) -> Self {
        match err {
            perf_data::Error::UnrecognizedMagic(magic) => SourceError::BadMagic {
                path: path.to_path_buf(),
                magic,
            },
            source => SourceError::Truncated {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SourceError::NotFound { path }
            | SourceError::Unreadable { path, .. }
            | SourceError::BadMagic { path, .. }
            | SourceError::Truncated { path, .. } => path,
        }
    }

    /// The process exit code the plugin reports this error with.
    pub fn exit_code(&self) -> i32 {
        match self {
            SourceError::NotFound { .. } => 2,
            SourceError::Unreadable { .. } => 3,
            SourceError::BadMagic { .. } | SourceError::Truncated { .. } => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Could not write plugin output: {0}")]
    Output(#[from] io::Error),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Source(err) => err.exit_code(),
            RunError::Output(_) => 5,
        }
    }
}
