//! Error types for srs-build.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Error type for srs-build operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream directory could not be listed
    #[error("failed to list directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// List file could not be opened or read
    #[error("failed to read list file {path:?}: {source}")]
    ReadList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Intermediate source document could not be written
    #[error("failed to write source file {path:?}: {source}")]
    WriteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External compiler could not be started
    #[error("failed to launch rule-set compiler {program:?}: {source}")]
    CompilerLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External compiler exited unsuccessfully
    #[error("rule-set compiler {program:?} failed: {status}")]
    CompilerFailed { program: PathBuf, status: ExitStatus },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading inputs or writing intermediates failed.
    Io,
    /// The external compiler was missing, crashed or exited non-zero.
    Compile,
    /// Paths or options were inconsistent before anything ran.
    Config,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CompilerLaunch { .. } | Error::CompilerFailed { .. } => ErrorKind::Compile,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_)
            | Error::ReadDir { .. }
            | Error::ReadList { .. }
            | Error::WriteSource { .. }
            | Error::Json(_) => ErrorKind::Io,
        }
    }

    /// Process exit code to report for this error.
    ///
    /// A compiler that exited with a non-zero code has that code propagated;
    /// everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CompilerFailed { status, .. } => match status.code() {
                Some(code) if code != 0 => code,
                _ => 1,
            },
            _ => 1,
        }
    }
}

/// Result type alias for srs-build operations.
pub type Result<T> = std::result::Result<T, Error>;
