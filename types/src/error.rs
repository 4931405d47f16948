//! Failure taxonomy shared across the workspace.
//!
//! Nothing here is fatal to the process: every variant is reported back to
//! the caller, which decides how to present it.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{EnumParseError, VersionLabelError};

/// Invalid or conflicting input. The operation is aborted with no state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("project path cannot be empty")]
    EmptyPath,
    #[error("project path must be absolute: {}", .0.display())]
    RelativePath(PathBuf),
    #[error("project is already registered: {}", .0.display())]
    DuplicatePath(PathBuf),
    #[error("project is not registered: {}", .0.display())]
    NotRegistered(PathBuf),
    #[error(transparent)]
    UnknownPackageManager(#[from] EnumParseError),
    #[error(transparent)]
    InvalidVersion(#[from] VersionLabelError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalFailure {
    /// The process ran and exited unsuccessfully. `None` when killed by a signal.
    NonZeroExit { code: Option<i32>, stderr: String },
    /// The process could not be started at all.
    Spawn { message: String },
}

/// A probed, switched or launched process failed. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command `{command}` failed: {failure}")]
pub struct ExternalProcessError {
    pub command: String,
    pub failure: ExternalFailure,
}

impl ExternalProcessError {
    #[must_use]
    pub fn non_zero_exit(
        command: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            failure: ExternalFailure::NonZeroExit {
                code,
                stderr: stderr.into(),
            },
        }
    }

    #[must_use]
    pub fn spawn(command: impl Into<String>, err: &io::Error) -> Self {
        Self {
            command: command.into(),
            failure: ExternalFailure::Spawn {
                message: err.to_string(),
            },
        }
    }
}

impl fmt::Display for ExternalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalFailure::NonZeroExit { code, stderr } => {
                match code {
                    Some(code) => write!(f, "exit status {code}")?,
                    None => f.write_str("terminated by signal")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            ExternalFailure::Spawn { message } => write!(f, "could not start: {message}"),
        }
    }
}

/// Registry file could not be read, parsed or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl PersistenceError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            PersistenceError::Read { path, .. }
            | PersistenceError::Parse { path, .. }
            | PersistenceError::Write { path, .. } => path,
        }
    }
}
