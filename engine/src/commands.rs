//! Typed command surface.
//!
//! Front ends never reach into the registry or the runtime seams directly; they
//! build a [`Request`] and get back a [`Response`] or a [`CommandError`].

use std::path::PathBuf;

use devlaunch_registry::{RegistryError, Removal};
use devlaunch_types::{
    ActiveVersion, ConfigurationError, ExternalProcessError, PackageManager, PersistenceError,
    Project, RuntimeVersion,
};
use thiserror::Error;

use crate::compat::CompatibilityReport;
use crate::coordinator::{LaunchError, LaunchReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListProjects,
    AddProject {
        path: PathBuf,
        package_manager: PackageManager,
        /// Empty means "follow the active runtime".
        runtime_version: String,
    },
    DeleteProject {
        path: PathBuf,
    },
    LaunchProject {
        path: PathBuf,
    },
    ListInstalledRuntimes,
    CurrentRuntime,
    SwitchRuntime {
        version: String,
    },
    /// Check `version`, or the active runtime when `None`, against the minimum.
    CheckCompatibility {
        version: Option<String>,
    },
}

impl Request {
    /// Stable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Request::ListProjects => "list-projects",
            Request::AddProject { .. } => "add-project",
            Request::DeleteProject { .. } => "delete-project",
            Request::LaunchProject { .. } => "launch-project",
            Request::ListInstalledRuntimes => "list-installed-runtimes",
            Request::CurrentRuntime => "current-runtime",
            Request::SwitchRuntime { .. } => "switch-runtime",
            Request::CheckCompatibility { .. } => "check-compatibility",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Projects(Vec<Project>),
    Added(Project),
    Deleted(Removal),
    Launched(LaunchReport),
    InstalledRuntimes(Vec<RuntimeVersion>),
    CurrentRuntime(ActiveVersion),
    Switched(RuntimeVersion),
    Compatibility(CompatibilityReport),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    ExternalProcess(#[from] ExternalProcessError),
}

impl From<RegistryError> for CommandError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Configuration(e) => CommandError::Configuration(e),
            RegistryError::Persistence(e) => CommandError::Persistence(e),
        }
    }
}

impl From<LaunchError> for CommandError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::Configuration(e) => CommandError::Configuration(e),
            LaunchError::ExternalProcess(e) => CommandError::ExternalProcess(e),
        }
    }
}
