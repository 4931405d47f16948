//! Registered launch targets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{EnumParseError, PackageManager, RuntimeVersion, VersionLabelError};

fn default_package_manager() -> String {
    PackageManager::default().as_str().to_string()
}

/// A registered project, stored verbatim in the registry file.
///
/// `package_manager` stays a raw string so that a hand-edited file with an
/// unknown value still loads; it is resolved (and rejected) at launch time.
/// An empty `node_version` means "use whatever runtime is active".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub path: PathBuf,
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    #[serde(default)]
    pub node_version: String,
}

impl Project {
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        package_manager: PackageManager,
        node_version: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            package_manager: package_manager.as_str().to_string(),
            node_version: node_version.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn package_manager(&self) -> Result<PackageManager, EnumParseError> {
        PackageManager::parse(&self.package_manager)
    }

    /// The declared runtime, or `None` when the project follows the active one.
    pub fn runtime_version(&self) -> Result<Option<RuntimeVersion>, VersionLabelError> {
        if self.node_version.trim().is_empty() {
            return Ok(None);
        }
        RuntimeVersion::parse(&self.node_version).map(Some)
    }
}
