//! Project registry.
//!
//! An ordered list of [`Project`]s mirrored to a single JSON file. Insertion
//! order is the only ordering. Every mutation rewrites the whole file; there is
//! no lock and no change detection, so the last writer wins.
//!
//! ```json
//! [
//!   {
//!     "path": "/home/dev/web",
//!     "package_manager": "pnpm",
//!     "node_version": "v18.17.0"
//!   }
//! ]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use devlaunch_types::{ConfigurationError, PersistenceError, Project, RuntimeVersion};
use devlaunch_utils::{atomic_write, recover_bak_file};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Outcome of [`ProjectRegistry::remove`]. Removing an absent path is benign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Number of entries removed (more than one only for hand-edited duplicates).
    Removed(usize),
    NotFound,
}

/// Result of [`ProjectRegistry::load`].
///
/// An unreadable or corrupt file degrades to an empty registry; the cause is
/// carried in `warning` for the caller to show.
#[derive(Debug)]
pub struct LoadReport {
    pub registry: ProjectRegistry,
    pub warning: Option<PersistenceError>,
}

#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    path: PathBuf,
    projects: Vec<Project>,
}

impl ProjectRegistry {
    /// An empty registry bound to `path`. Nothing is written until the first mutation.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            projects: Vec::new(),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> LoadReport {
        let path = path.into();
        recover_bak_file(&path);

        match read_projects(&path) {
            Ok(Some(projects)) => {
                tracing::debug!(path = %path.display(), count = projects.len(), "Registry loaded");
                LoadReport {
                    registry: Self { path, projects },
                    warning: None,
                }
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "No registry file yet");
                LoadReport {
                    registry: Self::empty(path),
                    warning: None,
                }
            }
            Err(warning) => LoadReport {
                registry: Self::empty(path),
                warning: Some(warning),
            },
        }
    }

    /// Like [`load`](Self::load), but when `path` does not exist yet and
    /// `legacy` does, the legacy file's entries are copied into `path`.
    ///
    /// The legacy file is only read, never modified. A failed copy keeps the
    /// imported entries in memory and reports the write error as the warning.
    pub fn load_or_import(path: impl Into<PathBuf>, legacy: &Path) -> LoadReport {
        let path = path.into();
        recover_bak_file(&path);
        if path.exists() || !legacy.is_file() {
            return Self::load(path);
        }

        match read_projects(legacy) {
            Ok(Some(projects)) => {
                tracing::info!(
                    from = %legacy.display(),
                    to = %path.display(),
                    count = projects.len(),
                    "Importing legacy registry"
                );
                let registry = Self { path, projects };
                let warning = registry.persist().err();
                LoadReport { registry, warning }
            }
            Ok(None) => Self::load(path),
            Err(warning) => LoadReport {
                registry: Self::empty(path),
                warning: Some(warning),
            },
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Project> {
        self.projects.iter().find(|p| p.path() == path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Validate, append and persist. On a failed write the append is undone so
    /// memory keeps mirroring the file.
    pub fn add(&mut self, project: Project) -> Result<(), RegistryError> {
        validate(&project)?;
        if self.get(project.path()).is_some() {
            return Err(ConfigurationError::DuplicatePath(project.path.clone()).into());
        }

        tracing::info!(path = %project.path.display(), "Registering project");
        self.projects.push(project);
        if let Err(e) = self.persist() {
            self.projects.pop();
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove every entry registered under `path`.
    pub fn remove(&mut self, path: &Path) -> Result<Removal, RegistryError> {
        let before = self.projects.clone();
        self.projects.retain(|p| p.path() != path);
        let removed = before.len() - self.projects.len();
        if removed == 0 {
            tracing::debug!(path = %path.display(), "Remove: project not registered");
            return Ok(Removal::NotFound);
        }

        tracing::info!(path = %path.display(), removed, "Removing project");
        if let Err(e) = self.persist() {
            self.projects = before;
            return Err(e.into());
        }
        Ok(Removal::Removed(removed))
    }

    /// Overwrite the registry file with the full in-memory list.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        let write_err = |source: io::Error| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        let mut json = serde_json::to_string_pretty(&self.projects)
            .map_err(|e| write_err(io::Error::other(e)))?;
        json.push('\n');
        atomic_write(&self.path, json.as_bytes()).map_err(write_err)
    }
}

/// `Ok(None)` when no file exists at `path`.
fn read_projects(path: &Path) -> Result<Option<Vec<Project>>, PersistenceError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to read registry: {e}");
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_str(&content).map(Some).map_err(|e| {
        tracing::warn!(path = %path.display(), "Failed to parse registry: {e}");
        PersistenceError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

fn validate(project: &Project) -> Result<(), ConfigurationError> {
    if project.path.as_os_str().is_empty() || project.path.to_string_lossy().trim().is_empty() {
        return Err(ConfigurationError::EmptyPath);
    }
    if !project.path.is_absolute() {
        return Err(ConfigurationError::RelativePath(project.path.clone()));
    }
    project.package_manager()?;
    if !project.node_version.trim().is_empty() {
        RuntimeVersion::parse(&project.node_version)?;
    }
    Ok(())
}
