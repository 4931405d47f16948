//! Launch orchestration for devlaunch.
//!
//! [`Launcher`] owns the project registry and the three runtime seams, and is
//! the single entry point front ends talk to through [`Launcher::handle`].

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use devlaunch_config::DevlaunchConfig;
use devlaunch_registry::{LoadReport, ProjectRegistry};
use devlaunch_runtime::{
    DevServerSpawner, NvmProbe, NvmSwitcher, ProcessRunner, SystemRunner, TerminalLauncher,
    TerminalSpawner, VersionProbe, VersionSwitcher, detect_shell,
};
use devlaunch_types::{
    ActiveVersion, ConfigurationError, PackageManager, PersistenceError, Project, RuntimeVersion,
};
use thiserror::Error;

mod commands;
mod compat;
mod coordinator;

pub use commands::{CommandError, Request, Response};
pub use compat::{CompatibilityReport, Verdict, assess};
pub use coordinator::{LaunchCoordinator, LaunchError, LaunchReport, LaunchStage};
pub use devlaunch_registry::Removal;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot locate the project registry: no home directory and no [registry].path")]
    NoRegistryPath,
}

pub struct Launcher {
    registry: ProjectRegistry,
    load_warning: Option<PersistenceError>,
    probe: Box<dyn VersionProbe>,
    switcher: Box<dyn VersionSwitcher>,
    spawner: Box<dyn DevServerSpawner>,
    minimum_version: Option<RuntimeVersion>,
}

impl Launcher {
    /// Wire the system probe, switcher and terminal spawner from `config` and
    /// load the registry it points at.
    pub fn from_config(config: &DevlaunchConfig) -> Result<Self, SetupError> {
        let registry_path = config.registry_path().ok_or(SetupError::NoRegistryPath)?;
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner);
        let shell = detect_shell(config.shell());
        tracing::debug!(shell = %shell, registry = %registry_path.display(), "Wiring launcher");

        let probe = NvmProbe::new(
            config.install_root(),
            shell.clone(),
            config.version_command(),
            Arc::clone(&runner),
        );
        let switcher = NvmSwitcher::new(shell, config.use_command(), Arc::clone(&runner))
            .with_activate_command(config.activate_command());
        let spawner = TerminalSpawner::new(TerminalLauncher::detect(config.terminal()), runner);

        let report = load_registry(registry_path, config.legacy_registry_path().as_deref());
        Ok(Self::assemble(
            report,
            Box::new(probe),
            Box::new(switcher),
            Box::new(spawner),
            config.minimum_version(),
        ))
    }

    /// Load the registry at `registry_path` and use the given seams.
    pub fn with_parts(
        registry_path: impl Into<PathBuf>,
        probe: Box<dyn VersionProbe>,
        switcher: Box<dyn VersionSwitcher>,
        spawner: Box<dyn DevServerSpawner>,
        minimum_version: Option<RuntimeVersion>,
    ) -> Self {
        Self::assemble(
            ProjectRegistry::load(registry_path),
            probe,
            switcher,
            spawner,
            minimum_version,
        )
    }

    fn assemble(
        report: LoadReport,
        probe: Box<dyn VersionProbe>,
        switcher: Box<dyn VersionSwitcher>,
        spawner: Box<dyn DevServerSpawner>,
        minimum_version: Option<RuntimeVersion>,
    ) -> Self {
        Self {
            registry: report.registry,
            load_warning: report.warning,
            probe,
            switcher,
            spawner,
            minimum_version,
        }
    }

    /// Why the registry started out empty, if loading it failed.
    #[must_use]
    pub fn load_warning(&self) -> Option<&PersistenceError> {
        self.load_warning.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn handle(&mut self, request: Request) -> Result<Response, CommandError> {
        tracing::debug!(request = request.name(), "Handling request");
        match request {
            Request::ListProjects => Ok(Response::Projects(self.list_projects())),
            Request::AddProject {
                path,
                package_manager,
                runtime_version,
            } => self
                .add_project(path, package_manager, runtime_version)
                .map(Response::Added),
            Request::DeleteProject { path } => self.delete_project(&path).map(Response::Deleted),
            Request::LaunchProject { path } => self.launch_project(&path).map(Response::Launched),
            Request::ListInstalledRuntimes => {
                Ok(Response::InstalledRuntimes(self.list_installed_runtimes()))
            }
            Request::CurrentRuntime => Ok(Response::CurrentRuntime(self.current_runtime())),
            Request::SwitchRuntime { version } => {
                self.switch_runtime(&version).map(Response::Switched)
            }
            Request::CheckCompatibility { version } => self
                .check_compatibility(version.as_deref())
                .map(Response::Compatibility),
        }
    }

    #[must_use]
    pub fn list_projects(&self) -> Vec<Project> {
        self.registry.projects().to_vec()
    }

    pub fn add_project(
        &mut self,
        path: PathBuf,
        package_manager: PackageManager,
        runtime_version: String,
    ) -> Result<Project, CommandError> {
        let project = Project::new(path, package_manager, runtime_version.trim());
        self.registry.add(project.clone())?;
        Ok(project)
    }

    pub fn delete_project(&mut self, path: &Path) -> Result<Removal, CommandError> {
        Ok(self.registry.remove(path)?)
    }

    pub fn launch_project(&self, path: &Path) -> Result<LaunchReport, CommandError> {
        let project = self
            .registry
            .get(path)
            .ok_or_else(|| ConfigurationError::NotRegistered(path.to_path_buf()))?;
        let coordinator = LaunchCoordinator::new(
            self.probe.as_ref(),
            self.switcher.as_ref(),
            self.spawner.as_ref(),
        )
        .with_minimum_version(self.minimum_version.as_ref());
        Ok(coordinator.launch(project)?)
    }

    #[must_use]
    pub fn list_installed_runtimes(&self) -> Vec<RuntimeVersion> {
        self.probe.list_installed()
    }

    #[must_use]
    pub fn current_runtime(&self) -> ActiveVersion {
        self.probe.current_active()
    }

    pub fn switch_runtime(&self, version: &str) -> Result<RuntimeVersion, CommandError> {
        let version = RuntimeVersion::parse(version.trim()).map_err(ConfigurationError::from)?;
        self.switcher.activate(&version)?;
        tracing::info!(version = %version, "Runtime switched");
        Ok(version)
    }

    pub fn check_compatibility(
        &self,
        version: Option<&str>,
    ) -> Result<CompatibilityReport, CommandError> {
        let version = match version {
            Some(label) => ActiveVersion::Detected(
                RuntimeVersion::parse(label.trim()).map_err(ConfigurationError::from)?,
            ),
            None => self.probe.current_active(),
        };
        Ok(assess(&version, self.minimum_version.as_ref()))
    }
}

/// Load the registry at `path`, importing `legacy` when only the legacy file exists.
fn load_registry(path: PathBuf, legacy: Option<&Path>) -> LoadReport {
    match legacy {
        Some(legacy) => ProjectRegistry::load_or_import(path, legacy),
        None => ProjectRegistry::load(path),
    }
}
