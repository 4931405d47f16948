//! Launch state machine.
//!
//! ```text
//! Selected -> VersionResolved -> VersionSwitched -> Spawned -> Completed
//!     |              |                 |               |
//!     +--------------+-----------------+---------------+--> Failed
//! ```
//!
//! Each launch is one synchronous pass. Nothing is spawned unless the runtime
//! switch succeeded, and nothing is rolled back when it did not.

use std::fmt;
use std::path::PathBuf;

use devlaunch_runtime::{DevCommand, DevServerSpawner, VersionProbe, VersionSwitcher};
use devlaunch_types::{
    ActiveVersion, ConfigurationError, ExternalProcessError, PackageManager, Project,
    RuntimeVersion,
};
use thiserror::Error;

use crate::compat::{Verdict, assess};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Selected,
    VersionResolved,
    VersionSwitched,
    Spawned,
    Completed,
    Failed,
}

impl LaunchStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LaunchStage::Selected => "selected",
            LaunchStage::VersionResolved => "version-resolved",
            LaunchStage::VersionSwitched => "version-switched",
            LaunchStage::Spawned => "spawned",
            LaunchStage::Completed => "completed",
            LaunchStage::Failed => "failed",
        }
    }
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    ExternalProcess(#[from] ExternalProcessError),
}

/// What a successful launch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub path: PathBuf,
    pub package_manager: PackageManager,
    /// Runtime the launch targeted; `None` when nothing was declared or detected.
    pub target: Option<RuntimeVersion>,
    pub switched: bool,
    pub pid: u32,
    pub warnings: Vec<String>,
}

pub struct LaunchCoordinator<'a> {
    probe: &'a dyn VersionProbe,
    switcher: &'a dyn VersionSwitcher,
    spawner: &'a dyn DevServerSpawner,
    minimum_version: Option<&'a RuntimeVersion>,
}

impl<'a> LaunchCoordinator<'a> {
    pub fn new(
        probe: &'a dyn VersionProbe,
        switcher: &'a dyn VersionSwitcher,
        spawner: &'a dyn DevServerSpawner,
    ) -> Self {
        Self {
            probe,
            switcher,
            spawner,
            minimum_version: None,
        }
    }

    /// Warn (never block) when the target runtime is older than `minimum`.
    #[must_use]
    pub fn with_minimum_version(mut self, minimum: Option<&'a RuntimeVersion>) -> Self {
        self.minimum_version = minimum;
        self
    }

    pub fn launch(&self, project: &Project) -> Result<LaunchReport, LaunchError> {
        let result = self.run(project);
        match &result {
            Ok(report) => tracing::info!(
                path = %report.path.display(),
                target = ?report.target.as_ref().map(RuntimeVersion::as_str),
                pid = report.pid,
                stage = %LaunchStage::Completed,
                "Launch completed"
            ),
            Err(e) => tracing::warn!(
                path = %project.path.display(),
                stage = %LaunchStage::Failed,
                "Launch failed: {e}"
            ),
        }
        result
    }

    fn run(&self, project: &Project) -> Result<LaunchReport, LaunchError> {
        tracing::debug!(path = %project.path.display(), stage = %LaunchStage::Selected);

        // Configuration problems surface before any external process is touched.
        let package_manager = project
            .package_manager()
            .map_err(ConfigurationError::from)?;
        let declared = project
            .runtime_version()
            .map_err(ConfigurationError::from)?;

        let target = match declared {
            Some(version) => Some(version),
            None => {
                let active = self.probe.current_active().into_version();
                if active.is_none() {
                    tracing::info!(
                        path = %project.path.display(),
                        "No runtime declared or detected; launching without switching"
                    );
                }
                active
            }
        };
        tracing::debug!(
            target = ?target.as_ref().map(RuntimeVersion::as_str),
            stage = %LaunchStage::VersionResolved
        );

        let mut switched = false;
        if let Some(version) = &target {
            self.switcher.activate(version)?;
            switched = true;
            tracing::debug!(version = %version, stage = %LaunchStage::VersionSwitched);
        }

        let mut warnings = Vec::new();
        if let Some(version) = &target {
            let report = assess(
                &ActiveVersion::Detected(version.clone()),
                self.minimum_version,
            );
            if report.verdict == Verdict::BelowMinimum
                && let Some(minimum) = &report.minimum
            {
                let warning = format!(
                    "runtime {version} is older than the recommended minimum {minimum}; the dev server may not work"
                );
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
        }

        let prelude = target
            .as_ref()
            .and_then(|version| self.switcher.launch_prelude(version));
        let command =
            DevCommand::dev_server(package_manager, &project.path).with_prelude(prelude);
        let pid = self.spawner.spawn(&command)?;
        tracing::debug!(pid, stage = %LaunchStage::Spawned);

        Ok(LaunchReport {
            path: project.path.clone(),
            package_manager,
            target,
            switched,
            pid,
            warnings,
        })
    }
}
