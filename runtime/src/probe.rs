//! Discovery of installed and active runtime versions.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use devlaunch_types::{ActiveVersion, RuntimeVersion};
use regex::Regex;

use crate::process::ProcessRunner;
use crate::shell::DetectedShell;

/// `None` only if the pattern fails to compile; extraction then finds nothing.
static VERSION_IN_OUTPUT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"v?\d+\.\d+\.\d+").ok());

/// Read-only view of the runtimes available to launched projects.
///
/// Implementations must not cache: the active version is global OS state that
/// can change between calls.
pub trait VersionProbe: Send + Sync {
    /// Installed versions, newest first. A missing root yields an empty list.
    fn list_installed(&self) -> Vec<RuntimeVersion>;

    /// The active runtime, or [`ActiveVersion::NotDetected`] on any failure.
    fn current_active(&self) -> ActiveVersion;
}

/// Probe for nvm-style layouts: one `v<major>.<minor>.<patch>` directory per
/// installed runtime under a root, plus a version-report command.
pub struct NvmProbe {
    root: Option<PathBuf>,
    shell: DetectedShell,
    version_command: String,
    runner: Arc<dyn ProcessRunner>,
}

impl NvmProbe {
    pub fn new(
        root: Option<PathBuf>,
        shell: DetectedShell,
        version_command: impl Into<String>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            root,
            shell,
            version_command: version_command.into(),
            runner,
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }
}

impl VersionProbe for NvmProbe {
    fn list_installed(&self) -> Vec<RuntimeVersion> {
        let Some(root) = &self.root else {
            tracing::debug!("No runtime installation root configured");
            return Vec::new();
        };
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(root = %root.display(), "Runtime root not readable: {e}");
                return Vec::new();
            }
        };

        let mut versions: Vec<RuntimeVersion> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name();
                RuntimeVersion::from_install_dir_name(name.to_str()?)
            })
            .collect();
        versions.sort_by(|a, b| b.cmp(a));
        tracing::debug!(root = %root.display(), count = versions.len(), "Scanned installed runtimes");
        versions
    }

    fn current_active(&self) -> ActiveVersion {
        let command = self.shell.command(&self.version_command);
        let output = match self.runner.output(&command) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(command = %self.version_command, "Version command failed to start: {e}");
                return ActiveVersion::NotDetected;
            }
        };
        if !output.success() {
            tracing::warn!(
                command = %self.version_command,
                code = ?output.code,
                "Version command exited unsuccessfully"
            );
            return ActiveVersion::NotDetected;
        }
        parse_version_output(&output.stdout)
    }
}

/// Interpret version-report output. A bare label wins; otherwise the first
/// `x.y.z` found anywhere in the text is used.
pub(crate) fn parse_version_output(stdout: &str) -> ActiveVersion {
    let first_line = stdout.lines().map(str::trim).find(|line| !line.is_empty());
    let Some(line) = first_line else {
        return ActiveVersion::NotDetected;
    };
    if let Ok(version) = RuntimeVersion::parse(line)
        && version.parsed().is_some()
    {
        return ActiveVersion::Detected(version);
    }
    VERSION_IN_OUTPUT
        .as_ref()
        .and_then(|re| re.find(stdout))
        .and_then(|m| RuntimeVersion::parse(m.as_str()).ok())
        .map_or(ActiveVersion::NotDetected, ActiveVersion::Detected)
}
