//! Activation of an installed runtime.

use std::sync::Arc;

use devlaunch_config::VERSION_PLACEHOLDER;
use devlaunch_types::{ExternalProcessError, RuntimeVersion};

use crate::process::ProcessRunner;
use crate::shell::DetectedShell;

/// Makes a runtime the active one for processes started afterwards.
///
/// A failed activation leaves global runtime state wherever the version
/// manager left it; nothing is rolled back or retried.
pub trait VersionSwitcher: Send + Sync {
    fn activate(&self, version: &RuntimeVersion) -> Result<(), ExternalProcessError>;

    /// Shell snippet a launched terminal runs before the dev server so that
    /// `version` is active in that shell. `None` when activation is global.
    fn launch_prelude(&self, _version: &RuntimeVersion) -> Option<String> {
        None
    }
}

/// Switcher driving a version manager's "use" command through a shell.
pub struct NvmSwitcher {
    shell: DetectedShell,
    use_command: String,
    activate_command: Option<String>,
    runner: Arc<dyn ProcessRunner>,
}

impl NvmSwitcher {
    pub fn new(
        shell: DetectedShell,
        use_command: impl Into<String>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            shell,
            use_command: use_command.into(),
            activate_command: None,
            runner,
        }
    }

    /// Template run inside each launched terminal, see [`VersionSwitcher::launch_prelude`].
    #[must_use]
    pub fn with_activate_command(mut self, template: Option<impl Into<String>>) -> Self {
        self.activate_command = template.map(Into::into);
        self
    }

    /// The shell script for `version`. Templates without a placeholder get the
    /// label appended.
    #[must_use]
    pub fn script_for(&self, version: &RuntimeVersion) -> String {
        render(&self.use_command, version)
    }
}

fn render(template: &str, version: &RuntimeVersion) -> String {
    if template.contains(VERSION_PLACEHOLDER) {
        template.replace(VERSION_PLACEHOLDER, version.as_str())
    } else {
        format!("{} {}", template.trim_end(), version)
    }
}

impl VersionSwitcher for NvmSwitcher {
    fn activate(&self, version: &RuntimeVersion) -> Result<(), ExternalProcessError> {
        let script = self.script_for(version);
        let command = self.shell.command(&script);
        tracing::info!(version = %version, command = %script, "Activating runtime");

        let output = self
            .runner
            .output(&command)
            .map_err(|e| ExternalProcessError::spawn(&script, &e))?;
        if !output.success() {
            tracing::warn!(version = %version, code = ?output.code, "Runtime activation failed");
            let detail = if output.stderr.trim().is_empty() {
                output.stdout
            } else {
                output.stderr
            };
            return Err(ExternalProcessError::non_zero_exit(script, output.code, detail));
        }
        Ok(())
    }

    fn launch_prelude(&self, version: &RuntimeVersion) -> Option<String> {
        self.activate_command
            .as_deref()
            .map(|template| render(template, version))
    }
}
