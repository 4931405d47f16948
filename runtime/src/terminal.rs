//! Detached dev-server launches in a new terminal window.
//!
//! The launcher's responsibility ends once the terminal process has been
//! started: the dev server is never waited on, supervised, or killed.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devlaunch_config::TerminalConfig;
use devlaunch_types::{ExternalProcessError, PackageManager};

use crate::process::{CommandLine, ProcessRunner};

/// The dev-server command for a project, before terminal wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Shell snippet run first in the same shell, e.g. a runtime activation.
    pub prelude: Option<String>,
}

impl DevCommand {
    /// `<package manager> run dev` in `cwd`.
    #[must_use]
    pub fn dev_server(package_manager: PackageManager, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: package_manager.program().to_string(),
            args: package_manager.dev_args(),
            cwd: cwd.into(),
            prelude: None,
        }
    }

    #[must_use]
    pub fn with_prelude(mut self, prelude: Option<String>) -> Self {
        self.prelude = prelude;
        self
    }

    /// What the terminal's shell runs: the prelude, then the dev server only if
    /// the prelude succeeded.
    #[must_use]
    pub fn script(&self) -> String {
        match &self.prelude {
            Some(prelude) => format!("{prelude} && {self}"),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for DevCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Starts a dev server that outlives the launcher. Returns the pid of the
/// process that was started (usually the terminal, not the server itself).
pub trait DevServerSpawner: Send + Sync {
    fn spawn(&self, command: &DevCommand) -> Result<u32, ExternalProcessError>;
}

/// How a new interactive window is opened on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalLauncher {
    /// `cmd /K` in a fresh console opened by `start` (Windows).
    WindowsConsole,
    /// Terminal.app driven through `osascript` (macOS).
    MacTerminal,
    /// An X11/Wayland emulator taking the command after `args`.
    Emulator { binary: PathBuf, args: Vec<String> },
    /// Nothing suitable was found; launches fail with a spawn error.
    Unavailable,
}

/// Known emulators and the flag that introduces the command to run.
const EMULATORS: &[(&str, &[&str])] = &[
    ("x-terminal-emulator", &["-e"]),
    ("gnome-terminal", &["--"]),
    ("konsole", &["-e"]),
    ("xfce4-terminal", &["-x"]),
    ("alacritty", &["-e"]),
    ("kitty", &[]),
    ("xterm", &["-e"]),
];

impl TerminalLauncher {
    /// Configured emulator first, then the platform default.
    #[must_use]
    pub fn detect(config: Option<&TerminalConfig>) -> Self {
        if !cfg!(windows)
            && let Some(cfg) = config
            && let Some(binary) = &cfg.binary
        {
            return TerminalLauncher::Emulator {
                binary: PathBuf::from(binary),
                args: cfg.args.clone().unwrap_or_else(|| vec!["-e".to_string()]),
            };
        }
        Self::platform_default()
    }

    fn platform_default() -> Self {
        if cfg!(windows) {
            return TerminalLauncher::WindowsConsole;
        }
        if cfg!(target_os = "macos") {
            return TerminalLauncher::MacTerminal;
        }
        for (name, args) in EMULATORS {
            if let Ok(binary) = which::which(name) {
                return TerminalLauncher::Emulator {
                    binary,
                    args: args.iter().map(ToString::to_string).collect(),
                };
            }
        }
        TerminalLauncher::Unavailable
    }

    /// The command line that opens a window running `command`, or `None` when
    /// no terminal is available.
    #[must_use]
    pub fn wrap(&self, command: &DevCommand) -> Option<CommandLine> {
        let dev = command.script();
        let line = match self {
            // `start` gives the new window its own console handles; the empty
            // argument is the window title.
            TerminalLauncher::WindowsConsole => CommandLine::new("cmd").args([
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                "/D".to_string(),
                command.cwd.to_string_lossy().into_owned(),
                "cmd".to_string(),
                "/K".to_string(),
                dev,
            ]),
            TerminalLauncher::MacTerminal => {
                let script = format!("cd {} && {dev}", sh_quote(&command.cwd));
                CommandLine::new("osascript").args([
                    "-e".to_string(),
                    format!(
                        "tell application \"Terminal\" to do script \"{}\"",
                        applescript_escape(&script)
                    ),
                    "-e".to_string(),
                    "tell application \"Terminal\" to activate".to_string(),
                ])
            }
            TerminalLauncher::Emulator { binary, args } => {
                // Keep the window open after the server exits so its output stays visible.
                let script = format!(
                    "cd {} && {dev}; exec \"${{SHELL:-sh}}\"",
                    sh_quote(&command.cwd)
                );
                CommandLine::new(binary)
                    .args(args.iter().cloned())
                    .args(["sh".to_string(), "-c".to_string(), script])
            }
            TerminalLauncher::Unavailable => return None,
        };
        Some(line.current_dir(&command.cwd))
    }
}

/// Single-quote for POSIX shells.
fn sh_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

fn applescript_escape(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', "\\\"")
}

/// [`DevServerSpawner`] that opens a new terminal window per launch.
pub struct TerminalSpawner {
    launcher: TerminalLauncher,
    runner: Arc<dyn ProcessRunner>,
}

impl TerminalSpawner {
    pub fn new(launcher: TerminalLauncher, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { launcher, runner }
    }

    #[must_use]
    pub fn launcher(&self) -> &TerminalLauncher {
        &self.launcher
    }
}

impl DevServerSpawner for TerminalSpawner {
    fn spawn(&self, command: &DevCommand) -> Result<u32, ExternalProcessError> {
        let Some(line) = self.launcher.wrap(command) else {
            let err = io::Error::new(io::ErrorKind::NotFound, "no terminal emulator found");
            return Err(ExternalProcessError::spawn(command.to_string(), &err));
        };
        tracing::debug!(terminal = %line, "Opening terminal");

        let pid = self
            .runner
            .spawn_detached(&line)
            .map_err(|e| ExternalProcessError::spawn(command.to_string(), &e))?;
        tracing::info!(
            command = %command,
            cwd = %command.cwd.display(),
            pid,
            "Dev server launched"
        );
        Ok(pid)
    }
}
