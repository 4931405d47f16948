//! Configuration for devlaunch.
//!
//! The config file is optional. Every accessor on [`DevlaunchConfig`] falls back
//! to a platform default, so `DevlaunchConfig::default()` is a complete
//! configuration.
//!
//! ```toml
//! [registry]
//! path = "${HOME}/.devlaunch/projects.json"
//! legacy_path = "${HOME}/.vue_projects.json"
//!
//! [runtime]
//! root_env = "NVM_HOME"
//! version_command = "node -v"
//! use_command = "nvm use {version}"
//! activate_command = ""
//! minimum_version = "v14.19.0"
//! ```

use std::path::PathBuf;
use std::{env, fs};

use devlaunch_types::RuntimeVersion;
use serde::Deserialize;

/// Environment variable naming the version-manager installation root.
pub const DEFAULT_ROOT_ENV: &str = "NVM_HOME";

/// Placeholder substituted into [`RuntimeConfig::use_command`].
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Oldest runtime the dev servers are known to work with.
pub const DEFAULT_MINIMUM_VERSION: &str = "v14.19.0";

/// Registry file of earlier releases, imported when the current one is absent.
pub const LEGACY_REGISTRY_FILE: &str = ".vue_projects.json";

#[cfg(windows)]
const DEFAULT_VERSION_COMMAND: &str = "node -v";
// Loading nvm puts its default alias on PATH, which is what `use` moves.
#[cfg(not(windows))]
const DEFAULT_VERSION_COMMAND: &str = r#"[ -s "${NVM_DIR:-$HOME/.nvm}/nvm.sh" ] && . "${NVM_DIR:-$HOME/.nvm}/nvm.sh" >/dev/null 2>&1; node -v"#;

#[cfg(windows)]
const DEFAULT_USE_COMMAND: &str = "nvm use {version}";
// nvm on Unix is a shell function and `use` only lasts for that shell, so the
// default alias is moved instead.
#[cfg(not(windows))]
const DEFAULT_USE_COMMAND: &str =
    r#". "${NVM_DIR:-$HOME/.nvm}/nvm.sh" && nvm alias default {version}"#;

// nvm-windows switches a global symlink, so new consoles already see it.
#[cfg(windows)]
const DEFAULT_ACTIVATE_COMMAND: Option<&str> = None;
#[cfg(not(windows))]
const DEFAULT_ACTIVATE_COMMAND: Option<&str> =
    Some(r#". "${NVM_DIR:-$HOME/.nvm}/nvm.sh" && nvm use {version}"#);

#[derive(Debug, Default, Deserialize)]
pub struct DevlaunchConfig {
    pub registry: Option<RegistryConfig>,
    pub runtime: Option<RuntimeConfig>,
    /// Shell used to run version commands.
    pub shell: Option<ShellConfig>,
    /// Terminal emulator used to host launched dev servers.
    pub terminal: Option<TerminalConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistryConfig {
    /// Registry file location. `${VAR}` references are expanded.
    pub path: Option<String>,
    /// File imported once when `path` does not exist. Empty disables the import.
    pub legacy_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RuntimeConfig {
    /// Installation root; takes precedence over `root_env`.
    pub root: Option<String>,
    /// Environment variable consulted for the installation root.
    pub root_env: Option<String>,
    /// Command printing the active runtime version.
    pub version_command: Option<String>,
    /// Version-manager "use" command; `{version}` is replaced by the label.
    pub use_command: Option<String>,
    /// Run inside each launched terminal before the dev server, so runtimes
    /// whose activation is per-shell apply there too. Empty disables.
    pub activate_command: Option<String>,
    /// Launches below this version log a compatibility warning. Empty disables.
    pub minimum_version: Option<String>,
}

/// Shell configuration for version commands.
///
/// ```toml
/// [shell]
/// binary = "pwsh"
/// args = ["-NoProfile", "-Command"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ShellConfig {
    /// Override shell binary (e.g., "pwsh", "bash", "/usr/local/bin/fish").
    pub binary: Option<String>,
    /// Override shell args (e.g., `["-c"]` or `["/C"]`).
    pub args: Option<Vec<String>>,
}

/// Terminal emulator override (Unix only; Windows always opens a new console).
///
/// ```toml
/// [terminal]
/// binary = "wezterm"
/// args = ["start", "--"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct TerminalConfig {
    pub binary: Option<String>,
    /// Arguments placed between the binary and the command to run.
    pub args: Option<Vec<String>>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

impl DevlaunchConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: PathBuf) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Registry file: configured path, else `~/.devlaunch/projects.json`.
    #[must_use]
    pub fn registry_path(&self) -> Option<PathBuf> {
        self.registry
            .as_ref()
            .and_then(|r| r.path.as_deref())
            .map(|p| PathBuf::from(expand_env_vars(p)))
            .or_else(|| data_dir().map(|dir| dir.join("projects.json")))
    }

    /// Earlier registry file to import from, default `~/.vue_projects.json`.
    #[must_use]
    pub fn legacy_registry_path(&self) -> Option<PathBuf> {
        match self.registry.as_ref().and_then(|r| r.legacy_path.as_deref()) {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(PathBuf::from(expand_env_vars(p.trim()))),
            None => dirs::home_dir().map(|home| home.join(LEGACY_REGISTRY_FILE)),
        }
    }

    /// Version-manager installation root, resolved against the process environment.
    #[must_use]
    pub fn install_root(&self) -> Option<PathBuf> {
        self.install_root_with(|name| env::var(name).ok())
    }

    /// Installation root with an explicit environment lookup.
    ///
    /// Order: `[runtime].root`, then the `root_env` variable, then the platform default.
    pub fn install_root_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        let runtime = self.runtime.as_ref();
        if let Some(root) = runtime.and_then(|r| r.root.as_deref())
            && !root.trim().is_empty()
        {
            return Some(PathBuf::from(expand_env_vars(root.trim())));
        }

        let var = runtime
            .and_then(|r| r.root_env.as_deref())
            .unwrap_or(DEFAULT_ROOT_ENV);
        if let Some(value) = lookup(var)
            && !value.trim().is_empty()
        {
            return Some(PathBuf::from(value.trim()));
        }

        default_install_root()
    }

    #[must_use]
    pub fn version_command(&self) -> &str {
        self.runtime
            .as_ref()
            .and_then(|r| r.version_command.as_deref())
            .unwrap_or(DEFAULT_VERSION_COMMAND)
    }

    #[must_use]
    pub fn use_command(&self) -> &str {
        self.runtime
            .as_ref()
            .and_then(|r| r.use_command.as_deref())
            .unwrap_or(DEFAULT_USE_COMMAND)
    }

    #[must_use]
    pub fn activate_command(&self) -> Option<&str> {
        match self.runtime.as_ref().and_then(|r| r.activate_command.as_deref()) {
            Some(cmd) if cmd.trim().is_empty() => None,
            Some(cmd) => Some(cmd),
            None => DEFAULT_ACTIVATE_COMMAND,
        }
    }

    /// Compatibility floor. An invalid configured value falls back to the default.
    #[must_use]
    pub fn minimum_version(&self) -> Option<RuntimeVersion> {
        let raw = self
            .runtime
            .as_ref()
            .and_then(|r| r.minimum_version.as_deref())
            .unwrap_or(DEFAULT_MINIMUM_VERSION);
        if raw.trim().is_empty() {
            return None;
        }
        match RuntimeVersion::parse(raw) {
            Ok(version) => Some(version),
            Err(err) => {
                tracing::warn!("Ignoring invalid minimum_version {raw:?}: {err}");
                RuntimeVersion::parse(DEFAULT_MINIMUM_VERSION).ok()
            }
        }
    }

    #[must_use]
    pub fn shell(&self) -> Option<&ShellConfig> {
        self.shell.as_ref()
    }

    #[must_use]
    pub fn terminal(&self) -> Option<&TerminalConfig> {
        self.terminal.as_ref()
    }
}

/// Per-user state directory: `~/.devlaunch`.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".devlaunch"))
}

pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(windows)]
fn default_install_root() -> Option<PathBuf> {
    // nvm-windows installs under %APPDATA%\nvm.
    dirs::data_dir().map(|roaming| roaming.join("nvm"))
}

#[cfg(not(windows))]
fn default_install_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".nvm").join("versions").join("node"))
}
