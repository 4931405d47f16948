//! devlaunch CLI - binary entry point.
//!
//! ```text
//! main() -> Cli::parse() -> Launcher::from_config() -> Launcher::handle(Request) -> render()
//! ```
//!
//! Command output goes to stdout, failures to stderr as `error: ...` with exit
//! code 1. Tracing output only ever goes to the log file.

mod logging;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use devlaunch_config::DevlaunchConfig;
use devlaunch_engine::{Launcher, Request};
use devlaunch_types::{ActiveVersion, PackageManager};

#[derive(Debug, Parser)]
#[command(name = "devlaunch", version)]
#[command(about = "Launch registered dev servers under the Node runtime they were built for")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered projects in registration order
    List,
    /// Register a project directory
    Add {
        path: PathBuf,
        /// Package manager used to run `<pm> run dev`
        #[arg(long = "pm", default_value = "npm")]
        package_manager: PackageManager,
        /// Runtime version to activate before launching (defaults to the active one)
        #[arg(long)]
        node: Option<String>,
    },
    /// Unregister a project directory
    Remove { path: PathBuf },
    /// Switch to the project's runtime and start its dev server in a new terminal
    Launch { path: PathBuf },
    /// List installed runtime versions, newest first
    Versions,
    /// Show the active runtime version
    Current,
    /// Activate an installed runtime version
    Use { version: String },
    /// Check a runtime version (default: the active one) against the minimum
    Check { version: Option<String> },
}

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match DevlaunchConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            eprintln!("warning: {err}; using defaults");
            DevlaunchConfig::default()
        }
    };
    let mut launcher = Launcher::from_config(&config)?;
    if let Some(warning) = launcher.load_warning() {
        eprintln!("warning: {warning}; starting with an empty project list");
    }

    let request = into_request(cli.command, &launcher)?;
    let response = launcher.handle(request)?;

    let mut stdout = io::stdout().lock();
    output::render(&response, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn into_request(command: Command, launcher: &Launcher) -> Result<Request> {
    Ok(match command {
        Command::List => Request::ListProjects,
        Command::Add {
            path,
            package_manager,
            node,
        } => {
            let runtime_version = match node {
                Some(version) => version,
                None => match launcher.current_runtime() {
                    ActiveVersion::Detected(version) => version.as_str().to_string(),
                    ActiveVersion::NotDetected => String::new(),
                },
            };
            Request::AddProject {
                path: absolute(path)?,
                package_manager,
                runtime_version,
            }
        }
        Command::Remove { path } => Request::DeleteProject {
            path: absolute(path)?,
        },
        Command::Launch { path } => Request::LaunchProject {
            path: absolute(path)?,
        },
        Command::Versions => Request::ListInstalledRuntimes,
        Command::Current => Request::CurrentRuntime,
        Command::Use { version } => Request::SwitchRuntime { version },
        Command::Check { version } => Request::CheckCompatibility { version },
    })
}

/// Registry keys are absolute; relative arguments resolve against the cwd.
fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Ok(path);
    }
    std::path::absolute(&path).with_context(|| format!("resolving {}", path.display()))
}
