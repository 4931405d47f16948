//! Runtime environment control for devlaunch.
//!
//! Three seams, each with a system implementation built on [`ProcessRunner`]:
//!
//! - [`VersionProbe`] / [`NvmProbe`]: installed and active runtime versions
//! - [`VersionSwitcher`] / [`NvmSwitcher`]: activate an installed runtime
//! - [`DevServerSpawner`] / [`TerminalSpawner`]: detached dev-server launch
//!
//! All external calls are synchronous and have no timeout, except the final
//! launch, which is never awaited.

pub mod probe;
pub mod process;
pub mod shell;
pub mod switcher;
pub mod terminal;

pub use probe::{NvmProbe, VersionProbe};
pub use process::{CommandLine, CommandOutput, ProcessRunner, SystemRunner};
pub use shell::{DetectedShell, detect_shell};
pub use switcher::{NvmSwitcher, VersionSwitcher};
pub use terminal::{DevCommand, DevServerSpawner, TerminalLauncher, TerminalSpawner};
