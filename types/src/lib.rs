//! Core domain types for devlaunch.
//!
//! This crate contains pure domain types with no IO, no processes, and minimal
//! dependencies. Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod error;
mod package_manager;
mod project;
mod version;

pub use error::{ConfigurationError, ExternalFailure, ExternalProcessError, PersistenceError};
pub use package_manager::{EnumParseError, PackageManager};
pub use project::Project;
pub use version::{ActiveVersion, RuntimeVersion, VersionLabelError};
