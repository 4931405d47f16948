//! Package manager enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

const PACKAGE_MANAGER_VALUES: &[&str] = &["npm", "pnpm", "yarn"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid package manager '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn expected(&self) -> &'static [&'static str] {
        self.expected
    }
}

impl PackageManager {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Executable name looked up on `PATH` inside the launched terminal.
    #[must_use]
    pub const fn program(self) -> &'static str {
        self.as_str()
    }

    /// Arguments that start the project's dev server.
    #[must_use]
    pub fn dev_args(self) -> Vec<String> {
        vec!["run".to_string(), "dev".to_string()]
    }

    pub fn parse(s: &str) -> Result<Self, EnumParseError> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            _ => Err(EnumParseError {
                raw: trimmed.to_string(),
                expected: PACKAGE_MANAGER_VALUES,
            }),
        }
    }

    #[must_use]
    pub fn all() -> &'static [PackageManager] {
        &[PackageManager::Npm, PackageManager::Pnpm, PackageManager::Yarn]
    }
}

impl FromStr for PackageManager {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
