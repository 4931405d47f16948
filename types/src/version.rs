//! Runtime version labels.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label identifying an installed runtime, e.g. `v18.17.0`.
///
/// The raw label is what the version manager understands. When the label is a
/// full `major.minor.patch` triple (with an optional leading `v`) the numeric
/// components are kept alongside it for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeVersion {
    raw: String,
    parsed: Option<(u64, u64, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionLabelError {
    #[error("runtime version label cannot be empty")]
    Empty,
    #[error("runtime version label '{0}' contains characters other than letters, digits, '.', '-' or '_'")]
    InvalidCharacters(String),
}

impl RuntimeVersion {
    /// Parse a label. Only shell-safe characters are accepted because the
    /// label ends up in version-manager command lines.
    pub fn parse(label: &str) -> Result<Self, VersionLabelError> {
        let raw = label.trim();
        if raw.is_empty() {
            return Err(VersionLabelError::Empty);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            return Err(VersionLabelError::InvalidCharacters(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            parsed: parse_triple(raw.strip_prefix('v').unwrap_or(raw)),
        })
    }

    /// Strict form used when scanning the installation root: `v<major>.<minor>.<patch>`.
    #[must_use]
    pub fn from_install_dir_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix('v')?;
        let parsed = parse_triple(rest)?;
        Some(Self {
            raw: name.to_string(),
            parsed: Some(parsed),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn parsed(&self) -> Option<(u64, u64, u64)> {
        self.parsed
    }

    /// `true` when both versions are numeric and `self >= minimum`.
    #[must_use]
    pub fn is_at_least(&self, minimum: &RuntimeVersion) -> bool {
        match (self.parsed, minimum.parsed) {
            (Some(have), Some(want)) => have >= want,
            _ => false,
        }
    }
}

fn parse_triple(s: &str) -> Option<(u64, u64, u64)> {
    let mut parts = s.split('.');
    let mut component = || -> Option<u64> {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };
    let major = component()?;
    let minor = component()?;
    let patch = component()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

impl Ord for RuntimeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.parsed, other.parsed) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for RuntimeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = VersionLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuntimeVersion> for String {
    fn from(value: RuntimeVersion) -> Self {
        value.raw
    }
}

/// The runtime currently active for the OS session, as last reported.
///
/// `NotDetected` means "no constraint": the version report command could not
/// be run or did not print a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveVersion {
    Detected(RuntimeVersion),
    NotDetected,
}

impl ActiveVersion {
    pub const NOT_DETECTED_LABEL: &'static str = "not detected";

    #[must_use]
    pub fn version(&self) -> Option<&RuntimeVersion> {
        match self {
            ActiveVersion::Detected(version) => Some(version),
            ActiveVersion::NotDetected => None,
        }
    }

    #[must_use]
    pub fn into_version(self) -> Option<RuntimeVersion> {
        match self {
            ActiveVersion::Detected(version) => Some(version),
            ActiveVersion::NotDetected => None,
        }
    }
}

impl fmt::Display for ActiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveVersion::Detected(version) => write!(f, "{version}"),
            ActiveVersion::NotDetected => f.write_str(Self::NOT_DETECTED_LABEL),
        }
    }
}
