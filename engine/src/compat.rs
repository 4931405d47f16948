//! Runtime compatibility floor.

use devlaunch_types::{ActiveVersion, RuntimeVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Compatible,
    BelowMinimum,
    /// No minimum configured, nothing detected, or a non-numeric label.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityReport {
    pub version: ActiveVersion,
    pub minimum: Option<RuntimeVersion>,
    pub verdict: Verdict,
}

#[must_use]
pub fn assess(version: &ActiveVersion, minimum: Option<&RuntimeVersion>) -> CompatibilityReport {
    let verdict = match (version.version(), minimum) {
        (Some(have), Some(want)) if have.parsed().is_some() && want.parsed().is_some() => {
            if have.is_at_least(want) {
                Verdict::Compatible
            } else {
                Verdict::BelowMinimum
            }
        }
        _ => Verdict::Unknown,
    };
    CompatibilityReport {
        version: version.clone(),
        minimum: minimum.cloned(),
        verdict,
    }
}
