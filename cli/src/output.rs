//! Plain-text rendering of engine responses.

use std::io::{self, Write};

use devlaunch_engine::{CompatibilityReport, LaunchReport, Removal, Response, Verdict};
use devlaunch_types::{ActiveVersion, Project};

pub fn render(response: &Response, out: &mut impl Write) -> io::Result<()> {
    match response {
        Response::Projects(projects) => render_projects(projects, out),
        Response::Added(project) => writeln!(
            out,
            "Registered {} ({}, node {})",
            project.path.display(),
            project.package_manager,
            version_or_current(&project.node_version)
        ),
        Response::Deleted(Removal::Removed(_)) => writeln!(out, "Removed"),
        Response::Deleted(Removal::NotFound) => writeln!(out, "Nothing to remove"),
        Response::Launched(report) => render_launch(report, out),
        Response::InstalledRuntimes(versions) => {
            if versions.is_empty() {
                return writeln!(out, "No installed runtimes found");
            }
            for version in versions {
                writeln!(out, "{version}")?;
            }
            Ok(())
        }
        Response::CurrentRuntime(active) => writeln!(out, "{active}"),
        Response::Switched(version) => writeln!(out, "Switched to {version}"),
        Response::Compatibility(report) => render_compatibility(report, out),
    }
}

fn version_or_current(label: &str) -> &str {
    if label.is_empty() { "current" } else { label }
}

fn render_projects(projects: &[Project], out: &mut impl Write) -> io::Result<()> {
    if projects.is_empty() {
        return writeln!(out, "No projects registered");
    }
    let width = projects
        .iter()
        .map(|p| p.path.display().to_string().chars().count())
        .max()
        .unwrap_or(0);
    for project in projects {
        writeln!(
            out,
            "{:<width$}  {:<4}  {}",
            project.path.display().to_string(),
            project.package_manager,
            version_or_current(&project.node_version)
        )?;
    }
    Ok(())
}

fn render_launch(report: &LaunchReport, out: &mut impl Write) -> io::Result<()> {
    for warning in &report.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    let runtime = match &report.target {
        Some(version) if report.switched => version.to_string(),
        _ => "current runtime".to_string(),
    };
    writeln!(
        out,
        "Launched `{} run dev` in {} on {runtime} (pid {})",
        report.package_manager,
        report.path.display(),
        report.pid
    )
}

fn render_compatibility(report: &CompatibilityReport, out: &mut impl Write) -> io::Result<()> {
    let minimum = report
        .minimum
        .as_ref()
        .map_or_else(|| "none".to_string(), ToString::to_string);
    match (&report.version, report.verdict) {
        (ActiveVersion::NotDetected, _) => {
            writeln!(out, "No active runtime detected (minimum {minimum})")
        }
        (version, Verdict::Compatible) => {
            writeln!(out, "{version} is compatible (minimum {minimum})")
        }
        (version, Verdict::BelowMinimum) => writeln!(
            out,
            "{version} is older than the minimum {minimum}; dev servers may fail to start"
        ),
        (version, Verdict::Unknown) => {
            writeln!(out, "{version}: compatibility unknown (minimum {minimum})")
        }
    }
}
