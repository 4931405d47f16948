//! Version discovery and switching against the system seams

use std::fs;
use std::io;

use devlaunch_runtime::{NvmProbe, NvmSwitcher, VersionProbe, VersionSwitcher};
use devlaunch_types::ActiveVersion;

use crate::common::{ScriptedRunner, exit, posix_shell, version};

#[test]
fn installed_versions_are_numeric_descending() {
    let root = tempfile::tempdir().unwrap();
    for name in ["v18.2.0", "v16.1.0", "v20.0.1", "notaversion"] {
        fs::create_dir(root.path().join(name)).unwrap();
    }
    let probe = NvmProbe::new(
        Some(root.path().to_path_buf()),
        posix_shell(),
        "node -v",
        ScriptedRunner::with_outputs(Vec::new()),
    );

    let labels: Vec<String> = probe
        .list_installed()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(labels, ["v20.0.1", "v18.2.0", "v16.1.0"]);
}

#[test]
fn minor_versions_compare_numerically() {
    let root = tempfile::tempdir().unwrap();
    for name in ["v18.9.0", "v18.10.0", "v9.0.0"] {
        fs::create_dir(root.path().join(name)).unwrap();
    }
    let probe = NvmProbe::new(
        Some(root.path().to_path_buf()),
        posix_shell(),
        "node -v",
        ScriptedRunner::with_outputs(Vec::new()),
    );

    assert_eq!(
        probe.list_installed(),
        [version("v18.10.0"), version("v18.9.0"), version("v9.0.0")]
    );
}

#[test]
fn missing_root_lists_nothing() {
    let root = tempfile::tempdir().unwrap();
    let probe = NvmProbe::new(
        Some(root.path().join("absent")),
        posix_shell(),
        "node -v",
        ScriptedRunner::with_outputs(Vec::new()),
    );

    assert!(probe.list_installed().is_empty());
}

#[test]
fn current_active_is_requeried_every_call() {
    let runner = ScriptedRunner::with_outputs(vec![
        Ok(exit(0, "v18.17.0\n")),
        Ok(exit(0, "v20.0.1\n")),
    ]);
    let probe = NvmProbe::new(None, posix_shell(), "node -v", runner.clone());

    assert_eq!(
        probe.current_active(),
        ActiveVersion::Detected(version("v18.17.0"))
    );
    assert_eq!(
        probe.current_active(),
        ActiveVersion::Detected(version("v20.0.1"))
    );
    assert_eq!(runner.ran_scripts(), ["node -v", "node -v"]);
}

#[test]
fn probe_failures_become_not_detected() {
    let runner = ScriptedRunner::with_outputs(vec![
        Ok(exit(127, "")),
        Err(io::Error::new(io::ErrorKind::NotFound, "sh: node: not found")),
        Ok(exit(0, "")),
    ]);
    let probe = NvmProbe::new(None, posix_shell(), "node -v", runner);

    for _ in 0..3 {
        assert_eq!(probe.current_active(), ActiveVersion::NotDetected);
    }
}

#[test]
fn activating_same_version_twice_succeeds() {
    let runner = ScriptedRunner::with_outputs(Vec::new());
    let switcher = NvmSwitcher::new(posix_shell(), "nvm use {version}", runner.clone());
    let v18 = version("v18.17.0");

    assert!(switcher.activate(&v18).is_ok());
    assert!(switcher.activate(&v18).is_ok());
    assert_eq!(
        runner.ran_scripts(),
        ["nvm use v18.17.0", "nvm use v18.17.0"]
    );
}

#[test]
fn non_zero_use_is_a_typed_failure() {
    let runner = ScriptedRunner::with_outputs(vec![Ok(exit(3, "version not installed"))]);
    let switcher = NvmSwitcher::new(posix_shell(), "nvm use", runner);

    let err = switcher.activate(&version("v99.0.0")).unwrap_err();

    assert_eq!(err.command, "nvm use v99.0.0");
    assert!(err.to_string().contains("exit status 3"));
}
