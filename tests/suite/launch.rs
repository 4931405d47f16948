//! Launch protocol: resolve, switch, spawn

use std::fs;
use std::path::PathBuf;

use devlaunch_engine::{CommandError, Launcher, Request, Response};
use devlaunch_runtime::{NvmProbe, NvmSwitcher, TerminalLauncher, TerminalSpawner};
use devlaunch_types::{ConfigurationError, ExternalFailure, PackageManager};

use crate::common::{ExternalCall, Harness, ScriptedRunner, exit, posix_shell, spawn, switch};

fn add(launcher: &mut Launcher, path: &str, pm: PackageManager, version: &str) {
    launcher
        .handle(Request::AddProject {
            path: PathBuf::from(path),
            package_manager: pm,
            runtime_version: version.to_string(),
        })
        .unwrap();
}

fn launch(launcher: &mut Launcher, path: &str) -> Result<Response, CommandError> {
    launcher.handle(Request::LaunchProject {
        path: PathBuf::from(path),
    })
}

#[test]
fn registered_project_switches_then_spawns() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().active("v16.1.0");
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));
    add(&mut launcher, "/tmp/app", PackageManager::Pnpm, "v18.17.0");

    let response = launch(&mut launcher, "/tmp/app").unwrap();

    assert!(matches!(response, Response::Launched(_)));
    assert_eq!(
        harness.log.calls(),
        [switch("v18.17.0"), spawn("pnpm run dev", "/tmp/app")]
    );
}

#[test]
fn empty_version_follows_active_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().active("v20.0.1");
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));
    add(&mut launcher, "/srv/web", PackageManager::Npm, "");

    let Response::Launched(report) = launch(&mut launcher, "/srv/web").unwrap() else {
        panic!("expected a launch report");
    };

    assert_eq!(report.target.unwrap().as_str(), "v20.0.1");
    assert_eq!(
        harness.log.calls(),
        [
            ExternalCall::Probe,
            switch("v20.0.1"),
            spawn("npm run dev", "/srv/web")
        ]
    );
}

#[test]
fn empty_version_without_active_runtime_still_spawns() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));
    add(&mut launcher, "/srv/web", PackageManager::Yarn, "");

    let Response::Launched(report) = launch(&mut launcher, "/srv/web").unwrap() else {
        panic!("expected a launch report");
    };

    assert!(!report.switched);
    assert_eq!(
        harness.log.calls(),
        [ExternalCall::Probe, spawn("yarn run dev", "/srv/web")]
    );
}

#[test]
fn unknown_package_manager_fails_before_switching() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("projects.json");
    fs::write(
        &file,
        r#"[{"path": "/tmp/app", "package_manager": "bun", "node_version": "v18.17.0"}]"#,
    )
    .unwrap();
    let harness = Harness::new().active("v18.17.0");
    let mut launcher = harness.launcher(&file);

    let err = launch(&mut launcher, "/tmp/app").unwrap_err();

    assert!(matches!(
        err,
        CommandError::Configuration(ConfigurationError::UnknownPackageManager(_))
    ));
    assert!(harness.log.calls().is_empty());
}

#[test]
fn failed_switch_is_reported_and_nothing_spawns() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().failing_switch();
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));
    add(&mut launcher, "/tmp/app", PackageManager::Pnpm, "v18.17.0");

    let err = launch(&mut launcher, "/tmp/app").unwrap_err();

    let CommandError::ExternalProcess(failure) = err else {
        panic!("expected an external process error");
    };
    assert_eq!(failure.command, "nvm use v18.17.0");
    assert!(matches!(
        failure.failure,
        ExternalFailure::NonZeroExit { code: Some(1), .. }
    ));
    assert_eq!(harness.log.calls(), [switch("v18.17.0")]);
}

#[test]
fn launching_unregistered_path_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().active("v20.0.1");
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));

    let err = launch(&mut launcher, "/tmp/missing").unwrap_err();

    assert!(matches!(
        err,
        CommandError::Configuration(ConfigurationError::NotRegistered(_))
    ));
    assert!(harness.log.calls().is_empty());
}

#[test]
fn old_runtime_launches_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().minimum("v14.19.0");
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));
    add(&mut launcher, "/tmp/legacy", PackageManager::Npm, "v12.22.12");

    let Response::Launched(report) = launch(&mut launcher, "/tmp/legacy").unwrap() else {
        panic!("expected a launch report");
    };

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        harness.log.calls(),
        [switch("v12.22.12"), spawn("npm run dev", "/tmp/legacy")]
    );
}

#[test]
fn system_seams_run_switch_then_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::with_outputs(vec![Ok(exit(0, "Now using node v18.17.0"))]);
    let mut launcher = Launcher::with_parts(
        dir.path().join("projects.json"),
        Box::new(NvmProbe::new(None, posix_shell(), "node -v", runner.clone())),
        Box::new(NvmSwitcher::new(
            posix_shell(),
            "nvm use {version}",
            runner.clone(),
        )),
        Box::new(TerminalSpawner::new(
            TerminalLauncher::WindowsConsole,
            runner.clone(),
        )),
        None,
    );
    add(&mut launcher, "/tmp/app", PackageManager::Pnpm, "v18.17.0");

    launch(&mut launcher, "/tmp/app").unwrap();

    assert_eq!(runner.ran_scripts(), ["nvm use v18.17.0"]);
    let spawned = runner.spawned.lock().unwrap();
    assert_eq!(spawned.len(), 1);
    assert_eq!(
        spawned[0].args,
        ["/C", "start", "", "/D", "/tmp/app", "cmd", "/K", "pnpm run dev"]
    );
    assert_eq!(spawned[0].cwd, Some(PathBuf::from("/tmp/app")));
}

#[test]
fn emulator_launch_activates_runtime_inside_new_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::with_outputs(vec![Ok(exit(0, ""))]);
    let switcher = NvmSwitcher::new(
        posix_shell(),
        "nvm alias default {version}",
        runner.clone(),
    )
    .with_activate_command(Some(". ~/.nvm/nvm.sh && nvm use {version}"));
    let mut launcher = Launcher::with_parts(
        dir.path().join("projects.json"),
        Box::new(NvmProbe::new(None, posix_shell(), "node -v", runner.clone())),
        Box::new(switcher),
        Box::new(TerminalSpawner::new(
            TerminalLauncher::Emulator {
                binary: PathBuf::from("xterm"),
                args: vec!["-e".to_string()],
            },
            runner.clone(),
        )),
        None,
    );
    add(&mut launcher, "/tmp/app", PackageManager::Pnpm, "v18.17.0");

    launch(&mut launcher, "/tmp/app").unwrap();

    assert_eq!(runner.ran_scripts(), ["nvm alias default v18.17.0"]);
    let spawned = runner.spawned.lock().unwrap();
    assert_eq!(
        spawned[0].args,
        [
            "-e",
            "sh",
            "-c",
            "cd '/tmp/app' && . ~/.nvm/nvm.sh && nvm use v18.17.0 && pnpm run dev; exec \"${SHELL:-sh}\""
        ]
    );
}
