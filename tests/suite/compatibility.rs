//! Runtime listing, switching and compatibility requests

use devlaunch_engine::{Request, Response, Verdict};
use devlaunch_types::ActiveVersion;

use crate::common::{ExternalCall, Harness, version};

#[test]
fn list_and_current_pass_through_probe() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::new().active("v18.17.0");
    harness.installed = vec![version("v20.0.1"), version("v18.17.0")];
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));

    assert_eq!(
        launcher.handle(Request::ListInstalledRuntimes).unwrap(),
        Response::InstalledRuntimes(vec![version("v20.0.1"), version("v18.17.0")])
    );
    assert_eq!(
        launcher.handle(Request::CurrentRuntime).unwrap(),
        Response::CurrentRuntime(ActiveVersion::Detected(version("v18.17.0")))
    );
}

#[test]
fn switch_request_activates_without_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));

    let response = launcher
        .handle(Request::SwitchRuntime {
            version: "v20.0.1".to_string(),
        })
        .unwrap();

    assert_eq!(response, Response::Switched(version("v20.0.1")));
    assert_eq!(
        harness.log.calls(),
        [ExternalCall::Switch("v20.0.1".to_string())]
    );
}

#[test]
fn check_reports_below_minimum() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().active("v12.22.12").minimum("v14.19.0");
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));

    let Response::Compatibility(report) = launcher
        .handle(Request::CheckCompatibility { version: None })
        .unwrap()
    else {
        panic!("expected a compatibility report");
    };
    assert_eq!(report.verdict, Verdict::BelowMinimum);

    let Response::Compatibility(report) = launcher
        .handle(Request::CheckCompatibility {
            version: Some("v22.3.0".to_string()),
        })
        .unwrap()
    else {
        panic!("expected a compatibility report");
    };
    assert_eq!(report.verdict, Verdict::Compatible);
}

#[test]
fn check_without_detected_runtime_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new().minimum("v14.19.0");
    let mut launcher = harness.launcher(&dir.path().join("projects.json"));

    let Response::Compatibility(report) = launcher
        .handle(Request::CheckCompatibility { version: None })
        .unwrap()
    else {
        panic!("expected a compatibility report");
    };
    assert_eq!(report.verdict, Verdict::Unknown);
    assert_eq!(report.version, ActiveVersion::NotDetected);
}
