//! Shared test doubles and fixtures
//!
//! Every external effect (version report, runtime switch, dev-server spawn) is
//! recorded into one ordered [`CallLog`] so tests can assert on the exact
//! sequence of calls.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use devlaunch_engine::Launcher;
use devlaunch_runtime::{
    CommandLine, CommandOutput, DetectedShell, DevCommand, DevServerSpawner, ProcessRunner,
    VersionProbe, VersionSwitcher,
};
use devlaunch_types::{ActiveVersion, ExternalProcessError, RuntimeVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalCall {
    Probe,
    Switch(String),
    Spawn { command: String, cwd: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<ExternalCall>>>);

impl CallLog {
    pub fn push(&self, call: ExternalCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ExternalCall> {
        self.0.lock().unwrap().clone()
    }
}

pub fn switch(version: &str) -> ExternalCall {
    ExternalCall::Switch(version.to_string())
}

pub fn spawn(command: &str, cwd: &str) -> ExternalCall {
    ExternalCall::Spawn {
        command: command.to_string(),
        cwd: PathBuf::from(cwd),
    }
}

pub struct FakeProbe {
    pub installed: Vec<RuntimeVersion>,
    pub active: ActiveVersion,
    pub log: CallLog,
}

impl VersionProbe for FakeProbe {
    fn list_installed(&self) -> Vec<RuntimeVersion> {
        self.installed.clone()
    }

    fn current_active(&self) -> ActiveVersion {
        self.log.push(ExternalCall::Probe);
        self.active.clone()
    }
}

pub struct FakeSwitcher {
    pub fail_with_code: Option<i32>,
    pub log: CallLog,
}

impl VersionSwitcher for FakeSwitcher {
    fn activate(&self, version: &RuntimeVersion) -> Result<(), ExternalProcessError> {
        self.log.push(ExternalCall::Switch(version.to_string()));
        match self.fail_with_code {
            Some(code) => Err(ExternalProcessError::non_zero_exit(
                format!("nvm use {version}"),
                Some(code),
                format!("node {version} is not installed"),
            )),
            None => Ok(()),
        }
    }
}

pub struct FakeSpawner {
    pub log: CallLog,
}

impl DevServerSpawner for FakeSpawner {
    fn spawn(&self, command: &DevCommand) -> Result<u32, ExternalProcessError> {
        self.log.push(ExternalCall::Spawn {
            command: command.to_string(),
            cwd: command.cwd.clone(),
        });
        Ok(4321)
    }
}

/// Builder for a [`Launcher`] over recording fakes and a registry file in `dir`.
pub struct Harness {
    pub active: ActiveVersion,
    pub installed: Vec<RuntimeVersion>,
    pub switch_fails: bool,
    pub minimum: Option<RuntimeVersion>,
    pub log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            active: ActiveVersion::NotDetected,
            installed: Vec::new(),
            switch_fails: false,
            minimum: None,
            log: CallLog::default(),
        }
    }

    pub fn active(mut self, label: &str) -> Self {
        self.active = ActiveVersion::Detected(version(label));
        self
    }

    pub fn failing_switch(mut self) -> Self {
        self.switch_fails = true;
        self
    }

    pub fn minimum(mut self, label: &str) -> Self {
        self.minimum = Some(version(label));
        self
    }

    pub fn launcher(&self, registry: &Path) -> Launcher {
        Launcher::with_parts(
            registry,
            Box::new(FakeProbe {
                installed: self.installed.clone(),
                active: self.active.clone(),
                log: self.log.clone(),
            }),
            Box::new(FakeSwitcher {
                fail_with_code: self.switch_fails.then_some(1),
                log: self.log.clone(),
            }),
            Box::new(FakeSpawner {
                log: self.log.clone(),
            }),
            self.minimum.clone(),
        )
    }
}

pub fn version(label: &str) -> RuntimeVersion {
    RuntimeVersion::parse(label).unwrap()
}

/// [`ProcessRunner`] that replays queued outputs and records every command.
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: Mutex<VecDeque<io::Result<CommandOutput>>>,
    pub ran: Mutex<Vec<CommandLine>>,
    pub spawned: Mutex<Vec<CommandLine>>,
}

impl ScriptedRunner {
    pub fn with_outputs(outputs: Vec<io::Result<CommandOutput>>) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs.into()),
            ..Self::default()
        })
    }

    pub fn ran_scripts(&self) -> Vec<String> {
        self.ran
            .lock()
            .unwrap()
            .iter()
            .filter_map(|line| line.args.last().cloned())
            .collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn output(&self, command: &CommandLine) -> io::Result<CommandOutput> {
        self.ran.lock().unwrap().push(command.clone());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(exit(0, "")))
    }

    fn spawn_detached(&self, command: &CommandLine) -> io::Result<u32> {
        self.spawned.lock().unwrap().push(command.clone());
        Ok(9000)
    }
}

pub fn exit(code: i32, stdout: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn posix_shell() -> DetectedShell {
    DetectedShell {
        binary: PathBuf::from("sh"),
        args: vec!["-c".to_string()],
        name: "sh".to_string(),
    }
}
