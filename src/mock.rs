//! Test doubles for the tool runner and reporter.
//!
//! `RecordingRunner` captures every argument vector instead of launching a
//! process, with optional failure injection for error-path tests.

use std::io;
use std::sync::Mutex;

use crate::report::Reporter;
use crate::tool::{InvokeError, ToolRunner, XCODEBUILD};

/// How an injected invocation failure presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// The process could not be launched at all.
    SpawnFailure,
    /// The process launched but exited with this status code.
    ExitStatus(i32),
}

impl FailureMode {
    fn to_error(self) -> InvokeError {
        match self {
            FailureMode::SpawnFailure => InvokeError::Spawn {
                tool: XCODEBUILD.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            },
            FailureMode::ExitStatus(code) => InvokeError::Failed {
                tool: XCODEBUILD.to_string(),
                code: Some(code),
            },
        }
    }
}

/// Tool runner that records invocations instead of spawning processes.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Vec<String>>>,
    // (failing invocation index, mode); None index fails every call
    failure: Mutex<Option<(Option<usize>, FailureMode)>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every invocation with the given mode.
    pub fn fail_with(&self, mode: FailureMode) {
        *self.failure.lock().unwrap() = Some((None, mode));
    }

    /// Fail only the invocation with the given 0-based index.
    pub fn fail_call(&self, index: usize, mode: FailureMode) {
        *self.failure.lock().unwrap() = Some((Some(index), mode));
    }

    /// All recorded argument vectors, in invocation order.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    /// Number of recorded invocations.
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, args: &[String]) -> Result<(), InvokeError> {
        let index = {
            let mut calls = self.invocations.lock().unwrap();
            calls.push(args.to_vec());
            calls.len() - 1
        };

        match *self.failure.lock().unwrap() {
            Some((None, mode)) => Err(mode.to_error()),
            Some((Some(at), mode)) if at == index => Err(mode.to_error()),
            _ => Ok(()),
        }
    }
}

/// Severity of a captured report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Reporter that captures messages for assertions.
#[derive(Debug, Default)]
pub struct CapturingReporter {
    events: Mutex<Vec<(Level, String)>>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages_at(Level::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages_at(Level::Error)
    }

    fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Reporter for CapturingReporter {
    fn info(&self, msg: &str) {
        self.events.lock().unwrap().push((Level::Info, msg.to_string()));
    }

    fn warn(&self, msg: &str) {
        self.events.lock().unwrap().push((Level::Warn, msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.events.lock().unwrap().push((Level::Error, msg.to_string()));
    }
}
