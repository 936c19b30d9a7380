//! External process execution.
//!
//! Toolchains never spawn processes directly; they describe the call as a
//! [`ProcessInvocation`] and hand it to a [`ProcessRunner`]. Tests swap in a
//! runner that records invocations instead of executing them.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, info, warn};

/// A fully described external process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub executable: PathBuf,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    /// Number of trailing arguments that are operands (input files).
    pub trailing_operands: usize,
    /// Variables added on top of the inherited environment.
    pub environment: BTreeMap<String, String>,
    /// Fail with [`ProcessError::ExecutableNotFound`] before spawning if missing.
    pub must_exist: bool,
    /// Forward stdout/stderr lines to the log while the process runs.
    pub stream_output: bool,
}

impl ProcessInvocation {
    pub fn new(executable: impl Into<PathBuf>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            arguments: Vec::new(),
            trailing_operands: 0,
            working_directory: working_directory.into(),
            environment: BTreeMap::new(),
            must_exist: false,
            stream_output: false,
        }
    }

    /// The argument string as a single line.
    ///
    /// The trailing operands are always quoted. Other arguments are quoted only
    /// when empty or containing whitespace, so the line can be pasted into a
    /// shell to reproduce the call.
    pub fn argument_string(&self) -> String {
        let first_operand = self.arguments.len().saturating_sub(self.trailing_operands);
        self.arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if i >= first_operand || arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("\"{arg}\"")
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Environment assignments, executable, and argument string.
    pub fn command_line(&self) -> String {
        let mut line = String::new();
        for (key, value) in &self.environment {
            line.push_str(&format!("{key}=\"{value}\" "));
        }
        line.push_str(&format!("\"{}\" {}", self.executable.display(), self.argument_string()));
        line
    }
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The process could not be run at all.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("executable not found: {}", path.display())]
    ExecutableNotFound { path: PathBuf },

    #[error("failed to start {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {}: {source}", path.display())]
    Wait {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs external processes to completion.
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation and block until it exits.
    ///
    /// A non-zero exit is reported through [`ProcessExit`], not as an error.
    fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessExit, ProcessError>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessExit, ProcessError> {
        let path = &invocation.executable;
        if invocation.must_exist && !path.is_file() {
            return Err(ProcessError::ExecutableNotFound { path: path.clone() });
        }

        info!(command = %invocation.command_line(), "running");

        let output = if invocation.stream_output {
            Stdio::piped
        } else {
            Stdio::null
        };
        let mut child = Command::new(path)
            .args(&invocation.arguments)
            .current_dir(&invocation.working_directory)
            .envs(&invocation.environment)
            .stdin(Stdio::null())
            .stdout(output())
            .stderr(output())
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    ProcessError::ExecutableNotFound { path: path.clone() }
                } else {
                    ProcessError::Spawn {
                        path: path.clone(),
                        source,
                    }
                }
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let status = std::thread::scope(|scope| {
            if let Some(stdout) = stdout {
                scope.spawn(move || forward_lines(stdout, false));
            }
            if let Some(stderr) = stderr {
                scope.spawn(move || forward_lines(stderr, true));
            }
            child.wait()
        })
        .map_err(|source| ProcessError::Wait {
            path: path.clone(),
            source,
        })?;

        let exit = ProcessExit {
            code: status.code(),
        };
        debug!(executable = %path.display(), code = ?exit.code, "process exited");
        Ok(exit)
    }
}

fn forward_lines(stream: impl Read, is_stderr: bool) {
    for line in BufReader::new(stream).lines() {
        let Ok(line) = line else { break };
        if is_stderr {
            warn!("{line}");
        } else {
            info!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_string_quotes_operands() {
        let mut inv = ProcessInvocation::new("/tools/mono-aot-cross", "/tools");
        inv.arguments = vec![
            "--aot=full".into(),
            "-O=all".into(),
            "/out/Game.dll".into(),
        ];
        inv.trailing_operands = 1;
        assert_eq!(inv.argument_string(), "--aot=full -O=all \"/out/Game.dll\"");

        inv.arguments[2] = "-weird name.dll".into();
        assert_eq!(inv.argument_string(), "--aot=full -O=all \"-weird name.dll\"");
    }

    #[test]
    fn options_with_spaces_are_quoted() {
        let mut inv = ProcessInvocation::new("/tools/cc", "/tools");
        inv.arguments = vec!["-isysroot".into(), "/Xcode SDKs/iPhoneOS.sdk".into()];
        assert_eq!(inv.argument_string(), "-isysroot \"/Xcode SDKs/iPhoneOS.sdk\"");
    }

    #[test]
    fn command_line_includes_environment() {
        let mut inv = ProcessInvocation::new("/tools/cc", "/tools");
        inv.arguments = vec!["-v".into()];
        inv.environment.insert("MONO_PATH".into(), "/a:/b".into());
        assert_eq!(inv.command_line(), "MONO_PATH=\"/a:/b\" \"/tools/cc\" -v");
    }

    #[test]
    fn missing_executable_is_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = ProcessInvocation::new(dir.path().join("no-such-tool"), dir.path());
        inv.must_exist = true;
        let err = SystemProcessRunner.run(&inv).unwrap_err();
        assert!(matches!(err, ProcessError::ExecutableNotFound { .. }));

        inv.must_exist = false;
        let err = SystemProcessRunner.run(&inv).unwrap_err();
        assert!(matches!(err, ProcessError::ExecutableNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = ProcessInvocation::new("/bin/sh", dir.path());
        inv.arguments = vec!["-c".into(), "exit 3".into()];
        let exit = SystemProcessRunner.run(&inv).unwrap();
        assert_eq!(exit.code, Some(3));
        assert!(!exit.success());
    }

    #[cfg(unix)]
    #[test]
    fn passes_environment_and_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), b"").unwrap();
        let mut inv = ProcessInvocation::new("/bin/sh", dir.path());
        inv.arguments = vec![
            "-c".into(),
            "test -f marker && test \"$KEEL_PROBE\" = yes && echo ok".into(),
        ];
        inv.environment.insert("KEEL_PROBE".into(), "yes".into());
        inv.must_exist = true;
        inv.stream_output = true;
        assert!(SystemProcessRunner.run(&inv).unwrap().success());
    }
}
