//! External process invocation.
//!
//! Commands run one at a time and block until they exit. Long-running build
//! tools stream straight to the console; short probes such as `java -version`
//! have their output captured. [`CommandRunner`] is the seam that lets tests
//! replace real processes.

use crate::error::ProcessError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
    /// Working directory, when different from the current one.
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// A command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// `npx`, resolved to the `.cmd` shim on Windows.
    pub fn npx() -> Self {
        Self::new(if cfg!(windows) { "npx.cmd" } else { "npx" })
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run inside `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands.
pub trait CommandRunner {
    /// Run with inherited stdio and wait for exit.
    fn run_streaming(&mut self, cmd: &CommandSpec) -> Result<(), ProcessError>;

    /// Run and return stdout followed by stderr.
    fn capture(&mut self, cmd: &CommandSpec) -> Result<String, ProcessError>;
}

/// Runner backed by real OS processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_streaming(&mut self, cmd: &CommandSpec) -> Result<(), ProcessError> {
        log::info!("Running: {}", cmd);
        let status = cmd
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ProcessError::Spawn {
                command: cmd.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                command: cmd.to_string(),
                code: status.code(),
                output: String::new(),
            })
        }
    }

    fn capture(&mut self, cmd: &CommandSpec) -> Result<String, ProcessError> {
        log::debug!("Capturing: {}", cmd);
        let output = cmd
            .to_command()
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: cmd.to_string(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(text)
        } else {
            Err(ProcessError::Failed {
                command: cmd.to_string(),
                code: output.status.code(),
                output: text,
            })
        }
    }
}
