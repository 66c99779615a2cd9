use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tracing::info;

use crate::error::{Error, Result};

/// A subprocess invocation: program, argument vector and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Command {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Shell-like rendering used in logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_tokio(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Executes [`Command`]s.
///
/// Dropping a returned future before it resolves must terminate the child.
pub trait CommandRunner: Send + Sync {
    /// Run with stdout/stderr forwarded to this process; succeed only on exit status 0.
    fn run(&self, cmd: &Command) -> impl Future<Output = Result<()>> + Send;

    /// Run capturing stdout (stderr stays forwarded); succeed only on exit status 0.
    fn capture(&self, cmd: &Command) -> impl Future<Output = Result<String>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, cmd: &Command) -> Result<()> {
        info!(cmd = %cmd.display(), "run");
        let status = cmd
            .to_tokio()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Error::CommandFailed {
                cmd: cmd.display(),
                source: e,
            })?;
        check_status(cmd, status)
    }

    async fn capture(&self, cmd: &Command) -> Result<String> {
        info!(cmd = %cmd.display(), "capture");
        let output = cmd
            .to_tokio()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| Error::CommandFailed {
                cmd: cmd.display(),
                source: e,
            })?;
        check_status(cmd, output.status)?;
        String::from_utf8(output.stdout).map_err(|_| Error::NonUtf8Output { cmd: cmd.display() })
    }
}

fn check_status(cmd: &Command, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(Error::ExitStatus {
            cmd: cmd.display(),
            code: status.code(),
        })
    }
}
