//! Shell execution of hook commands.

use std::io;
use std::path::Path;
use std::process;

/// Why a hook command did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn shell: {0}")]
    Spawn(#[from] io::Error),
    #[error("command exited with {}", exit_label(.0))]
    Status(Option<i32>),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

/// Runs a shell command to completion.
pub trait CommandRunner {
    /// Run `command` in `cwd` with the given extra environment, blocking until
    /// it exits. Standard streams are inherited.
    fn run(&self, command: &str, cwd: &Path, env: &[(&str, &str)]) -> Result<(), ExecError>;
}

/// Runs commands through `sh -c` (`cmd /C` on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path, env: &[(&str, &str)]) -> Result<(), ExecError> {
        let mut cmd = if cfg!(windows) {
            let mut c = process::Command::new("cmd");
            c.arg("/C");
            c
        } else {
            let mut c = process::Command::new("sh");
            c.arg("-c");
            c
        };
        cmd.arg(command)
            .current_dir(cwd)
            .stdin(process::Stdio::inherit())
            .stdout(process::Stdio::inherit())
            .stderr(process::Stdio::inherit());
        for (key, value) in env {
            cmd.env(key, value);
        }

        tracing::debug!(command, cwd = %cwd.display(), "running hook command");
        let status = cmd.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Status(status.code()))
        }
    }
}
