//! Shell command bodies
//!
//! Test bodies and class fixtures declared in a manifest are shell commands.

use anyhow::Result;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::debug;

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Exit { command: String, status: ExitStatus },
}

impl CommandError {
    /// The command could not be started at all
    pub fn is_spawn(&self) -> bool {
        matches!(self, CommandError::Spawn { .. })
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Run a shell command; a non-zero exit is an error
pub fn run_shell(command: &str) -> Result<(), CommandError> {
    debug!("Running `{}`", command);

    let status = shell(command)
        .stdin(Stdio::null())
        .status()
        .map_err(|source| CommandError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::Exit {
            command: command.to_string(),
            status,
        })
    }
}

/// Test body running `command`
pub fn command_body(command: &str) -> impl Fn() -> Result<()> + 'static {
    let command = command.to_string();
    move || run_shell(&command).map_err(Into::into)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command() {
        assert!(run_shell("true").is_ok());
    }

    #[test]
    fn test_failing_command() {
        let err = run_shell("exit 3").unwrap_err();
        assert!(!err.is_spawn());
        assert!(err.to_string().starts_with("`exit 3` exited with"));
    }

    #[test]
    fn test_body_error_downcasts() {
        let body = command_body("false");
        let err = body().unwrap_err();
        assert!(err.downcast_ref::<CommandError>().is_some());
    }
}
