// Runs external commands (package manager invocations, user-supplied
// commands behind `xinstall throttle`). Commands are argument vectors;
// nothing is passed through a shell.

use crate::errors::CommandError;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::process::Command;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a command from a full argument vector (`argv[0]` is the program).
    pub fn from_argv(argv: Vec<String>) -> Result<Self, CommandError> {
        let mut argv = argv.into_iter();
        let program = argv.next().filter(|p| !p.trim().is_empty()).ok_or(CommandError::Empty)?;
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }

    /// Wraps this command in `sudo`.
    pub fn with_sudo(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    /// The command line as it would be typed, for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs `spec` with inherited stdin/stdout/stderr and waits for it.
///
/// # Returns
/// * `Ok(())` - the process exited with status 0
/// * `Err(CommandError::Spawn)` - the program could not be started
/// * `Err(CommandError::Failed)` - the process exited unsuccessfully
pub fn run_command(spec: &CommandSpec) -> Result<(), CommandError> {
    let command_line = spec.display();
    log_info!("[Command] Running: {}", command_line.bold());

    let status = Command::new(&spec.program)
        .args(&spec.args)
        .status()
        .map_err(|source| CommandError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    log_debug!("[Command] `{}` finished with {}", command_line, status);
    if status.success() {
        Ok(())
    } else {
        Err(CommandError::Failed {
            command: command_line,
            status: status.to_string(),
        })
    }
}
