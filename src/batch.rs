//! Batched invocation of the external division migrator.
//!
//! sass-migrator is run once per group of at most N files, one group after the
//! other, each invocation blocking until the process exits. Output is not captured.

use crate::error::MigrateError;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Subcommand passed to the migrator before the file list.
pub const DIVISION_SUBCOMMAND: &str = "division";

/// Capability to run a process to completion.
pub trait CommandRunner {
    /// Run `argv` (program first), wait for it, and return its exit code.
    ///
    /// `None` means the process did not exit normally (e.g. killed by a signal).
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be started.
    fn invoke(&mut self, argv: &[OsString]) -> io::Result<Option<i32>>;
}

/// Runs commands as child processes inheriting this process's stdio.
///
/// On Windows the command goes through `cmd /C`, since launchers such as `npx` are
/// installed as `.cmd` scripts that `CreateProcess` does not resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn invoke(&mut self, argv: &[OsString]) -> io::Result<Option<i32>> {
        let argv = platform_argv(argv);
        let Some((program, args)) = argv.split_first() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty command"));
        };
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code())
    }
}

/// The argument vector actually spawned for `argv` on this platform.
#[must_use]
pub fn platform_argv(argv: &[OsString]) -> Vec<OsString> {
    if cfg!(windows) && !argv.is_empty() {
        let mut wrapped = vec![OsString::from("cmd"), OsString::from("/C")];
        wrapped.extend_from_slice(argv);
        wrapped
    } else {
        argv.to_vec()
    }
}

/// Run `command division <files...>` once per batch of at most `max_entries` files.
///
/// Returns the size of each batch in invocation order.
///
/// # Errors
///
/// Returns `ExternalProcessFailure` on the first unsuccessful exit (later batches are
/// not run) and `Io` if a process cannot be started.
pub fn run_batches<R: CommandRunner>(
    runner: &mut R,
    command: &[String],
    files: &[PathBuf],
    max_entries: usize,
) -> Result<Vec<usize>, MigrateError> {
    tracing::info!("running sass-migrator started");
    let program = command.first().cloned().unwrap_or_default();
    let mut sizes = Vec::new();

    for batch in files.chunks(max_entries.max(1)) {
        tracing::info!(files = batch.len(), "running sass-migrator division batch");
        for file in batch {
            tracing::info!("  {}", file.display());
        }

        let mut argv: Vec<OsString> = command.iter().map(OsString::from).collect();
        argv.push(DIVISION_SUBCOMMAND.into());
        argv.extend(batch.iter().map(|p| p.as_os_str().to_owned()));

        let code = runner
            .invoke(&argv)
            .map_err(|e| MigrateError::io(&program, e))?;
        if code != Some(0) {
            return Err(MigrateError::ExternalProcessFailure { exit_code: code });
        }
        sizes.push(batch.len());
    }

    tracing::info!("running sass-migrator finished");
    Ok(sizes)
}

#[cfg(test)]
#[path = "tests/batch.rs"]
mod tests;
