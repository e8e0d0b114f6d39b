//! Process execution
//!
//! [`SystemExecutor`] runs a program with `std::process`, streams its stdout
//! line by line (logging each line when configured) while stderr drains on
//! a helper thread, and returns the captured [`ExecutionResult`].

use std::{
    io::{self, BufRead, BufReader, Read},
    process::{Child, Command as StdCommand, ExitStatus, Stdio},
    thread,
};

use ocm_core::{ExecutionResult, Executor};

use crate::{Error, Result, RunConfig};

/// Whether `program` can be found on `PATH` (or exists, for paths).
#[must_use]
pub fn is_installed(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Blocking executor backed by the operating system.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    config: RunConfig,
}

impl SystemExecutor {
    #[must_use]
    pub const fn new(config: RunConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    fn io_error(program: &str, source: io::Error) -> Error {
        Error::Io {
            program: program.to_string(),
            source,
        }
    }

    /// Read stdout to the end, logging each line when configured.
    fn collect_stdout(&self, program: &str, pipe: impl Read) -> Result<String> {
        let mut reader = BufReader::new(pipe);
        let mut output = String::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| Self::io_error(program, e))?;
            if read == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&line);
            if self.config.log_output {
                tracing::info!("{}", text.trim_end());
            }
            output.push_str(&text);
        }

        Ok(output)
    }
}

impl Executor for SystemExecutor {
    type Error = Error;

    fn execute(&self, program: &str, args: &[String]) -> Result<ExecutionResult> {
        if self.config.check_installed && !is_installed(program) {
            return Err(Error::NotInstalled {
                program: program.to_string(),
            });
        }

        let mut command = StdCommand::new(program);
        command
            .args(args)
            .envs(&self.config.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        tracing::info!("Running command {} {}", program, args.join(" "));

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

        let stderr_pipe = child.stderr.take();
        let stderr_reader = thread::spawn(move || -> io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stderr_pipe {
                pipe.read_to_end(&mut buf)?;
            }
            Ok(buf)
        });

        let stdout = match child
            .stdout
            .take()
            .map(|pipe| self.collect_stdout(program, pipe))
            .transpose()
        {
            Ok(stdout) => stdout.unwrap_or_default(),
            Err(err) => {
                reap(&mut child);
                let _ = stderr_reader.join();
                return Err(err);
            }
        };

        let status = child.wait().map_err(|e| Self::io_error(program, e))?;
        let stderr = stderr_reader
            .join()
            .map_err(|_| Self::io_error(program, io::Error::other("stderr reader panicked")))?
            .map_err(|e| Self::io_error(program, e))?;

        let exit_status = exit_code(status);
        if exit_status != 0 {
            tracing::warn!(program, exit_status, "Command exited with non-zero status");
        }

        Ok(ExecutionResult::new(
            stdout,
            String::from_utf8_lossy(&stderr).into_owned(),
            exit_status,
        ))
    }
}

/// Kill and wait for a child whose output can no longer be read.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!("Failed to kill child {}: {e}", child.id());
    }
    if let Err(e) = child.wait() {
        tracing::warn!("Failed to reap child {}: {e}", child.id());
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or_else(|| signal_code(status))
}

#[cfg(unix)]
fn signal_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status.signal().map_or(-1, |signal| -signal)
}

#[cfg(not(unix))]
fn signal_code(_status: ExitStatus) -> i32 {
    -1
}
