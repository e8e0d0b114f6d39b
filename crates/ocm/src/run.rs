//! Running bound commands on the local system

use ocm_core::{Command, ExecutionResult};

use crate::{executor, Result, RunConfig, SystemExecutor};

/// Extension trait that runs a [`Command`] with [`SystemExecutor`].
///
/// `run` and `run_checked` read their configuration from the `OCM_*`
/// environment variables; use [`Run::run_with_config`] for explicit control.
pub trait Run {
    /// Run once; a non-zero exit status is reported in the result.
    fn run(&self) -> Result<ExecutionResult>;

    /// Run once with an explicit configuration.
    fn run_with_config(&self, config: &RunConfig) -> Result<ExecutionResult>;

    /// Run once; a non-zero exit status becomes `CommandFailed`.
    fn run_checked(&self) -> Result<ExecutionResult>;

    /// Whether the program can be found on `PATH`.
    fn is_installed(&self) -> bool;
}

impl Run for Command {
    fn run(&self) -> Result<ExecutionResult> {
        self.run_with_config(&RunConfig::from_env()?)
    }

    fn run_with_config(&self, config: &RunConfig) -> Result<ExecutionResult> {
        self.run_with(&SystemExecutor::new(config.clone()))
    }

    fn run_checked(&self) -> Result<ExecutionResult> {
        self.run_checked_with(&SystemExecutor::new(RunConfig::from_env()?))
    }

    fn is_installed(&self) -> bool {
        executor::is_installed(self.program())
    }
}
