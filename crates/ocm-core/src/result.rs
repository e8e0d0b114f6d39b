//! Execution boundary
//!
//! The core never spawns processes itself. It hands `(program, args)` to an
//! [`Executor`] and gets back an [`ExecutionResult`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Prefix of stdout lines carrying intermediate results: `OCMIR:<key>:<value>`.
pub const INTERMEDIATE_PREFIX: &str = "OCMIR";

/// Runs a program with arguments and captures what happened.
pub trait Executor {
    /// Error raised when the program cannot be run at all.
    type Error;

    /// Run `program` with `args` (not including the program itself) and
    /// wait for it to finish.
    fn execute(&self, program: &str, args: &[String]) -> std::result::Result<ExecutionResult, Self::Error>;
}

impl<F> Executor for F
where
    F: Fn(&str, &[String]) -> Result<ExecutionResult>,
{
    type Error = Error;

    fn execute(&self, program: &str, args: &[String]) -> Result<ExecutionResult> {
        self(program, args)
    }
}

/// Snapshot of one finished process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit status; negative for processes ended by a signal
    pub exit_status: i32,
}

impl ExecutionResult {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_status: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status,
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_status == 0
    }

    /// All intermediate results reported on stdout, in output order.
    ///
    /// Values are parsed as JSON when possible and kept as JSON strings
    /// otherwise.
    #[must_use]
    pub fn intermediates(&self) -> Vec<(String, serde_json::Value)> {
        self.stdout
            .lines()
            .filter_map(parse_intermediate)
            .map(|(key, raw)| (key.to_string(), decode(raw)))
            .collect()
    }

    /// Intermediate result for `key`; the last report wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IntermediateResultNotFound`] if no line reports `key`.
    pub fn intermediate(&self, key: &str) -> Result<serde_json::Value> {
        self.stdout
            .lines()
            .filter_map(parse_intermediate)
            .filter(|(k, _)| *k == key)
            .last()
            .map(|(_, raw)| decode(raw))
            .ok_or_else(|| Error::IntermediateResultNotFound(key.to_string()))
    }
}

fn parse_intermediate(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(INTERMEDIATE_PREFIX), Some(key), Some(value)) => Some((key, value)),
        _ => None,
    }
}

fn decode(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
