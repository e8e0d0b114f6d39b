//! # OCM Core
//!
//! Object command mapping: describe an external program's command line as a
//! schema of named parameters, bind values to it, and get back a validated,
//! ordered argv.
//!
//! - [`Parameter`] declares a keyed option (`-n 10`, flag `-l`) or a
//!   positional argument, with its type, default, callback and multiplicity.
//! - [`ParamType`] converts raw input into canonical [`Value`]s and renders
//!   them as tokens.
//! - [`CommandSpec`] is the validated schema; [`Command`] is one bound
//!   instance of it.
//! - [`Executor`] is the boundary to whatever actually spawns the process.
//!
//! ```
//! use std::sync::Arc;
//!
//! use ocm_core::{CommandSpec, Input, Parameter};
//!
//! # fn main() -> ocm_core::Result<()> {
//! let ls = Arc::new(
//!     CommandSpec::builder("ls")
//!         .parameter(Parameter::option("-l", "is_long").flag())
//!         .parameter(Parameter::argument("directory").required())
//!         .build()?,
//! );
//!
//! let cmd = ls.bind(Input::new().set("is_long", true).set("directory", "/tmp"))?;
//! assert_eq!(cmd.argv(), vec!["ls", "-l", "/tmp"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` / `expect()` / `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//! - Binding never returns a partially validated command

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod context;
pub mod error;
pub mod param_type;
pub mod parameter;
pub mod result;
pub mod spec;
pub mod value;

pub use command::Command;
pub use context::{Context, Input};
pub use error::{Error, Result};
pub use param_type::{Boolean, Choice, Float, Integer, ParamType, Text};
pub use parameter::{Callback, DefaultValue, ParamKind, Parameter};
pub use result::{ExecutionResult, Executor, INTERMEDIATE_PREFIX};
pub use spec::{CommandSpec, CommandSpecBuilder};
pub use value::{Value, ValueKind};
