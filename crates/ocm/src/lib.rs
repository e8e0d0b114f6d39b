//! # OCM
//!
//! Runs commands described with [`ocm_core`] on the local system.
//!
//! `ocm-core` owns declaration, binding and argv assembly and never spawns
//! anything. This crate adds:
//!
//! - [`SystemExecutor`]: a blocking [`Executor`] over `std::process` that
//!   checks `PATH`, logs stdout line by line and captures both streams
//! - [`RunConfig`]: TOML and `OCM_*` environment configuration for it
//! - [`Run`]: `cmd.run()` on a bound [`Command`]
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ocm::prelude::*;
//!
//! # fn main() -> ocm::Result<()> {
//! let head = Arc::new(
//!     CommandSpec::builder("head")
//!         .parameter(Parameter::option("-n", "lines").default_value(10))
//!         .parameter(Parameter::argument("file").required())
//!         .build()?,
//! );
//!
//! let result = head.bind(Input::new().set("file", "Cargo.toml"))?.run()?;
//! println!("{}", result.stdout);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod executor;
pub mod run;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use executor::{is_installed, SystemExecutor};
pub use ocm_core::{
    Boolean, Choice, Command, CommandSpec, CommandSpecBuilder, Context, ExecutionResult, Executor,
    Float, Input, Integer, ParamType, Parameter, Text, Value,
};
pub use run::Run;

/// Everything needed to declare, bind and run commands.
pub mod prelude {
    pub use crate::{
        Boolean, Choice, Command, CommandSpec, Context, ExecutionResult, Executor, Float, Input,
        Integer, ParamType, Parameter, Run, RunConfig, SystemExecutor, Text, Value,
    };
}
