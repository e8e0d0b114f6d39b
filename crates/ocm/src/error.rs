//! Error types for ocm
//!
//! Binding and declaration errors come from `ocm-core` unchanged; this
//! layer adds what can go wrong when actually running a program.

use std::io;

use thiserror::Error;

/// Error type for running commands
#[derive(Debug, Error)]
pub enum Error {
    /// Declaration, binding or result error from the core
    #[error(transparent)]
    Core(#[from] ocm_core::Error),

    /// The executable could not be found on `PATH`
    #[error("{program} not installed")]
    NotInstalled {
        /// Executable name
        program: String,
    },

    /// The OS refused to start the process
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Executable name
        program: String,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Reading output from, or waiting on, a started process failed
    #[error("IO error while running {program}: {source}")]
    Io {
        /// Executable name
        program: String,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Invalid run configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the executable was missing, either before or at spawn time.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotInstalled { .. } => true,
            Self::Spawn { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// The core error, if this is one.
    #[must_use]
    pub const fn as_core(&self) -> Option<&ocm_core::Error> {
        match self {
            Self::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse config: {err}"))
    }
}

/// Result type alias for ocm operations
pub type Result<T> = std::result::Result<T, Error>;
