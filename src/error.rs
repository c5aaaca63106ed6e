//! Domain-specific error types for the login engine.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//! Per-step failures (settings files, dotfiles, scripts) live in
//! [`crate::resources::error`]; the types here are the ones that stop a run.
//!
//! # Error hierarchy
//!
//! ```text
//! LoginError                    aborts the whole login run
//! ├── ProfileRoot               profiles root missing or not a directory
//! ├── Registry(RegistryError)   installed-profiles directory unreadable
//! └── State(StateError)         login state could not be loaded or saved
//! ConfigError                   tool configuration loading
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors for a login run.
#[derive(Error, Debug)]
pub enum LoginError {
    /// The profiles root could not be located.
    #[error("cannot use profiles root {path}: {reason}")]
    ProfileRoot {
        /// Configured profiles root.
        path: PathBuf,
        /// Why it is unusable.
        reason: String,
    },

    /// The installed profiles could not be enumerated.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The persisted login state could not be read or written.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors from enumerating installed profiles.
///
/// A missing directory is not an error (it means zero profiles); only a real
/// I/O fault ends up here.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Reading the installed-profiles directory failed.
    #[error("cannot read installed profiles in {path}: {source}")]
    Io {
        /// Installed-profiles directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from loading or saving the persisted login state.
#[derive(Error, Debug)]
pub enum StateError {
    /// The state file exists but could not be read or written.
    #[error("login state I/O error at {path}: {source}")]
    Io {
        /// State file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state file is not valid JSON for the expected layout.
    #[error("invalid login state in {path}: {source}")]
    Parse {
        /// State file path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors that arise from loading the tool configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting was provided neither in the file nor on the command line.
    #[error("missing required setting '{0}' (set it in the config file or pass it on the command line)")]
    MissingSetting(String),

    /// The config file contains invalid TOML.
    #[error("invalid TOML in {path}: {message}")]
    InvalidSyntax {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configured path could not be made absolute.
    #[error("cannot resolve {path}: {source}")]
    Unresolvable {
        /// Path as configured.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("cannot determine home directory: HOME is not set")]
    NoHome,
}
