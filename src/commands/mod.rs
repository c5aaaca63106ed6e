//! Subcommand orchestration.
pub mod login;
pub mod status;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Config, Environment};

/// Version string embedded by the build script, or the crate version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("LOGIN_PROFILES_VERSION") {
        Some(version) => version,
        None => concat!("dev-", env!("CARGO_PKG_VERSION")),
    }
}

/// Resolve the configuration for a command from its global options and the
/// process environment.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved.
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    Config::load(&global.overrides(), &Environment::from_env()).context("loading configuration")
}
