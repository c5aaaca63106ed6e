//! Login profile engine.
//!
//! Applies per-OS login customisation for a user whose home directory is
//! shared between several installed operating systems.  Each installed
//! profile contributes desktop settings (GSettings/dconf and legacy gconf),
//! dotfiles merged into the home directory, and optional lifecycle scripts.
//! A `profile-change` script runs once whenever the set of installed
//! profiles differs from the one recorded at the previous login.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: tool configuration, settings files, persisted login state
//! - **[`resources`]**: settings backends, dotfile merge-copy, script runner
//! - **[`profiles`]**: installed-profile registry and set hash
//! - **[`login`]**: the per-profile login sequence
//! - **[`commands`]**: subcommand orchestration (`login`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod login;
pub mod profiles;
pub mod resources;
