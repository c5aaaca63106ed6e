//! Side-effecting primitives applied to one profile at a time.
//!
//! Each primitive reports per-step failures through the typed errors in
//! [`error`]; none of them aborts a login run on its own.
pub mod dotfiles;
pub mod error;
pub mod gconf;
pub mod gsettings;
pub mod script;
pub mod settings;
