//! `status`: report what the next login would do, without changing anything.
use anyhow::{Context as _, Result};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::config::state::StateStore;
use crate::logging::Log;
use crate::profiles::{DirectoryRegistry, ProfileRegistry, profile_set_hash};

/// Snapshot of what the next `login` would see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Profiles root.
    pub profiles_root: PathBuf,
    /// Installed profile names, sorted.
    pub installed: Vec<String>,
    /// Hash of the installed set.
    pub current_hash: String,
    /// Hash recorded by the last profile-change trigger.
    pub recorded_hash: String,
}

impl StatusView {
    /// Whether the next login will run a `profile-change` script.
    #[must_use]
    pub fn trigger_pending(&self) -> bool {
        !self.installed.is_empty() && self.current_hash != self.recorded_hash
    }
}

/// Collect the status from the registry and the state store.
///
/// # Errors
///
/// Returns an error if the installed profiles cannot be listed.
pub fn gather(
    config: &Config,
    registry: &dyn ProfileRegistry,
    store: &StateStore,
    log: &dyn Log,
) -> Result<StatusView> {
    let installed = registry.installed_profiles()?;
    let current_hash = profile_set_hash(&installed);
    let recorded_hash = store.load_or_default(log).last_logged_in_os_hash;
    Ok(StatusView {
        profiles_root: config.login_script_folder.clone(),
        installed,
        current_hash,
        recorded_hash,
    })
}

const fn or_none(value: &str) -> &str {
    if value.is_empty() { "(none)" } else { value }
}

/// Render a [`StatusView`] as aligned `label: value` lines.
#[must_use]
pub fn render(view: &StatusView) -> String {
    let mut out = String::new();
    let installed = view.installed.join(", ");
    let trigger = if view.trigger_pending() {
        "pending"
    } else {
        "up to date"
    };
    let rows = [
        ("profiles root", view.profiles_root.display().to_string()),
        ("installed profiles", or_none(&installed).to_string()),
        ("current hash", or_none(&view.current_hash).to_string()),
        ("recorded hash", or_none(&view.recorded_hash).to_string()),
        ("profile-change", trigger.to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<20}{value}", format!("{label}:"));
    }
    out
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the installed
/// profiles cannot be listed.
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let config = super::load_config(global)?;
    let registry = DirectoryRegistry::new(&config.installed_profiles_folder);
    let store = StateStore::new(&config.state_file);
    let view = gather(&config, &registry, &store, log)?;
    std::io::stdout()
        .write_all(render(&view).as_bytes())
        .context("writing status")
}
