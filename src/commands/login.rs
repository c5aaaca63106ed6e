//! `login`: apply every installed profile and record the profile-set hash.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::config::state::StateStore;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::login::{Collaborators, LoginEngine, LoginReport};

/// Run the login command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the run aborts, the
/// login state cannot be saved, or any profile had a failing step.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("custom-login {}", super::version()));

    log.stage("Loading configuration");
    let config = super::load_config(global)?;
    log.debug(&format!("profiles root: {}", config.login_script_folder.display()));
    log.debug(&format!(
        "installed profiles: {}",
        config.installed_profiles_folder.display()
    ));
    log.debug(&format!("state file: {}", config.state_file.display()));

    let sink = Arc::clone(log) as Arc<dyn Log>;
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let collaborators =
        Collaborators::system(&config.installed_profiles_folder, &executor, &sink);

    let report = execute(&config, collaborators, global.dry_run, &sink)?;

    log.print_summary();

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{failed} profile(s) had failing steps");
    }
    Ok(())
}

/// Load the login state, run the engine, and persist the state if the
/// profile-change trigger moved it.
///
/// # Errors
///
/// Returns an error if the engine aborts or the state cannot be saved.
pub fn execute(
    config: &Config,
    collaborators: Collaborators,
    dry_run: bool,
    log: &Arc<dyn Log>,
) -> Result<LoginReport> {
    let store = StateStore::new(&config.state_file);
    let mut state = store.load_or_default(&**log);
    let recorded = state.clone();

    log.stage("Applying login profiles");
    let engine = LoginEngine::new(
        collaborators,
        &config.login_script_folder,
        &config.home,
        dry_run,
        Arc::clone(log),
    );
    let report = engine.run(&mut state)?;

    if state != recorded {
        if dry_run {
            log.dry_run(&format!(
                "would record profile-set hash '{}' in {}",
                state.last_logged_in_os_hash,
                store.path().display()
            ));
        } else {
            store.save(&state)?;
            log.debug(&format!(
                "recorded profile-set hash '{}' in {}",
                state.last_logged_in_os_hash,
                store.path().display()
            ));
        }
    }

    Ok(report)
}
