//! Profile application engine.
//!
//! For every installed profile, in sorted order, the engine runs the
//! profile's login sequence against its directory under the profiles root:
//!
//! 1. `login.pre` script
//! 2. `dconf` settings (hierarchical backend)
//! 3. `gconf` settings (legacy backend)
//! 4. `dotfiles/` merge-copy into the home directory
//! 5. `login` script
//! 6. `profile-change` script, when the installed-set hash differs from the
//!    one recorded in [`LoginState`]
//!
//! Step failures are logged and recorded in the [`LoginReport`]; only a
//! missing profiles root or an unreadable registry stops the run.
mod report;

pub use report::{LoginReport, ProfileReport, Step};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::state::LoginState;
use crate::error::LoginError;
use crate::exec::Executor;
use crate::logging::{Log, LogScope, Status};
use crate::profiles::{DirectoryRegistry, ProfileRegistry, profile_set_hash};
use crate::resources::dotfiles::{DotfileSync, MergeCopySync};
use crate::resources::gconf::GconfBackend;
use crate::resources::gsettings::GSettingsBackend;
use crate::resources::script::{ScriptRunner, SystemScriptRunner};
use crate::resources::settings::{ApplyOutcome, SettingsBackend, apply_settings};

/// Capabilities the engine drives.
#[derive(Clone)]
pub struct Collaborators {
    /// Source of installed profile names.
    pub registry: Arc<dyn ProfileRegistry>,
    /// Hierarchical settings backend for `dconf` files.
    pub dconf: Arc<dyn SettingsBackend>,
    /// Legacy settings backend for `gconf` files.
    pub gconf: Arc<dyn SettingsBackend>,
    /// Dotfile synchronizer.
    pub dotfiles: Arc<dyn DotfileSync>,
    /// Script runner.
    pub scripts: Arc<dyn ScriptRunner>,
}

impl Collaborators {
    /// Production wiring: directory registry, `gsettings`, `gconftool-2`,
    /// merge-copy dotfiles and scripts spawned through `executor`.
    #[must_use]
    pub fn system(installed_dir: &Path, executor: &Arc<dyn Executor>, log: &Arc<dyn Log>) -> Self {
        Self {
            registry: Arc::new(DirectoryRegistry::new(installed_dir)),
            dconf: Arc::new(GSettingsBackend::new(Arc::clone(executor))),
            gconf: Arc::new(GconfBackend::new(Arc::clone(executor))),
            dotfiles: Arc::new(MergeCopySync),
            scripts: Arc::new(SystemScriptRunner::new(
                Arc::clone(executor),
                Arc::clone(log),
            )),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("dconf", &self.dconf.name())
            .field("gconf", &self.gconf.name())
            .finish_non_exhaustive()
    }
}

/// Applies every installed profile for one login.
pub struct LoginEngine {
    collaborators: Collaborators,
    profiles_root: PathBuf,
    home: PathBuf,
    dry_run: bool,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for LoginEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginEngine")
            .field("collaborators", &self.collaborators)
            .field("profiles_root", &self.profiles_root)
            .field("home", &self.home)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl LoginEngine {
    /// Create an engine over `profiles_root` acting on `home`.
    #[must_use]
    pub fn new(
        collaborators: Collaborators,
        profiles_root: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        dry_run: bool,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            collaborators,
            profiles_root: profiles_root.into(),
            home: home.into(),
            dry_run,
            log,
        }
    }

    /// Run the login sequence for every installed profile.
    ///
    /// `state` is updated in memory when the profile-change trigger fires;
    /// persisting it is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::ProfileRoot`] if the profiles root is missing
    /// or not a directory, and [`LoginError::Registry`] if the installed
    /// profiles cannot be listed.
    pub fn run(&self, state: &mut LoginState) -> Result<LoginReport, LoginError> {
        if !self.profiles_root.is_dir() {
            let reason = if self.profiles_root.exists() {
                "not a directory"
            } else {
                "no such directory"
            };
            return Err(LoginError::ProfileRoot {
                path: self.profiles_root.clone(),
                reason: reason.to_string(),
            });
        }

        let mut profiles = self.collaborators.registry.installed_profiles()?;
        profiles.sort();
        if profiles.is_empty() {
            self.log.info("No installed profiles found");
        }

        let mut report = LoginReport::default();
        for profile in &profiles {
            let result = self.run_profile(profile, state)?;
            let status = match (result.is_ok(), self.dry_run) {
                (false, _) => Status::Failed,
                (true, true) => Status::DryRun,
                (true, false) => Status::Ok,
            };
            self.log
                .record(profile, status, result.failure_summary().as_deref());
            report.profiles.push(result);
        }
        Ok(report)
    }

    fn run_profile(
        &self,
        profile: &str,
        state: &mut LoginState,
    ) -> Result<ProfileReport, LoginError> {
        let dir = self.profiles_root.join(profile);
        let _scope = LogScope::enter(
            &*self.log,
            &format!("Running login scripts in {}...", dir.display()),
        );
        let mut result = ProfileReport::new(profile);

        self.run_script(&dir, Step::PreLogin, &mut result);
        self.apply(&*self.collaborators.dconf, &dir, Step::Dconf, &mut result);
        self.apply(&*self.collaborators.gconf, &dir, Step::Gconf, &mut result);

        let sync = self.collaborators.dotfiles.sync(
            &dir.join(Step::Dotfiles.artifact()),
            &self.home,
            self.dry_run,
            &*self.log,
        );
        if !sync.is_clean() {
            result.failed_steps.push(Step::Dotfiles);
        }

        self.run_script(&dir, Step::Login, &mut result);

        let current = profile_set_hash(&self.collaborators.registry.installed_profiles()?);
        self.log
            .debug(&format!("hashed current OS profile to hash key: {current}"));
        if current != state.last_logged_in_os_hash {
            self.log.debug(&format!(
                "hash didn't match the last-run hash ({}).",
                state.last_logged_in_os_hash
            ));
            self.run_script(&dir, Step::ProfileChange, &mut result);
            result.profile_change_triggered = true;
            state.last_logged_in_os_hash = current;
        }

        Ok(result)
    }

    fn run_script(&self, dir: &Path, step: Step, result: &mut ProfileReport) {
        let script = dir.join(step.artifact());
        if let Err(e) =
            self.collaborators
                .scripts
                .run_if_present(&script, &self.home, self.dry_run)
        {
            self.log.error(&e.to_string());
            result.failed_steps.push(step);
        }
    }

    fn apply(
        &self,
        backend: &dyn SettingsBackend,
        dir: &Path,
        step: Step,
        result: &mut ProfileReport,
    ) {
        match apply_settings(backend, &dir.join(step.artifact()), self.dry_run, &*self.log) {
            Ok(ApplyOutcome::Applied(stats)) if stats.failed > 0 => {
                result.failed_steps.push(step);
            }
            Ok(_) => {}
            Err(e) => {
                self.log.error(&e.to_string());
                result.failed_steps.push(step);
            }
        }
    }
}
