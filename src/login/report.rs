//! Per-run results of the login engine.
use std::fmt;

/// One step of a profile's login sequence, named after the artifact it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `login.pre` script.
    PreLogin,
    /// `dconf` settings file.
    Dconf,
    /// `gconf` settings file.
    Gconf,
    /// `dotfiles/` directory.
    Dotfiles,
    /// `login` script.
    Login,
    /// `profile-change` script.
    ProfileChange,
}

impl Step {
    /// File or directory name inside the profile directory.
    #[must_use]
    pub const fn artifact(self) -> &'static str {
        match self {
            Self::PreLogin => "login.pre",
            Self::Dconf => "dconf",
            Self::Gconf => "gconf",
            Self::Dotfiles => "dotfiles",
            Self::Login => "login",
            Self::ProfileChange => "profile-change",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact())
    }
}

/// Result of applying one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    /// Profile name.
    pub name: String,
    /// Steps that failed, in execution order.
    pub failed_steps: Vec<Step>,
    /// Whether this profile observed a stale hash and fired the trigger.
    pub profile_change_triggered: bool,
}

impl ProfileReport {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            failed_steps: Vec::new(),
            profile_change_triggered: false,
        }
    }

    /// `true` if every step succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failed_steps.is_empty()
    }

    /// Comma-separated failed steps, or `None` when all succeeded.
    #[must_use]
    pub fn failure_summary(&self) -> Option<String> {
        if self.is_ok() {
            return None;
        }
        let steps: Vec<&str> = self.failed_steps.iter().map(|s| s.artifact()).collect();
        Some(format!("failed: {}", steps.join(", ")))
    }
}

/// Result of a whole login run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginReport {
    /// One entry per installed profile, in the order they ran.
    pub profiles: Vec<ProfileReport>,
}

impl LoginReport {
    /// Profiles with at least one failed step.
    pub fn failed(&self) -> impl Iterator<Item = &ProfileReport> {
        self.profiles.iter().filter(|p| !p.is_ok())
    }

    /// `true` if no profile had a failing step.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Name of the profile that fired the profile-change trigger, if any.
    #[must_use]
    pub fn triggered_by(&self) -> Option<&str> {
        self.profiles
            .iter()
            .find(|p| p.profile_change_triggered)
            .map(|p| p.name.as_str())
    }
}
