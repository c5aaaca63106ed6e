//! Optional per-profile scripts (`login.pre`, `login`, `profile-change`).
use std::path::Path;
use std::sync::Arc;

use super::error::ScriptError;
use crate::exec::Executor;
use crate::logging::{Log, LogScope};

/// What happened when a script was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// No file at the script path.
    NotPresent,
    /// The script ran and exited zero.
    Completed,
    /// Dry run: the script exists but was not executed.
    DryRun,
}

/// Runs a profile script when it exists.
#[cfg_attr(test, mockall::automock)]
pub trait ScriptRunner: Send + Sync {
    /// Run `script` synchronously with `working_dir` as its working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Failed`] if the script cannot be spawned or
    /// exits non-zero.
    fn run_if_present(
        &self,
        script: &Path,
        working_dir: &Path,
        dry_run: bool,
    ) -> Result<ScriptOutcome, ScriptError>;
}

/// [`ScriptRunner`] that executes scripts through an [`Executor`].
pub struct SystemScriptRunner {
    executor: Arc<dyn Executor>,
    log: Arc<dyn Log>,
}

impl SystemScriptRunner {
    /// Create a runner spawning through `executor` and reporting to `log`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>, log: Arc<dyn Log>) -> Self {
        Self { executor, log }
    }
}

impl std::fmt::Debug for SystemScriptRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemScriptRunner")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl ScriptRunner for SystemScriptRunner {
    fn run_if_present(
        &self,
        script: &Path,
        working_dir: &Path,
        dry_run: bool,
    ) -> Result<ScriptOutcome, ScriptError> {
        if !script.exists() {
            return Ok(ScriptOutcome::NotPresent);
        }

        let _scope = LogScope::enter(&*self.log, &format!("Running script: {}", script.display()));
        if dry_run {
            self.log.dry_run(&format!("would run {}", script.display()));
            return Ok(ScriptOutcome::DryRun);
        }

        let failed = |message: String| ScriptError::Failed {
            path: script.to_path_buf(),
            message,
        };
        // A relative script path would otherwise resolve against `working_dir`.
        let program = std::path::absolute(script).map_err(|e| failed(e.to_string()))?;
        let result = self
            .executor
            .run_in(working_dir, &program.to_string_lossy(), &[])
            .map_err(|e| failed(format!("{e:#}")))?;
        for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
            self.log.debug(line);
        }
        Ok(ScriptOutcome::Completed)
    }
}
