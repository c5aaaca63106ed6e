//! Persisted login state (`lastLoggedInOsHash`).
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::logging::Log;

/// State carried between login runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginState {
    /// Profile-set hash recorded by the last profile-change trigger.
    #[serde(rename = "lastLoggedInOsHash", default)]
    pub last_logged_in_os_hash: String,
}

/// JSON file holding a [`LoginState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state; a missing file is the default (empty hash).
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the file exists but cannot be read and
    /// [`StateError::Parse`] if it is not valid state JSON.
    pub fn load(&self) -> Result<LoginState, StateError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoginState::default());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the state, falling back to the default with a warning when the
    /// file is unreadable or corrupt.
    pub fn load_or_default(&self, log: &dyn Log) -> LoginState {
        self.load().unwrap_or_else(|e| {
            log.warn(&format!("{e}; treating last-run hash as empty"));
            LoginState::default()
        })
    }

    /// Write the state, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the directory or file cannot be written.
    pub fn save(&self, state: &LoginState) -> Result<(), StateError> {
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, format!("{json}\n")).map_err(io_err)
    }
}
