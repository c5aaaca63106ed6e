//! Installed-profile registry and the profile-set hash.
//!
//! The set of installed profiles is whatever entries exist in the
//! installed-profiles directory; their names are the profile names.  The
//! set hash is the sorted names joined with `|`, so it changes exactly when
//! a profile is added or removed (names containing `|` can collide).
use std::path::PathBuf;

use crate::error::RegistryError;

/// Source of the installed profile names.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileRegistry: Send + Sync {
    /// Installed profile names, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry exists but cannot be read.
    fn installed_profiles(&self) -> Result<Vec<String>, RegistryError>;
}

/// Registry backed by the entries of a directory.
#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    dir: PathBuf,
}

impl DirectoryRegistry {
    /// Registry listing `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ProfileRegistry for DirectoryRegistry {
    fn installed_profiles(&self) -> Result<Vec<String>, RegistryError> {
        let io_err = |source| RegistryError::Io {
            path: self.dir.clone(),
            source,
        };
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

/// Order-independent fingerprint of a profile set.
#[must_use]
pub fn profile_set_hash(profiles: &[String]) -> String {
    let mut sorted = profiles.to_vec();
    sorted.sort();
    sorted.join("|")
}
