//! Typed error variants for per-step resource operations.
//!
//! None of these stop a login run: the engine logs them, records the step
//! as failed, and moves on.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that reject a whole settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Io {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a JSON object.
    #[error("invalid settings file {path}: {message}")]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A value has a JSON type no backend setter accepts.
    #[error("unsupported value for '{key}' in {path}: {kind}")]
    UnsupportedValue {
        /// Settings file path.
        path: PathBuf,
        /// Offending key.
        key: String,
        /// Description of the rejected JSON value.
        kind: String,
    },

    /// The backend's schema catalog could not be listed.
    #[error("cannot list {backend} schemas: {source}")]
    Catalog {
        /// Backend name.
        backend: String,
        /// Underlying backend error.
        source: BackendError,
    },
}

/// Errors from a single backend call.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The settings daemon or its command-line tool is not reachable.
    #[error("{backend} unavailable: {reason}")]
    Unavailable {
        /// Backend name.
        backend: String,
        /// Why the call could not be made.
        reason: String,
    },

    /// The backend refused the write.
    #[error("{backend} rejected '{key}': {reason}")]
    Rejected {
        /// Backend name.
        backend: String,
        /// Key being written.
        key: String,
        /// Backend message.
        reason: String,
    },
}

/// Errors for one path during a dotfile merge-copy.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The source is neither a directory nor a regular file.
    #[error("don't know how to copy {src} to {dest}")]
    Unclassified {
        /// Source path.
        src: PathBuf,
        /// Destination path.
        dest: PathBuf,
    },

    /// Copying failed.
    #[error("copying {src} to {dest}: {message}")]
    Io {
        /// Source path.
        src: PathBuf,
        /// Destination path.
        dest: PathBuf,
        /// Error chain rendered as text.
        message: String,
    },
}

/// Errors from running a profile script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script could not be spawned or exited non-zero.
    #[error("script {path} failed: {message}")]
    Failed {
        /// Script path.
        path: PathBuf,
        /// Error chain rendered as text.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_value_display() {
        let e = SettingsError::UnsupportedValue {
            path: PathBuf::from("/p/base/dconf"),
            key: "org.example.thing".to_string(),
            kind: "null".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "unsupported value for 'org.example.thing' in /p/base/dconf: null"
        );
    }

    #[test]
    fn unavailable_display() {
        let e = BackendError::Unavailable {
            backend: "gconf".to_string(),
            reason: "no D-Bus session".to_string(),
        };
        assert_eq!(e.to_string(), "gconf unavailable: no D-Bus session");
    }

    #[test]
    fn catalog_error_has_source() {
        use std::error::Error as StdError;
        let e = SettingsError::Catalog {
            backend: "gsettings".to_string(),
            source: BackendError::Unavailable {
                backend: "gsettings".to_string(),
                reason: "not installed".to_string(),
            },
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn unclassified_display_names_both_paths() {
        let e = SyncError::Unclassified {
            src: PathBuf::from("/p/dotfiles/fifo"),
            dest: PathBuf::from("/home/u/.fifo"),
        };
        assert_eq!(
            e.to_string(),
            "don't know how to copy /p/dotfiles/fifo to /home/u/.fifo"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resource_errors_are_send_sync() {
        assert_send_sync::<SettingsError>();
        assert_send_sync::<BackendError>();
        assert_send_sync::<SyncError>();
        assert_send_sync::<ScriptError>();
    }
}
