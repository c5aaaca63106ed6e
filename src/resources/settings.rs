//! Key-value settings store adapter.
//!
//! [`apply_settings`] reads one profile settings file and writes each entry
//! through a [`SettingsBackend`].  Two backend flavours exist:
//!
//! - **hierarchical** (GSettings/dconf): keys are `schema.key`; the schema
//!   must be installed or the entry is skipped with a warning;
//! - **legacy** (gconf): keys are written verbatim and an unreachable daemon
//!   is tolerated silently, entry by entry.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use super::error::{BackendError, SettingsError};
use crate::config::settings_file::{self, SettingValue};
use crate::logging::Log;

/// How a backend addresses keys and which failures it tolerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Schema-validated `schema.key` addressing (GSettings/dconf).
    Hierarchical,
    /// Flat key paths with best-effort writes (gconf).
    Legacy,
}

/// Address of one setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingKey {
    /// Schema id for hierarchical backends; `None` for legacy keys.
    pub schema: Option<String>,
    /// Leaf key name (the full key path for legacy backends).
    pub name: String,
}

impl SettingKey {
    /// Split a flattened `schema.key` path at its last dot.
    ///
    /// A path without a dot yields an empty schema, which is never
    /// installed, so the entry ends up reported as a schema miss.
    #[must_use]
    pub fn hierarchical(path: &str) -> Self {
        let (schema, name) = path.rsplit_once('.').unwrap_or(("", path));
        Self {
            schema: Some(schema.to_string()),
            name: name.to_string(),
        }
    }

    /// A flat key used as-is.
    #[must_use]
    pub fn legacy(path: &str) -> Self {
        Self {
            schema: None,
            name: path.to_string(),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A settings store with typed setters.
pub trait SettingsBackend: Send + Sync {
    /// Short human-readable backend name (e.g. `"GSettings"`).
    fn name(&self) -> &str;

    /// Addressing and failure policy of this backend.
    fn kind(&self) -> BackendKind;

    /// Installed schema ids. Only consulted for hierarchical backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be listed.
    fn list_schemas(&self) -> Result<Vec<String>, BackendError> {
        Ok(Vec::new())
    }

    /// Write a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the write.
    fn set_boolean(&self, key: &SettingKey, value: bool) -> Result<(), BackendError>;

    /// Write a signed integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the write.
    fn set_int(&self, key: &SettingKey, value: i64) -> Result<(), BackendError>;

    /// Write a double.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the write.
    fn set_double(&self, key: &SettingKey, value: f64) -> Result<(), BackendError>;

    /// Write a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the write.
    fn set_string(&self, key: &SettingKey, value: &str) -> Result<(), BackendError>;

    /// Write a list of strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the write.
    fn set_strv(&self, key: &SettingKey, value: &[String]) -> Result<(), BackendError>;
}

/// Dispatch `value` to the backend setter for its type.
///
/// # Errors
///
/// Propagates the backend's error.
pub fn write_value(
    backend: &dyn SettingsBackend,
    key: &SettingKey,
    value: &SettingValue,
) -> Result<(), BackendError> {
    match value {
        SettingValue::Bool(b) => backend.set_boolean(key, *b),
        SettingValue::Int(i) => backend.set_int(key, *i),
        SettingValue::Float(x) => backend.set_double(key, *x),
        SettingValue::String(s) => backend.set_string(key, s),
        SettingValue::StringList(items) => backend.set_strv(key, items),
    }
}

/// Per-file counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyStats {
    /// Entries written (or that would be written in dry-run mode).
    pub written: usize,
    /// Entries skipped because their schema is not installed.
    pub schema_missing: usize,
    /// Entries dropped because the legacy daemon was unreachable.
    pub unavailable: usize,
    /// Entries the backend failed to write.
    pub failed: usize,
}

/// Result of applying one settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The file is absent or holds no entries; nothing was written.
    NoSettingsFound,
    /// The file was processed.
    Applied(ApplyStats),
}

/// Apply the settings file at `path` through `backend`.
///
/// Entries are written in lexicographic key order.  Schema misses and an
/// unreachable legacy daemon skip single entries; a backend write failure is
/// logged, counted in [`ApplyStats::failed`], and the batch continues.
///
/// # Errors
///
/// Returns an error, before any write, if the file cannot be read or parsed,
/// if any value has an unsupported type, or if the schema catalog of a
/// hierarchical backend cannot be listed.
pub fn apply_settings(
    backend: &dyn SettingsBackend,
    path: &Path,
    dry_run: bool,
    log: &dyn Log,
) -> Result<ApplyOutcome, SettingsError> {
    let Some(settings) = settings_file::load(path)? else {
        log.info(&format!("No settings found at {}", path.display()));
        return Ok(ApplyOutcome::NoSettingsFound);
    };

    log.info(&format!("Applying settings from {}", path.display()));

    let catalog = match backend.kind() {
        BackendKind::Hierarchical => {
            let mut schemas = backend
                .list_schemas()
                .map_err(|source| SettingsError::Catalog {
                    backend: backend.name().to_string(),
                    source,
                })?;
            schemas.sort();
            Some(schemas)
        }
        BackendKind::Legacy => None,
    };

    let mut stats = ApplyStats::default();
    for (path_key, value) in &settings {
        let key = match backend.kind() {
            BackendKind::Hierarchical => SettingKey::hierarchical(path_key),
            BackendKind::Legacy => SettingKey::legacy(path_key),
        };

        if let (Some(catalog), Some(schema)) = (&catalog, &key.schema)
            && catalog.binary_search(schema).is_err()
        {
            log.warn(&format!(
                "{} schema not found: {schema} (trying to set: {})",
                backend.name(),
                key.name
            ));
            stats.schema_missing += 1;
            continue;
        }

        if dry_run {
            log.dry_run(&format!("would set {key} = {value}"));
            stats.written += 1;
            continue;
        }

        match write_value(backend, &key, value) {
            Ok(()) => {
                log.debug(&format!("set {key} = {value}"));
                stats.written += 1;
            }
            Err(BackendError::Unavailable { .. }) if backend.kind() == BackendKind::Legacy => {
                stats.unavailable += 1;
            }
            Err(e) => {
                log.error(&format!("{key}: {e}"));
                stats.failed += 1;
            }
        }
    }

    if stats.unavailable > 0 {
        log.debug(&format!(
            "{} {} entries not written: backend unavailable",
            stats.unavailable,
            backend.name()
        ));
    }

    Ok(ApplyOutcome::Applied(stats))
}

/// In-memory [`SettingsBackend`].
///
/// Stores values by their displayed key.  Used where no desktop session is
/// available, chiefly in tests.
#[derive(Debug)]
pub struct MemoryBackend {
    name: String,
    kind: BackendKind,
    schemas: Vec<String>,
    reachable: bool,
    values: Mutex<BTreeMap<String, SettingValue>>,
    writes: Mutex<usize>,
}

impl MemoryBackend {
    /// A hierarchical backend with the given installed schemas.
    #[must_use]
    pub fn hierarchical<I, S>(schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "GSettings".to_string(),
            kind: BackendKind::Hierarchical,
            schemas: schemas.into_iter().map(Into::into).collect(),
            reachable: true,
            values: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(0),
        }
    }

    /// A legacy flat backend.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            name: "gconf".to_string(),
            kind: BackendKind::Legacy,
            schemas: Vec::new(),
            reachable: true,
            values: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(0),
        }
    }

    /// Make every write fail with [`BackendError::Unavailable`].
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Snapshot of all stored values.
    #[must_use]
    pub fn values(&self) -> BTreeMap<String, SettingValue> {
        self.values
            .lock()
            .map_or_else(|_| BTreeMap::new(), |g| g.clone())
    }

    /// Stored value for a displayed key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.lock().ok().and_then(|g| g.get(key).cloned())
    }

    /// Number of successful setter calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().map_or(0, |g| *g)
    }

    fn store(&self, key: &SettingKey, value: SettingValue) -> Result<(), BackendError> {
        if !self.reachable {
            return Err(BackendError::Unavailable {
                backend: self.name.clone(),
                reason: "no daemon".to_string(),
            });
        }
        if let Ok(mut guard) = self.values.lock() {
            guard.insert(key.to_string(), value);
        }
        if let Ok(mut guard) = self.writes.lock() {
            *guard += 1;
        }
        Ok(())
    }
}

impl SettingsBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn list_schemas(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.schemas.clone())
    }

    fn set_boolean(&self, key: &SettingKey, value: bool) -> Result<(), BackendError> {
        self.store(key, SettingValue::Bool(value))
    }

    fn set_int(&self, key: &SettingKey, value: i64) -> Result<(), BackendError> {
        self.store(key, SettingValue::Int(value))
    }

    fn set_double(&self, key: &SettingKey, value: f64) -> Result<(), BackendError> {
        self.store(key, SettingValue::Float(value))
    }

    fn set_string(&self, key: &SettingKey, value: &str) -> Result<(), BackendError> {
        self.store(key, SettingValue::String(value.to_string()))
    }

    fn set_strv(&self, key: &SettingKey, value: &[String]) -> Result<(), BackendError> {
        self.store(key, SettingValue::StringList(value.to_vec()))
    }
}
