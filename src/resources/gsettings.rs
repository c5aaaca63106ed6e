//! GSettings/dconf backend driven through the `gsettings` tool.
use std::sync::Arc;

use super::error::BackendError;
use super::settings::{BackendKind, SettingKey, SettingsBackend};
use crate::exec::Executor;

const PROGRAM: &str = "gsettings";
const NAME: &str = "GSettings";

/// Hierarchical settings backend backed by `gsettings`.
#[derive(Debug)]
pub struct GSettingsBackend {
    executor: Arc<dyn Executor>,
}

impl GSettingsBackend {
    /// Create a backend that spawns `gsettings` through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    fn set(&self, key: &SettingKey, value: &str) -> Result<(), BackendError> {
        let schema = key.schema.as_deref().unwrap_or_default();
        self.executor
            .run(PROGRAM, &["set", schema, &key.name, value])
            .map(|_| ())
            .map_err(|e| BackendError::Rejected {
                backend: NAME.to_string(),
                key: key.to_string(),
                reason: format!("{e:#}"),
            })
    }
}

impl SettingsBackend for GSettingsBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Hierarchical
    }

    fn list_schemas(&self) -> Result<Vec<String>, BackendError> {
        let result = self
            .executor
            .run(PROGRAM, &["list-schemas"])
            .map_err(|e| BackendError::Unavailable {
                backend: NAME.to_string(),
                reason: format!("{e:#}"),
            })?;
        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn set_boolean(&self, key: &SettingKey, value: bool) -> Result<(), BackendError> {
        self.set(key, if value { "true" } else { "false" })
    }

    fn set_int(&self, key: &SettingKey, value: i64) -> Result<(), BackendError> {
        self.set(key, &value.to_string())
    }

    fn set_double(&self, key: &SettingKey, value: f64) -> Result<(), BackendError> {
        self.set(key, &format_double(value))
    }

    fn set_string(&self, key: &SettingKey, value: &str) -> Result<(), BackendError> {
        self.set(key, &quote(value))
    }

    fn set_strv(&self, key: &SettingKey, value: &[String]) -> Result<(), BackendError> {
        let items: Vec<String> = value.iter().map(|s| quote(s)).collect();
        self.set(key, &format!("[{}]", items.join(", ")))
    }
}

/// GVariant text for a double; always carries a decimal point or exponent
/// so it is never parsed back as an integer.
fn format_double(value: f64) -> String {
    format!("{value:?}")
}

/// Single-quoted GVariant string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if matches!(c, '\\' | '\'') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
