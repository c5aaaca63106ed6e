//! Per-profile settings files (`dconf`, `gconf`).
//!
//! A settings file is a JSON object mapping a key to a value.  The JSON type
//! of each value picks the typed setter that will write it: booleans,
//! integers, floating-point numbers (anything written with a fraction or an
//! exponent), strings, and arrays of strings.  Anything else is rejected.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::resources::error::SettingsError;

/// A typed settings value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of strings.
    StringList(Vec<String>),
}

impl SettingValue {
    /// Convert a JSON value, or describe why it has no typed setter.
    ///
    /// # Errors
    ///
    /// Returns a short description of the JSON value when it is null, an
    /// object, an array with a non-string element, or an integer outside the
    /// `i64` range.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if n.is_f64() {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| format!("number {n}"))
                } else {
                    Err(format!("integer {n} out of range"))
                }
            }
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(format!("list containing {}", json_kind(other))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::StringList),
            other => Err(json_kind(other).to_string()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::StringList(items) => write!(f, "{items:?}"),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Settings read from one file, keyed and ordered lexicographically.
pub type SettingsMap = BTreeMap<String, SettingValue>;

/// Load a settings file.
///
/// Returns `Ok(None)` when the file does not exist, is blank, or holds an
/// empty object.  Every value is converted before anything is returned, so a
/// single unsupported value rejects the whole file.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if the file exists but cannot be read,
/// [`SettingsError::Parse`] if it is not a JSON object, and
/// [`SettingsError::UnsupportedValue`] for the first (in key order) value
/// without a typed setter.
pub fn load(path: &Path) -> Result<Option<SettingsMap>, SettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let Value::Object(object) = value else {
        return Err(SettingsError::Parse {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", json_kind(&value)),
        });
    };

    let raw: BTreeMap<String, Value> = object.into_iter().collect();
    let mut settings = SettingsMap::new();
    for (key, value) in raw {
        let typed = SettingValue::from_json(&value).map_err(|kind| {
            SettingsError::UnsupportedValue {
                path: path.to_path_buf(),
                key: key.clone(),
                kind,
            }
        })?;
        settings.insert(key, typed);
    }

    Ok((!settings.is_empty()).then_some(settings))
}
