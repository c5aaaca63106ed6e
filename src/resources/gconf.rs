//! Legacy gconf backend driven through `gconftool-2`.
//!
//! gconf is best-effort: on most current desktops the daemon is gone, so
//! every failed invocation is reported as [`BackendError::Unavailable`] and
//! the adapter skips the entry quietly.
use std::sync::Arc;

use super::error::BackendError;
use super::settings::{BackendKind, SettingKey, SettingsBackend};
use crate::exec::Executor;

const PROGRAM: &str = "gconftool-2";
const NAME: &str = "gconf";

/// Flat-key settings backend backed by `gconftool-2`.
#[derive(Debug)]
pub struct GconfBackend {
    executor: Arc<dyn Executor>,
}

impl GconfBackend {
    /// Create a backend that spawns `gconftool-2` through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    fn set_value(&self, args: &[&str]) -> Result<(), BackendError> {
        self.executor
            .run(PROGRAM, args)
            .map(|_| ())
            .map_err(|e| BackendError::Unavailable {
                backend: NAME.to_string(),
                reason: format!("{e:#}"),
            })
    }

    fn set_typed(&self, key: &SettingKey, kind: &str, value: &str) -> Result<(), BackendError> {
        self.set_value(&["--type", kind, "--set", &key.name, value])
    }
}

impl SettingsBackend for GconfBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Legacy
    }

    fn set_boolean(&self, key: &SettingKey, value: bool) -> Result<(), BackendError> {
        self.set_typed(key, "bool", if value { "true" } else { "false" })
    }

    fn set_int(&self, key: &SettingKey, value: i64) -> Result<(), BackendError> {
        self.set_typed(key, "int", &value.to_string())
    }

    fn set_double(&self, key: &SettingKey, value: f64) -> Result<(), BackendError> {
        self.set_typed(key, "float", &format!("{value:?}"))
    }

    fn set_string(&self, key: &SettingKey, value: &str) -> Result<(), BackendError> {
        self.set_typed(key, "string", value)
    }

    /// `gconftool-2` splits list text on commas, so an item containing one
    /// is rejected rather than written as two items.
    fn set_strv(&self, key: &SettingKey, value: &[String]) -> Result<(), BackendError> {
        if let Some(item) = value.iter().find(|item| item.contains(',')) {
            return Err(BackendError::Rejected {
                backend: NAME.to_string(),
                key: key.to_string(),
                reason: format!("list item {item:?} contains a comma"),
            });
        }
        let list = format!("[{}]", value.join(","));
        self.set_value(&[
            "--type",
            "list",
            "--list-type",
            "string",
            "--set",
            &key.name,
            &list,
        ])
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    fn backend(executor: &Arc<MockExecutor>) -> GconfBackend {
        GconfBackend::new(Arc::clone(executor) as Arc<dyn Executor>)
    }

    #[test]
    fn typed_setters_pass_gconf_types() {
        let executor = Arc::new(MockExecutor::with_responses(vec![
            (true, String::new()),
            (true, String::new()),
            (true, String::new()),
            (true, String::new()),
        ]));
        let b = backend(&executor);
        let key = SettingKey::legacy("/apps/demo/value");
        b.set_boolean(&key, false).unwrap();
        b.set_int(&key, 7).unwrap();
        b.set_double(&key, 0.5).unwrap();
        b.set_string(&key, "hello world").unwrap();
        assert_eq!(
            executor.calls(),
            vec![
                "gconftool-2 --type bool --set /apps/demo/value false",
                "gconftool-2 --type int --set /apps/demo/value 7",
                "gconftool-2 --type float --set /apps/demo/value 0.5",
                "gconftool-2 --type string --set /apps/demo/value hello world",
            ]
        );
    }

    #[test]
    fn string_list_uses_list_type() {
        let executor = Arc::new(MockExecutor::ok(""));
        backend(&executor)
            .set_strv(
                &SettingKey::legacy("/apps/panel/applets"),
                &["clock".to_string(), "tray".to_string()],
            )
            .unwrap();
        assert_eq!(
            executor.calls(),
            vec!["gconftool-2 --type list --list-type string --set /apps/panel/applets [clock,tray]"]
        );
    }

    #[test]
    fn list_item_with_comma_is_rejected_without_spawning() {
        let executor = Arc::new(MockExecutor::with_responses(vec![]));
        let err = backend(&executor)
            .set_strv(
                &SettingKey::legacy("/apps/panel/applets"),
                &["clock".to_string(), "tray,menu".to_string()],
            )
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected { ref key, .. } if key == "/apps/panel/applets"));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn any_failure_is_unavailable() {
        let executor = Arc::new(MockExecutor::fail());
        let err = backend(&executor)
            .set_boolean(&SettingKey::legacy("/apps/x"), true)
            .unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }

    #[test]
    fn no_schema_catalog() {
        let executor = Arc::new(MockExecutor::with_responses(vec![]));
        assert!(backend(&executor).list_schemas().unwrap().is_empty());
        assert_eq!(executor.call_count(), 0);
    }
}
