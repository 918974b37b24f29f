use serde_json::Value;
use std::collections::HashMap;

/// Run the task in the deployment's local workspace instead of the release
/// directory on the node.
pub const USE_APPLICATION_WORKSPACE: &str = "useApplicationWorkspace";

/// PHP interpreter used by CLI tasks.
pub const PHP_BINARY: &str = "phpBinaryPathAndFilename";

pub const DEFAULT_PHP_BINARY: &str = "php";

/// Loosely typed per-task options, as declared in a deployment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskOptions(HashMap<String, Value>);

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True only for a literal boolean `true`; `"true"` or `1` do not count.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn php_binary(&self) -> &str {
        self.string(PHP_BINARY).unwrap_or(DEFAULT_PHP_BINARY)
    }
}

impl From<HashMap<String, Value>> for TaskOptions {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}
