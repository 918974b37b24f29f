use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const LOCALHOST: &str = "localhost";

/// A machine a command runs on. Anything whose hostname is `localhost`
/// is executed in-process-local and its remote-only fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub hostname: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Custom SSH parameters (`port`, `privateKeyFile`).
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl Target {
    pub fn new(name: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            username: None,
            options: HashMap::new(),
        }
    }

    pub fn localhost() -> Self {
        Self::new(LOCALHOST, LOCALHOST)
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn is_local(&self) -> bool {
        self.hostname == LOCALHOST
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// `user@host`, or the bare hostname when no username is set.
    pub fn ssh_destination(&self) -> String {
        match &self.username {
            Some(user) if !user.is_empty() => format!("{}@{}", user, self.hostname),
            _ => self.hostname.clone(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
