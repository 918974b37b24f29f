use crate::shell::concatenate_paths;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    #[default]
    Generic,
    Laravel,
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationKind::Generic => write!(f, "generic"),
            ApplicationKind::Laravel => write!(f, "laravel"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub kind: ApplicationKind,
    /// Root on each node; releases live below `<deployment_path>/releases`.
    pub deployment_path: String,
}

impl Application {
    pub fn new(name: impl Into<String>, kind: ApplicationKind, deployment_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            deployment_path: deployment_path.into(),
        }
    }

    pub fn releases_path(&self) -> String {
        concatenate_paths(&[self.deployment_path.as_str(), "releases"])
    }
}
