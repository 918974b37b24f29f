use crate::application::Application;
use crate::error::DeployError;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level configuration.
/// Loaded from ~/.config/deployer/deployer.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub deployment: DeploymentSettings,
    #[serde(default)]
    pub nodes: Vec<Target>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSettings {
    #[serde(default = "default_deployment_name")]
    pub name: String,
    #[serde(default = "default_workspaces_base")]
    pub workspaces_base: String,
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            name: default_deployment_name(),
            workspaces_base: default_workspaces_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_ssh_binary")]
    pub ssh_binary: String,
    #[serde(default = "default_php_binary")]
    pub php_binary: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            ssh_binary: default_ssh_binary(),
            php_binary: default_php_binary(),
        }
    }
}

fn default_deployment_name() -> String {
    "default".to_string()
}

fn default_workspaces_base() -> String {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("deployer")
        .join("workspaces")
        .to_string_lossy()
        .into_owned()
}

fn default_ssh_binary() -> String {
    "ssh".to_string()
}

fn default_php_binary() -> String {
    "php".to_string()
}

impl Config {
    /// Load config from the default path, or an empty config if there is none.
    pub fn load_default() -> Result<Self, DeployError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::empty())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, DeployError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DeployError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("deployer")
            .join("deployer.yaml")
    }

    pub fn empty() -> Self {
        Self {
            deployment: DeploymentSettings::default(),
            nodes: Vec::new(),
            applications: Vec::new(),
            defaults: Defaults::default(),
        }
    }

    pub fn find_node(&self, name: &str) -> Option<&Target> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn find_application(&self, name: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.name == name)
    }

    fn validate(&self) -> Result<(), DeployError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if node.hostname.trim().is_empty() {
                return Err(DeployError::Config(format!("node '{}' has no hostname", node.name)));
            }
            if !seen.insert(node.name.as_str()) {
                return Err(DeployError::Config(format!("duplicate node '{}'", node.name)));
            }
        }
        let mut seen = HashSet::new();
        for app in &self.applications {
            if !seen.insert(app.name.as_str()) {
                return Err(DeployError::Config(format!("duplicate application '{}'", app.name)));
            }
        }
        Ok(())
    }
}
