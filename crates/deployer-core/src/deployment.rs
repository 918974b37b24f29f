use crate::application::Application;
use crate::config::Config;
use crate::log::LogSink;
use crate::shell::concatenate_paths;
use crate::target::{Target, LOCALHOST};
use std::sync::Arc;

/// What tasks need to know about the deployment they run in.
pub trait Deployment: Send + Sync {
    fn name(&self) -> &str;

    /// Shared, usually local, staging directory for an application.
    fn workspace_path(&self, application: &Application) -> String;

    /// Directory of the release being deployed, on the target node.
    fn application_release_path(&self, application: &Application) -> String;

    fn node(&self, name: &str) -> Option<Target>;

    fn sink(&self) -> &dyn LogSink;

    /// Dry runs log what would be executed instead of executing it.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Release identifier in the `%Y%m%d%H%M%S` form.
pub fn new_release_identifier() -> String {
    chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
}

/// A deployment whose paths and nodes are fixed up front, usually from the
/// config file.
pub struct StaticDeployment {
    name: String,
    release_identifier: String,
    workspaces_base: String,
    nodes: Vec<Target>,
    sink: Arc<dyn LogSink>,
    dry_run: bool,
}

impl StaticDeployment {
    pub fn new(name: impl Into<String>, workspaces_base: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            name: name.into(),
            release_identifier: new_release_identifier(),
            workspaces_base: workspaces_base.into(),
            nodes: Vec::new(),
            sink,
            dry_run: false,
        }
    }

    pub fn from_config(config: &Config, sink: Arc<dyn LogSink>) -> Self {
        let mut deployment = Self::new(
            config.deployment.name.clone(),
            config.deployment.workspaces_base.clone(),
            sink,
        );
        deployment.nodes = config.nodes.clone();
        deployment
    }

    pub fn with_release(mut self, release_identifier: impl Into<String>) -> Self {
        self.release_identifier = release_identifier.into();
        self
    }

    pub fn with_node(mut self, node: Target) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn release_identifier(&self) -> &str {
        &self.release_identifier
    }
}

impl Deployment for StaticDeployment {
    fn name(&self) -> &str {
        &self.name
    }

    fn workspace_path(&self, application: &Application) -> String {
        concatenate_paths(&[
            self.workspaces_base.as_str(),
            self.name.as_str(),
            application.name.as_str(),
        ])
    }

    fn application_release_path(&self, application: &Application) -> String {
        concatenate_paths(&[application.releases_path().as_str(), self.release_identifier.as_str()])
    }

    fn node(&self, name: &str) -> Option<Target> {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .cloned()
            .or_else(|| (name == LOCALHOST).then(Target::localhost))
    }

    fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
