use deployer_core::config::Config;
use deployer_core::deployment::StaticDeployment;
use deployer_core::dispatcher::CommandDispatcher;
use deployer_core::error::DeployError;
use deployer_core::log::TracingSink;
use deployer_core::target::{Target, LOCALHOST};
use deployer_shell::ShellCommandService;
use std::path::Path;
use std::sync::Arc;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, DeployError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load_default(),
    }
}

/// Create the dispatcher every command and task goes through.
pub fn create_dispatcher(config: &Config) -> Arc<dyn CommandDispatcher> {
    Arc::new(ShellCommandService::from_config(config))
}

/// Find a node by name. `localhost` works without being configured.
pub fn resolve_node(config: &Config, name: &str) -> Result<Target, DeployError> {
    match config.find_node(name) {
        Some(node) => Ok(node.clone()),
        None if name == LOCALHOST => Ok(Target::localhost()),
        None => Err(DeployError::NodeNotFound(name.to_string())),
    }
}

pub fn create_deployment(config: &Config, release: Option<String>, dry_run: bool) -> StaticDeployment {
    let deployment = StaticDeployment::from_config(config, Arc::new(TracingSink)).with_dry_run(dry_run);
    match release {
        Some(release) => deployment.with_release(release),
        None => deployment,
    }
}
