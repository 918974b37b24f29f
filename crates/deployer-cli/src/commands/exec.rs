use crate::dispatch;
use deployer_core::config::Config;
use deployer_core::dispatcher::CommandDispatcher;
use deployer_core::shell::ShellCommand;

/// Returns whether the command succeeded.
pub async fn run(
    config: &Config,
    node_name: &str,
    command: &str,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<bool> {
    let node = dispatch::resolve_node(config, node_name)?;
    let dispatcher = dispatch::create_dispatcher(config);
    let deployment = dispatch::create_deployment(config, None, dry_run);

    let ok = dispatcher
        .execute_or_simulate(&ShellCommand::new(command), Some(&node), &deployment, force)
        .await?;

    if !ok {
        eprintln!("Command failed on {}: {}", node, command);
    }

    Ok(ok)
}
