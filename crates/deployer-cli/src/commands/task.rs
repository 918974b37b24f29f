use crate::dispatch;
use deployer_core::config::Config;
use deployer_core::error::DeployError;
use deployer_tasks::options::{TaskOptions, PHP_BINARY, USE_APPLICATION_WORKSPACE};
use deployer_tasks::registry::{create_task, TASK_NAMES};
use deployer_tasks::task::{Task, TaskInvocation};
use tracing::info;

#[derive(clap::Args)]
pub struct TaskArgs {
    /// Task name (laravel:migrate, laravel:queue-restart)
    pub name: String,

    /// Application name from the config
    #[arg(short, long)]
    pub application: String,

    /// Node name from the config
    #[arg(short, long, default_value = "localhost")]
    pub node: String,

    /// Release identifier (defaults to the current timestamp)
    #[arg(short, long)]
    pub release: Option<String>,

    /// Work in the local application workspace instead of the release directory
    #[arg(long)]
    pub use_workspace: bool,

    /// PHP binary for CLI tasks
    #[arg(long)]
    pub php: Option<String>,

    /// Roll the task back instead of executing it
    #[arg(long)]
    pub rollback: bool,

    /// Log commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(config: &Config, args: TaskArgs) -> anyhow::Result<()> {
    let application = config
        .find_application(&args.application)
        .ok_or_else(|| DeployError::ApplicationNotFound(args.application.clone()))?;
    let node = dispatch::resolve_node(config, &args.node)?;
    let deployment = dispatch::create_deployment(config, args.release, args.dry_run);

    let mut options = TaskOptions::new().with(
        PHP_BINARY,
        args.php.unwrap_or_else(|| config.defaults.php_binary.clone()),
    );
    if args.use_workspace {
        options.insert(USE_APPLICATION_WORKSPACE, true);
    }

    let mut task = create_task(&args.name, dispatch::create_dispatcher(config)).map_err(|e| {
        anyhow::anyhow!("{} (available: {})", e, TASK_NAMES.join(", "))
    })?;

    let invocation = TaskInvocation {
        node: &node,
        application,
        deployment: &deployment,
        options: &options,
    };

    info!(
        "Running {} for {} on {} (release {})",
        task.name(),
        application.name,
        node,
        deployment.release_identifier()
    );

    if args.rollback {
        task.rollback(&invocation).await?;
    } else if args.dry_run {
        task.simulate(&invocation).await?;
    } else {
        task.execute(&invocation).await?;
    }

    println!("Task {} finished on {}.", task.name(), node);
    Ok(())
}
