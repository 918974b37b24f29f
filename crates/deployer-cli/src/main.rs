use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod dispatch;

#[derive(Parser)]
#[command(name = "deployer")]
#[command(about = "Run deployment commands and tasks on local and remote nodes", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/deployer/deployer.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show debug log lines, including every dispatched command
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a shell command on a node
    Exec {
        /// Node name from the config, or "localhost"
        node: String,

        /// Command line, passed to the shell as is
        command: String,

        /// Treat a non-zero exit as an error
        #[arg(short, long)]
        force: bool,

        /// Log the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a deployment task
    Task(commands::task::TaskArgs),

    /// List configured nodes
    Nodes {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show or initialize the config file
    Config {
        /// Print the config path only
        #[arg(long)]
        path: bool,

        /// Write a sample config
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Exec {
            node,
            command,
            force,
            dry_run,
        } => {
            let config = dispatch::load_config(cli.config.as_deref())?;
            if !commands::exec::run(&config, &node, &command, force, dry_run).await? {
                std::process::exit(1);
            }
        }
        Commands::Task(args) => {
            let config = dispatch::load_config(cli.config.as_deref())?;
            commands::task::run(&config, args).await?;
        }
        Commands::Nodes { json } => {
            let config = dispatch::load_config(cli.config.as_deref())?;
            commands::nodes::run(&config, json)?;
        }
        Commands::Config { path, init } => {
            commands::config::run(cli.config.as_deref(), path, init)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
