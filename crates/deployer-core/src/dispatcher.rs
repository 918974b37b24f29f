use crate::deployment::Deployment;
use crate::error::DeployError;
use crate::log::{LogLevel, LogSink};
use crate::shell::ShellCommand;
use crate::target::Target;

/// Outcome of one executed command. Output lines are not kept; they went to
/// the sink as they arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Normalized exit code, `-1` when the process was killed by a signal.
    pub exit_code: i32,
    pub lines: usize,
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs shell commands on a target and streams their output to a sink.
/// Tasks hold one of these instead of spawning processes themselves.
#[async_trait::async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Run `command` on `target` (local when `None` or localhost) and wait
    /// for it to exit. Only launch failures are errors here.
    async fn run(
        &self,
        command: &ShellCommand,
        target: Option<&Target>,
        sink: &dyn LogSink,
    ) -> Result<CommandResult, DeployError>;

    /// Run and reduce to success. With `force`, a failed command becomes
    /// `DeployError::Execution`.
    async fn execute(
        &self,
        command: &ShellCommand,
        target: Option<&Target>,
        sink: &dyn LogSink,
        force: bool,
    ) -> Result<bool, DeployError> {
        let result = self.run(command, target, sink).await?;
        if force && !result.succeeded() {
            return Err(DeployError::execution(command.to_string()));
        }
        Ok(result.succeeded())
    }

    /// Log what would run without running it.
    async fn simulate(
        &self,
        command: &ShellCommand,
        target: Option<&Target>,
        sink: &dyn LogSink,
    ) -> Result<bool, DeployError> {
        let message = match target {
            Some(t) if !t.is_local() => format!("Would execute on {}: \"{}\"", t, command),
            _ => format!("Would execute locally: \"{}\"", command),
        };
        sink.log(&message, LogLevel::Info);
        Ok(true)
    }

    /// Execute, or simulate when the deployment is a dry run. Output goes to
    /// the deployment's sink.
    async fn execute_or_simulate(
        &self,
        command: &ShellCommand,
        target: Option<&Target>,
        deployment: &dyn Deployment,
        force: bool,
    ) -> Result<bool, DeployError> {
        if deployment.is_dry_run() {
            self.simulate(command, target, deployment.sink()).await
        } else {
            self.execute(command, target, deployment.sink(), force).await
        }
    }
}
