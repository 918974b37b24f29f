use crate::stream::{stream_process, LineTrim};
use deployer_core::config::Config;
use deployer_core::dispatcher::{CommandDispatcher, CommandResult};
use deployer_core::error::DeployError;
use deployer_core::log::{LogLevel, LogSink};
use deployer_core::shell::{escape, quote_arg, ShellCommand};
use deployer_core::target::Target;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit status `ssh` uses for its own connection and protocol errors. Remote
/// commands can exit with it too, so it is only a hint in the log.
pub const SSH_CONNECTION_ERROR: i32 = 255;

/// Exit statuses POSIX shells use for "not executable" and "not found".
const SHELL_LAUNCH_FAILURES: [i32; 2] = [126, 127];

/// Dispatches commands to the local shell or, for remote targets, through
/// the `ssh` client with agent forwarding and stderr merged into the log.
#[derive(Debug, Clone)]
pub struct ShellCommandService {
    shell: String,
    ssh_binary: String,
}

impl Default for ShellCommandService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellCommandService {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
            ssh_binary: "ssh".to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new().with_ssh_binary(config.defaults.ssh_binary.clone())
    }

    pub fn with_ssh_binary(mut self, ssh_binary: impl Into<String>) -> Self {
        self.ssh_binary = ssh_binary.into();
        self
    }

    /// Shell used to interpret command lines (`<shell> -c ...`).
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Arguments handed to the `ssh` binary:
    /// `-A [-p port] [-i key] user@host <command>`.
    pub fn remote_args(&self, command: &ShellCommand, target: &Target) -> Vec<String> {
        let mut args = vec!["-A".to_string()];
        if let Some(port) = target.option("port") {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        if let Some(key) = target.option("privateKeyFile") {
            args.push("-i".to_string());
            args.push(key.to_string());
        }
        args.push(target.ssh_destination());
        args.push(command.to_string());
        args
    }

    /// The remote invocation as a shell line, for the logs:
    /// `ssh -A [-p port] [-i key] user@host '<command>' 2>&1`.
    pub fn remote_command_line(&self, command: &ShellCommand, target: &Target) -> String {
        let mut parts = vec![quote_arg(&self.ssh_binary), "-A".to_string()];

        if let Some(port) = target.option("port") {
            parts.push("-p".to_string());
            parts.push(quote_arg(port));
        }
        if let Some(key) = target.option("privateKeyFile") {
            parts.push("-i".to_string());
            parts.push(escape(key));
        }

        parts.push(quote_arg(&target.ssh_destination()));
        parts.push(escape(&command.to_string()));
        parts.push("2>&1".to_string());
        parts.join(" ")
    }

    async fn run_local(
        &self,
        command: &ShellCommand,
        sink: &dyn LogSink,
    ) -> Result<CommandResult, DeployError> {
        sink.debug(&format!("Executing locally: \"{}\"", command));

        let mut process = Command::new(&self.shell);
        process.arg("-c").arg(command.to_string());
        let result = stream_process(process, sink, LineTrim::Terminator, LogLevel::Warning).await?;

        if SHELL_LAUNCH_FAILURES.contains(&result.exit_code) {
            sink.log(
                &format!(
                    "Command could not be started by {} (exit code {})",
                    self.shell, result.exit_code
                ),
                LogLevel::Warning,
            );
        }
        Ok(result)
    }

    async fn run_remote(
        &self,
        command: &ShellCommand,
        target: &Target,
        sink: &dyn LogSink,
    ) -> Result<CommandResult, DeployError> {
        sink.debug(&format!("Executing on {}: \"{}\"", target, command));
        debug!("Remote exec via: {}", self.remote_command_line(command, target));

        let mut process = Command::new(&self.ssh_binary);
        process.args(self.remote_args(command, target));
        // stderr is merged into the output, as `2>&1` would
        let result =
            stream_process(process, sink, LineTrim::TrailingWhitespace, LogLevel::Info).await?;

        if result.exit_code == SSH_CONNECTION_ERROR {
            warn!("ssh to {} exited with {}", target.ssh_destination(), result.exit_code);
            sink.log(
                &format!(
                    "Exit code {} on {}: ssh may have failed to reach {}",
                    result.exit_code,
                    target,
                    target.ssh_destination()
                ),
                LogLevel::Warning,
            );
        }
        Ok(result)
    }
}

#[async_trait::async_trait]
impl CommandDispatcher for ShellCommandService {
    async fn run(
        &self,
        command: &ShellCommand,
        target: Option<&Target>,
        sink: &dyn LogSink,
    ) -> Result<CommandResult, DeployError> {
        match target {
            Some(t) if !t.is_local() => self.run_remote(command, t, sink).await,
            _ => self.run_local(command, sink).await,
        }
    }
}
