use thiserror::Error;

/// Diagnostic code carried by every forced command failure.
pub const EXECUTION_FAILED_CODE: u32 = 1311007746;

#[derive(Error, Debug)]
pub enum DeployError {
    /// The command ran and exited non-zero while a successful exit was required.
    #[error("Command {command} return non-zero return code ({code})")]
    Execution { command: String, code: u32 },

    /// The process could not be launched at all.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Required path missing: {0}")]
    MissingPath(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DeployError {
    pub fn execution(command: impl Into<String>) -> Self {
        Self::Execution {
            command: command.into(),
            code: EXECUTION_FAILED_CODE,
        }
    }

    /// True for a command that ran and failed, as opposed to infrastructure trouble.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}
