pub mod application;
pub mod config;
pub mod deployment;
pub mod dispatcher;
pub mod error;
pub mod log;
pub mod shell;
pub mod target;

pub use application::{Application, ApplicationKind};
pub use config::Config;
pub use deployment::{Deployment, StaticDeployment};
pub use dispatcher::{CommandDispatcher, CommandResult};
pub use error::DeployError;
pub use log::{LogLevel, LogSink, MemorySink, TracingSink};
pub use shell::ShellCommand;
pub use target::Target;
