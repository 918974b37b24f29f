pub mod shell_command_service;
pub mod stream;

pub use shell_command_service::ShellCommandService;
