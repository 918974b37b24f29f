use crate::laravel::{MigrateTask, QueueRestartTask};
use crate::task::Task;
use deployer_core::dispatcher::CommandDispatcher;
use deployer_core::error::DeployError;
use std::sync::Arc;

pub const TASK_NAMES: &[&str] = &[MigrateTask::NAME, QueueRestartTask::NAME];

/// Create a fresh task instance by name.
pub fn create_task(
    name: &str,
    dispatcher: Arc<dyn CommandDispatcher>,
) -> Result<Box<dyn Task>, DeployError> {
    match name {
        MigrateTask::NAME => Ok(Box::new(MigrateTask::new(dispatcher))),
        QueueRestartTask::NAME => Ok(Box::new(QueueRestartTask::new(dispatcher))),
        other => Err(DeployError::TaskNotFound(other.to_string())),
    }
}
