use crate::context::CliContext;
use crate::task::{Task, TaskInvocation};
use deployer_core::application::{Application, ApplicationKind};
use deployer_core::dispatcher::CommandDispatcher;
use deployer_core::error::DeployError;
use deployer_core::log::LogLevel;
use std::sync::Arc;

/// Fail before anything is dispatched when the application is not Laravel.
pub fn ensure_laravel(task: &str, application: &Application) -> Result<(), DeployError> {
    if application.kind != ApplicationKind::Laravel {
        return Err(DeployError::TypeMismatch(format!(
            "Laravel application needed for {}, got \"{}\"",
            task, application.kind
        )));
    }
    Ok(())
}

/// `php artisan migrate --force`, rolled back with `migrate:rollback`.
pub struct MigrateTask {
    context: CliContext,
}

impl MigrateTask {
    pub const NAME: &'static str = "laravel:migrate";

    pub fn new(dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        Self {
            context: CliContext::new(dispatcher),
        }
    }

    async fn artisan(&mut self, invocation: &TaskInvocation<'_>, command: &str) -> Result<(), DeployError> {
        ensure_laravel(Self::NAME, invocation.application)?;

        let context = self.context.resolve(invocation)?;
        if !self.context.file_exists("artisan", invocation).await? {
            return Err(DeployError::MissingPath(format!(
                "artisan in {} on {}",
                context.working_directory, context.target_node
            )));
        }

        self.context
            .run_in_context(&["artisan", command, "--force"], invocation, true)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Task for MigrateTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&mut self, invocation: &TaskInvocation<'_>) -> Result<(), DeployError> {
        self.artisan(invocation, "migrate").await
    }

    async fn rollback(&mut self, invocation: &TaskInvocation<'_>) -> Result<(), DeployError> {
        invocation
            .deployment
            .sink()
            .log("Rolling back database migrations", LogLevel::Notice);
        self.artisan(invocation, "migrate:rollback").await
    }
}

/// `php artisan queue:restart`, so workers pick up the new release.
pub struct QueueRestartTask {
    context: CliContext,
}

impl QueueRestartTask {
    pub const NAME: &'static str = "laravel:queue-restart";

    pub fn new(dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        Self {
            context: CliContext::new(dispatcher),
        }
    }
}

#[async_trait::async_trait]
impl Task for QueueRestartTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&mut self, invocation: &TaskInvocation<'_>) -> Result<(), DeployError> {
        ensure_laravel(Self::NAME, invocation.application)?;
        self.context
            .run_in_context(&["artisan", "queue:restart"], invocation, true)
            .await?;
        Ok(())
    }
}
