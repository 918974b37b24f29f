use crate::options::TaskOptions;
use deployer_core::application::Application;
use deployer_core::deployment::Deployment;
use deployer_core::error::DeployError;
use deployer_core::target::Target;

/// Everything one task run is parameterized by.
#[derive(Clone, Copy)]
pub struct TaskInvocation<'a> {
    pub node: &'a Target,
    pub application: &'a Application,
    pub deployment: &'a dyn Deployment,
    pub options: &'a TaskOptions,
}

/// A deployment step. One instance per node; instances keep per-run state
/// such as their resolved working context.
#[async_trait::async_trait]
pub trait Task: Send {
    fn name(&self) -> &str;

    async fn execute(&mut self, invocation: &TaskInvocation<'_>) -> Result<(), DeployError>;

    /// Commands go through `execute_or_simulate`, so a dry-run deployment
    /// makes `execute` log instead of run.
    async fn simulate(&mut self, invocation: &TaskInvocation<'_>) -> Result<(), DeployError> {
        self.execute(invocation).await
    }

    async fn rollback(&mut self, _invocation: &TaskInvocation<'_>) -> Result<(), DeployError> {
        Ok(())
    }
}
