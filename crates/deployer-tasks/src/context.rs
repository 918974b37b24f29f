use crate::options::USE_APPLICATION_WORKSPACE;
use crate::task::TaskInvocation;
use deployer_core::dispatcher::CommandDispatcher;
use deployer_core::error::DeployError;
use deployer_core::shell::{concatenate_paths, ShellCommand};
use deployer_core::target::{Target, LOCALHOST};
use std::sync::Arc;
use tracing::debug;

/// Directory and node a task operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingContext {
    pub working_directory: String,
    pub target_node: Target,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContextState {
    #[default]
    Unresolved,
    Resolved(WorkingContext),
}

/// Shell access for CLI-style tasks. Resolves the working context once,
/// then runs everything against it.
pub struct CliContext {
    dispatcher: Arc<dyn CommandDispatcher>,
    state: ContextState,
}

impl CliContext {
    pub fn new(dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        Self {
            dispatcher,
            state: ContextState::Unresolved,
        }
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// Resolve on first call; later calls return the first result whatever
    /// the invocation says.
    pub fn resolve(&mut self, invocation: &TaskInvocation<'_>) -> Result<WorkingContext, DeployError> {
        if let ContextState::Resolved(context) = &self.state {
            return Ok(context.clone());
        }

        let context = determine(invocation)?;
        debug!(
            "Working context for {}: {} on {}",
            invocation.application.name, context.working_directory, context.target_node
        );
        self.state = ContextState::Resolved(context.clone());
        Ok(context)
    }

    /// `cd <working dir> && <php> <args...>` on the resolved node.
    pub async fn run_in_context<S: AsRef<str> + Sync>(
        &mut self,
        arguments: &[S],
        invocation: &TaskInvocation<'_>,
        force: bool,
    ) -> Result<bool, DeployError> {
        let context = self.resolve(invocation)?;
        let command = ShellCommand::cd(&context.working_directory).then(ShellCommand::program(
            invocation.options.php_binary(),
            arguments,
        ));
        self.dispatcher
            .execute_or_simulate(&command, Some(&context.target_node), invocation.deployment, force)
            .await
    }

    pub async fn directory_exists(
        &mut self,
        directory: &str,
        invocation: &TaskInvocation<'_>,
    ) -> Result<bool, DeployError> {
        self.probe("-d", directory, invocation).await
    }

    pub async fn file_exists(
        &mut self,
        path_and_filename: &str,
        invocation: &TaskInvocation<'_>,
    ) -> Result<bool, DeployError> {
        self.probe("-f", path_and_filename, invocation).await
    }

    /// `test <flag>` below the working directory. A missing path is `false`.
    async fn probe(
        &mut self,
        flag: &str,
        relative: &str,
        invocation: &TaskInvocation<'_>,
    ) -> Result<bool, DeployError> {
        let context = self.resolve(invocation)?;
        let path = concatenate_paths(&[context.working_directory.as_str(), relative]);
        self.dispatcher
            .execute_or_simulate(
                &ShellCommand::test(flag, &path),
                Some(&context.target_node),
                invocation.deployment,
                false,
            )
            .await
    }
}

fn determine(invocation: &TaskInvocation<'_>) -> Result<WorkingContext, DeployError> {
    let deployment = invocation.deployment;
    if invocation.options.flag(USE_APPLICATION_WORKSPACE) {
        let localhost = deployment
            .node(LOCALHOST)
            .ok_or_else(|| DeployError::NodeNotFound(LOCALHOST.to_string()))?;
        Ok(WorkingContext {
            working_directory: deployment.workspace_path(invocation.application),
            target_node: localhost,
        })
    } else {
        Ok(WorkingContext {
            working_directory: deployment.application_release_path(invocation.application),
            target_node: invocation.node.clone(),
        })
    }
}
