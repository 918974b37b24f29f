#[cfg(test)]
mod tests {
    use deployer_core::application::{Application, ApplicationKind};
    use deployer_core::deployment::Deployment;
    use deployer_core::dispatcher::{CommandDispatcher, CommandResult};
    use deployer_core::error::DeployError;
    use deployer_core::log::{LogSink, MemorySink};
    use deployer_core::shell::ShellCommand;
    use deployer_core::target::Target;
    use deployer_shell::ShellCommandService;
    use deployer_tasks::context::{CliContext, ContextState};
    use deployer_tasks::laravel::{MigrateTask, QueueRestartTask};
    use deployer_tasks::options::{TaskOptions, PHP_BINARY, USE_APPLICATION_WORKSPACE};
    use deployer_tasks::registry::{create_task, TASK_NAMES};
    use deployer_tasks::task::{Task, TaskInvocation};
    use std::sync::{Arc, Mutex};

    /// Records every command and the node it was sent to. Commands containing
    /// `fail_on` exit 1, everything else exits 0.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, String)>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn failing_on(pattern: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(pattern),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CommandDispatcher for Recorder {
        async fn run(
            &self,
            command: &ShellCommand,
            target: Option<&Target>,
            _sink: &dyn LogSink,
        ) -> Result<CommandResult, DeployError> {
            let command = command.to_string();
            let exit_code = match self.fail_on {
                Some(pattern) if command.contains(pattern) => 1,
                _ => 0,
            };
            let node = target.map(|t| t.name.clone()).unwrap_or_else(|| "-".into());
            self.calls.lock().unwrap().push((command, node));
            Ok(CommandResult { exit_code, lines: 0 })
        }
    }

    struct FixedPaths {
        release: String,
        workspace: String,
        sink: MemorySink,
        dry_run: bool,
    }

    impl FixedPaths {
        fn new(release: &str) -> Self {
            Self {
                release: release.to_string(),
                workspace: "/var/ws/shop".to_string(),
                sink: MemorySink::new(),
                dry_run: false,
            }
        }
    }

    impl Deployment for FixedPaths {
        fn name(&self) -> &str {
            "test"
        }

        fn workspace_path(&self, _application: &Application) -> String {
            self.workspace.clone()
        }

        fn application_release_path(&self, _application: &Application) -> String {
            self.release.clone()
        }

        fn node(&self, name: &str) -> Option<Target> {
            (name == "localhost").then(Target::localhost)
        }

        fn sink(&self) -> &dyn LogSink {
            &self.sink
        }

        fn is_dry_run(&self) -> bool {
            self.dry_run
        }
    }

    fn web1() -> Target {
        Target::new("web1", "web1.example.com").with_username("deploy")
    }

    fn laravel() -> Application {
        Application::new("shop", ApplicationKind::Laravel, "/srv/shop")
    }

    fn invocation<'a>(
        node: &'a Target,
        application: &'a Application,
        deployment: &'a FixedPaths,
        options: &'a TaskOptions,
    ) -> TaskInvocation<'a> {
        TaskInvocation {
            node,
            application,
            deployment,
            options,
        }
    }

    #[test]
    fn test_resolve_release_path_keeps_node() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new();
        let mut context = CliContext::new(Arc::new(Recorder::default()));
        assert_eq!(context.state(), &ContextState::Unresolved);

        let resolved = context
            .resolve(&invocation(&node, &app, &deployment, &options))
            .unwrap();
        assert_eq!(resolved.working_directory, "/srv/release/42");
        assert_eq!(resolved.target_node, node);
        assert_eq!(context.state(), &ContextState::Resolved(resolved));
    }

    #[test]
    fn test_resolve_workspace_uses_localhost() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new().with(USE_APPLICATION_WORKSPACE, true);
        let mut context = CliContext::new(Arc::new(Recorder::default()));

        let resolved = context
            .resolve(&invocation(&node, &app, &deployment, &options))
            .unwrap();
        assert_eq!(resolved.working_directory, "/var/ws/shop");
        assert!(resolved.target_node.is_local());
        assert_ne!(resolved.target_node, node);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let mut context = CliContext::new(Arc::new(Recorder::default()));

        let first = context
            .resolve(&invocation(&node, &app, &deployment, &TaskOptions::new()))
            .unwrap();

        let workspace = TaskOptions::new().with(USE_APPLICATION_WORKSPACE, true);
        let other_deployment = FixedPaths::new("/srv/release/43");
        let second = context
            .resolve(&invocation(&Target::localhost(), &app, &other_deployment, &workspace))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.working_directory, "/srv/release/42");
        assert_eq!(second.target_node, node);
    }

    #[test]
    fn test_workspace_without_localhost_node() {
        struct NoNodes(FixedPaths);
        impl Deployment for NoNodes {
            fn name(&self) -> &str {
                "bare"
            }
            fn workspace_path(&self, a: &Application) -> String {
                self.0.workspace_path(a)
            }
            fn application_release_path(&self, a: &Application) -> String {
                self.0.application_release_path(a)
            }
            fn node(&self, _name: &str) -> Option<Target> {
                None
            }
            fn sink(&self) -> &dyn LogSink {
                self.0.sink()
            }
        }

        let (node, app) = (web1(), laravel());
        let deployment = NoNodes(FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new().with(USE_APPLICATION_WORKSPACE, true);
        let mut context = CliContext::new(Arc::new(Recorder::default()));
        let inv = TaskInvocation {
            node: &node,
            application: &app,
            deployment: &deployment,
            options: &options,
        };

        assert!(matches!(context.resolve(&inv), Err(DeployError::NodeNotFound(_))));
        assert_eq!(context.state(), &ContextState::Unresolved);
    }

    #[tokio::test]
    async fn test_run_in_context_builds_escaped_command() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new().with(PHP_BINARY, "/usr/bin/php8.2");
        let recorder = Arc::new(Recorder::default());
        let mut context = CliContext::new(recorder.clone());

        let ok = context
            .run_in_context(
                &["artisan", "tinker", "--execute=echo 'hi';"],
                &invocation(&node, &app, &deployment, &options),
                false,
            )
            .await
            .unwrap();

        assert!(ok);
        assert_eq!(
            recorder.calls(),
            vec![(
                "cd '/srv/release/42' && /usr/bin/php8.2 'artisan' 'tinker' '--execute=echo '\\''hi'\\'';'"
                    .to_string(),
                "web1".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_probes_join_paths() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42/"));
        let options = TaskOptions::new();
        let recorder = Arc::new(Recorder::default());
        let mut context = CliContext::new(recorder.clone());
        let inv = invocation(&node, &app, &deployment, &options);

        assert!(context.directory_exists("/storage/", &inv).await.unwrap());
        assert!(context.file_exists("artisan", &inv).await.unwrap());

        let commands: Vec<String> = recorder.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            commands,
            vec![
                "test -d '/srv/release/42/storage'",
                "test -f '/srv/release/42/artisan'",
            ]
        );
    }

    #[tokio::test]
    async fn test_probes_against_local_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("storage")).unwrap();
        std::fs::write(dir.path().join("artisan"), "#!/usr/bin/env php\n").unwrap();

        let release = dir.path().to_string_lossy().into_owned();
        let (node, app, deployment) = (Target::localhost(), laravel(), FixedPaths::new(&release));
        let options = TaskOptions::new();
        let mut context = CliContext::new(Arc::new(ShellCommandService::new()));
        let inv = invocation(&node, &app, &deployment, &options);

        assert!(context.directory_exists("storage", &inv).await.unwrap());
        assert!(!context.directory_exists("missing", &inv).await.unwrap());
        assert!(!context.directory_exists("artisan", &inv).await.unwrap());
        assert!(context.file_exists("artisan", &inv).await.unwrap());
        assert!(!context.file_exists("storage", &inv).await.unwrap());
        assert!(!context.file_exists("nope.php", &inv).await.unwrap());
    }

    #[tokio::test]
    async fn test_migrate_rejects_non_laravel_before_dispatch() {
        let app = Application::new("blog", ApplicationKind::Generic, "/srv/blog");
        let (node, deployment) = (web1(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new();
        let recorder = Arc::new(Recorder::default());
        let mut task = MigrateTask::new(recorder.clone());

        let err = task
            .execute(&invocation(&node, &app, &deployment, &options))
            .await
            .unwrap_err();

        match err {
            DeployError::TypeMismatch(message) => assert_eq!(
                message,
                "Laravel application needed for laravel:migrate, got \"generic\""
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(recorder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_migrate_and_rollback() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new();
        let recorder = Arc::new(Recorder::default());
        let mut task = MigrateTask::new(recorder.clone());
        let inv = invocation(&node, &app, &deployment, &options);

        task.execute(&inv).await.unwrap();
        task.rollback(&inv).await.unwrap();

        let commands: Vec<String> = recorder.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            commands,
            vec![
                "test -f '/srv/release/42/artisan'",
                "cd '/srv/release/42' && php 'artisan' 'migrate' '--force'",
                "test -f '/srv/release/42/artisan'",
                "cd '/srv/release/42' && php 'artisan' 'migrate:rollback' '--force'",
            ]
        );
    }

    #[tokio::test]
    async fn test_migrate_failure_propagates() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new();
        let mut task = MigrateTask::new(Arc::new(Recorder::failing_on("migrate")));

        let err = task
            .execute(&invocation(&node, &app, &deployment, &options))
            .await
            .unwrap_err();
        assert!(err.is_execution_failure());
    }

    #[tokio::test]
    async fn test_migrate_without_artisan() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let options = TaskOptions::new();
        let recorder = Arc::new(Recorder::failing_on("test -f"));
        let mut task = MigrateTask::new(recorder.clone());

        let err = task
            .execute(&invocation(&node, &app, &deployment, &options))
            .await
            .unwrap_err();
        match err {
            DeployError::MissingPath(what) => assert_eq!(what, "artisan in /srv/release/42 on web1"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(recorder.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_queue_restart_keeps_first_context() {
        let (node, app, deployment) = (web1(), laravel(), FixedPaths::new("/srv/release/42"));
        let recorder = Arc::new(Recorder::default());
        let mut task = QueueRestartTask::new(recorder.clone());

        let plain = TaskOptions::new();
        task.execute(&invocation(&node, &app, &deployment, &plain))
            .await
            .unwrap();
        let workspace = TaskOptions::new().with(USE_APPLICATION_WORKSPACE, true);
        task.execute(&invocation(&node, &app, &deployment, &workspace))
            .await
            .unwrap();

        let expected = (
            "cd '/srv/release/42' && php 'artisan' 'queue:restart'".to_string(),
            "web1".to_string(),
        );
        assert_eq!(recorder.calls(), vec![expected.clone(), expected]);
    }

    #[tokio::test]
    async fn test_dry_run_logs_instead_of_running() {
        let (node, app) = (web1(), laravel());
        let mut deployment = FixedPaths::new("/srv/release/42");
        deployment.dry_run = true;
        let options = TaskOptions::new();
        let recorder = Arc::new(Recorder::default());
        let mut task = QueueRestartTask::new(recorder.clone());

        task.simulate(&invocation(&node, &app, &deployment, &options))
            .await
            .unwrap();

        assert!(recorder.calls().is_empty());
        assert_eq!(
            deployment.sink.messages(),
            vec!["Would execute on web1: \"cd '/srv/release/42' && php 'artisan' 'queue:restart'\""]
        );
    }

    #[test]
    fn test_registry() {
        let recorder: Arc<dyn CommandDispatcher> = Arc::new(Recorder::default());
        for name in TASK_NAMES {
            assert_eq!(create_task(name, recorder.clone()).unwrap().name(), *name);
        }
        assert!(matches!(
            create_task("laravel:nope", recorder),
            Err(DeployError::TaskNotFound(_))
        ));
    }
}
