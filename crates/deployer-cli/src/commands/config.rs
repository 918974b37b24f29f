use deployer_core::Config;
use std::path::Path;

const SAMPLE_CONFIG: &str = r#"# Deployer configuration

deployment:
  name: production
  workspaces_base: /var/lib/deployer/workspaces

nodes:
  - name: web1
    hostname: web1.example.com
    username: deploy

  - name: web2
    hostname: web2.example.com
    username: deploy
    options:
      port: "2222"
      privateKeyFile: /home/deploy/.ssh/deploy_ed25519

applications:
  - name: shop
    kind: laravel
    deployment_path: /srv/shop

defaults:
  ssh_binary: ssh
  php_binary: php
"#;

pub fn run(explicit: Option<&Path>, path: bool, init: bool) -> anyhow::Result<()> {
    let config_path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    if path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config already exists at: {}", config_path.display());
            println!("Remove it first if you want to reinitialize.");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, SAMPLE_CONFIG)?;
        println!("Sample config written to: {}", config_path.display());
        return Ok(());
    }

    println!("Config path:  {}", config_path.display());
    if config_path.exists() {
        let config = Config::load_from(&config_path)?;
        println!("Deployment:   {}", config.deployment.name);
        println!("Nodes:        {}", config.nodes.len());
        println!("Applications: {}", config.applications.len());
        for app in &config.applications {
            println!("  - {} ({}) at {}", app.name, app.kind, app.deployment_path);
        }
    } else {
        println!("Status:       not found");
        println!("Run `deployer config --init` to create one.");
    }

    Ok(())
}
