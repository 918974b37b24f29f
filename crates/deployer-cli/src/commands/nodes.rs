use deployer_core::config::Config;

pub fn run(config: &Config, json: bool) -> anyhow::Result<()> {
    if config.nodes.is_empty() {
        println!("No nodes configured.");
        println!("Run `deployer config --init` to create a sample config.");
        return Ok(());
    }

    if json {
        let entries: Vec<serde_json::Value> = config
            .nodes
            .iter()
            .map(|n| {
                serde_json::json!({
                    "name": n.name,
                    "hostname": n.hostname,
                    "username": n.username,
                    "local": n.is_local(),
                    "options": n.options,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{:<15} {:<30} {:<12} {}", "NAME", "HOST", "USER", "OPTIONS");
        println!("{}", "-".repeat(70));
        for n in &config.nodes {
            let mut options: Vec<String> = n.options.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            options.sort();
            println!(
                "{:<15} {:<30} {:<12} {}",
                n.name,
                n.hostname,
                n.username.as_deref().unwrap_or("-"),
                options.join(", "),
            );
        }
    }

    Ok(())
}
