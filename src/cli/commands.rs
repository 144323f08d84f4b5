//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::api;
use crate::cli::{confirm, field, info, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME};
use crate::csrf::generate_token;

/// Initialize a new salesdesk.toml configuration file
pub async fn init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() && !force {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        if !confirm("Overwrite it with the defaults?")? {
            info("Cancelled");
            return Ok(());
        }
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'salesdesk serve' to start the application shell");

    Ok(())
}

/// Print freshly generated tokens
pub async fn token(count: usize, format: OutputFormat) -> Result<()> {
    let tokens: Vec<String> = (0..count).map(|_| generate_token().to_string()).collect();

    match format {
        OutputFormat::Text => {
            for token in &tokens {
                println!("{}", token);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
    }

    Ok(())
}

/// Start the application shell
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config_or_default()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting salesdesk on http://{}:{}", host, port));
    field("CSRF header", &config.csrf.header_name);
    field(
        "Toast lifetime",
        &format!("{}ms", config.notifications.default_duration_ms),
    );
    if !config.csrf.enabled {
        warn("CSRF enforcement is disabled");
    }

    api::run_server(config, &host, port).await?;
    Ok(())
}

/// Print the effective configuration
pub async fn show_config() -> Result<()> {
    let config = config::load_config_or_default()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
