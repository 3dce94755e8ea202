use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::clients::QueryServiceRemote;
use crate::domain::classifier::classify;
use crate::infra::config::AppConfig;

#[derive(Parser)]
#[command(name = "business-mcp-gateway")]
#[command(about = "Business metrics & weather MCP gateway")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the server (HTTP or stdio per MODE); the default
    Serve,
    /// Health check the service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Show service status and tool availability
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Show which queries a business prompt would run
    Classify {
        /// Free-text prompt
        text: String,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match serve().await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Server failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Classify { text } => {
            println!("{}", describe_classification(&text));
            ExitCode::SUCCESS
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env_and_toml()?;
    crate::infra::logging::init(&cfg.log);
    crate::infra::boot::run_server(cfg).await
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let cfg = AppConfig::from_env_and_toml()?;
    cfg.validate()?;
    Ok(cfg)
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let healthy = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?
        .status()
        .is_success();
    println!("🏥 Gateway: {}", if healthy { "✅ Healthy" } else { "❌ Unhealthy" });

    match list_tool_names(&client, url).await {
        Ok(names) => println!("🔧 Tools ({}): {}", names.len(), names.join(", ")),
        Err(reason) => println!("🔧 Tools: ❌ {}", reason),
    }

    let cfg = status_config();
    println!("\n📋 Configuration:");
    println!("  Mode: {}  Port: {}  Toolset: {:?}", cfg.mode, cfg.port, cfg.toolset);
    println!("  Log: {} -> {:?}", cfg.log.level, cfg.log.sink);
    match QueryServiceRemote::from_config(&cfg.data_provider) {
        Ok(provider) => println!(
            "  Data Provider: {} ({})",
            cfg.data_provider.base_url().unwrap_or_default(),
            if provider.health().await { "✅ reachable" } else { "❌ unreachable" }
        ),
        Err(_) => println!("  Data Provider: Not configured"),
    }
    println!(
        "  Weather Agent: {}",
        cfg.weather.base_url().unwrap_or("Not configured")
    );
    println!(
        "  Narrative: {} ({})",
        cfg.narrative.model,
        if cfg.narrative.api_key.is_some() { "key set" } else { "no key" }
    );

    Ok(())
}

/// Same layering as `serve`; a broken config file still yields a summary.
fn status_config() -> AppConfig {
    AppConfig::from_env_and_toml().unwrap_or_else(|e| {
        eprintln!("⚠️  {}; showing environment-only settings", e);
        AppConfig::from_env()
    })
}

/// `tools/list` check against a running gateway.
async fn list_tool_names(client: &reqwest::Client, url: &str) -> Result<Vec<String>, String> {
    let resp = client
        .post(format!("{}/mcp", url))
        .json(&serde_json::json!({"jsonrpc": "2.0", "id": "status", "method": "tools/list"}))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await
        .map_err(|_| "unavailable".to_string())?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
    let tools = body["result"]["tools"]
        .as_array()
        .ok_or_else(|| "malformed tools/list response".to_string())?;
    Ok(tools
        .iter()
        .filter_map(|t| t["name"].as_str().map(str::to_owned))
        .collect())
}

fn describe_classification(text: &str) -> String {
    let c = classify(text);
    let names: Vec<&str> = c.categories.iter().map(|c| c.as_str()).collect();
    match c.min_amount {
        Some(amount) => format!("categories: {} (min_amount: {})", names.join(", "), amount),
        None => format!("categories: {}", names.join(", ")),
    }
}
