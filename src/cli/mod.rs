pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::{HttpTenantClient, TenantApi};
use crate::config::{config, ConsoleConfig};

#[derive(Parser)]
#[command(name = "tenadmin")]
#[command(about = "Tenant console - provision and manage tenants through the super-admin API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Backend base URL (overrides SUPER_ADMIN_API_URL)"
    )]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check backend reachability via the /health endpoint")]
    Health,

    #[command(about = "Show service information from the API root endpoint")]
    Info,

    #[command(about = "Create, list, delete and enable/disable tenants")]
    Tenant {
        #[command(subcommand)]
        cmd: commands::tenant::TenantCommands,
    },

    #[command(about = "Interactive console session")]
    Console,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command handler needs
pub struct CliContext {
    pub config: ConsoleConfig,
    pub api: Arc<dyn TenantApi>,
    pub output_format: OutputFormat,
}

impl CliContext {
    pub fn new(config: ConsoleConfig, output_format: OutputFormat) -> anyhow::Result<Self> {
        let api: Arc<dyn TenantApi> = Arc::new(HttpTenantClient::new(&config)?);
        Ok(Self {
            config,
            api,
            output_format,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let config = match cli.api_url.as_deref() {
        Some(url) => config().clone().with_api_url(url)?,
        None => config().clone(),
    };
    tracing::debug!("Using backend at {}", config.api_url);

    let ctx = CliContext::new(config, output_format)?;

    match cli.command {
        Commands::Health => commands::server::health(&ctx).await,
        Commands::Info => commands::server::info(&ctx).await,
        Commands::Tenant { cmd } => commands::tenant::handle(cmd, &ctx).await,
        Commands::Console => commands::console::run(&ctx).await,
    }
}
