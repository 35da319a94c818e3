use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::console::render::{render_header, render_offline_banner};
use crate::console::{BackendStatus, Shell};

/// Probe the backend once; an offline backend fails the command
pub async fn health(ctx: &CliContext) -> anyhow::Result<()> {
    let (mut shell, _events) = Shell::new(ctx.api.clone(), ctx.config.clone());
    let status = shell.check_backend().await;

    match ctx.output_format {
        OutputFormat::Json => {
            let body = json!({
                "status": match status {
                    BackendStatus::Online => "online",
                    _ => "offline",
                },
                "address": ctx.api.base_url(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("{}", render_header(status));
            if let Some(banner) = shell.offline_banner() {
                println!("{}", render_offline_banner(&banner));
            }
        }
    }

    if status != BackendStatus::Online {
        anyhow::bail!("Backend at {} is offline", ctx.api.base_url());
    }
    Ok(())
}

pub async fn info(ctx: &CliContext) -> anyhow::Result<()> {
    match ctx.api.service_info().await {
        Ok(info) => match ctx.output_format {
            OutputFormat::Json => {
                let body = json!({
                    "service": info.service,
                    "address": ctx.api.base_url(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(())
            }
            OutputFormat::Text => {
                println!("Service: {}", info.service);
                println!("Address: {}", ctx.api.base_url());
                Ok(())
            }
        },
        Err(e) => Err(report_failure(&ctx.output_format, e)),
    }
}
