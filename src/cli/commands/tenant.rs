use clap::Subcommand;
use futures::future::join_all;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::console::event::channel;
use crate::console::render::{render_delete_confirmation, render_list, render_result};
use crate::console::{TenantListView, TenantResultView};
use crate::models::{StatusFilter, TenantCreateRequest, TenantRecord};

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List tenants")]
    List {
        #[arg(long, help = "Case-insensitive match on name, database, admin email or id")]
        search: Option<String>,
        #[arg(long, default_value = "all", help = "all, active or inactive")]
        status: StatusFilter,
    },

    #[command(about = "Show one tenant")]
    Show {
        #[arg(help = "Tenant ID")]
        id: i64,
    },

    #[command(about = "Provision a new tenant and print its initial credentials")]
    Create {
        #[arg(long, help = "Tenant name")]
        name: String,
        #[arg(long, help = "Company name")]
        company: String,
        #[arg(long, help = "Admin email")]
        email: String,
    },

    #[command(about = "Delete a tenant record (its database is kept)")]
    Delete {
        #[arg(help = "Tenant ID")]
        id: i64,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Flip tenants between active and inactive")]
    Toggle {
        #[arg(required = true, help = "Tenant IDs")]
        ids: Vec<i64>,
    },
}

pub async fn handle(cmd: TenantCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        TenantCommands::List { search, status } => list(ctx, search, status).await,
        TenantCommands::Show { id } => show(ctx, id).await,
        TenantCommands::Create {
            name,
            company,
            email,
        } => create(ctx, TenantCreateRequest::new(name, company, email)).await,
        TenantCommands::Delete { id, yes } => delete(ctx, id, yes).await,
        TenantCommands::Toggle { ids } => toggle(ctx, ids).await,
    }
}

/// Fetch the tenant list, failing the command if the backend does
async fn load(ctx: &CliContext) -> anyhow::Result<TenantListView> {
    let mut view = TenantListView::new();
    let ticket = view.begin_refresh();
    match ctx.api.list_tenants().await {
        Ok(tenants) => {
            view.finish_refresh(ticket, Ok(tenants));
            Ok(view)
        }
        Err(e) => Err(report_failure(&ctx.output_format, e)),
    }
}

async fn list(
    ctx: &CliContext,
    search: Option<String>,
    status: StatusFilter,
) -> anyhow::Result<()> {
    let mut view = load(ctx).await?;
    view.set_filter(status);
    if let Some(query) = search {
        view.set_query(query);
    }

    if view.tenants().is_empty() {
        return output_empty_collection(&ctx.output_format, "tenants", "No tenants found");
    }

    match ctx.output_format {
        OutputFormat::Json => {
            let visible = view.visible();
            let body = json!({
                "tenants": visible,
                "shown": visible.len(),
                "total": view.tenants().len(),
                "filtered": view.is_filtered(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("{}", render_list(&view));
        }
    }
    Ok(())
}

fn lookup<'a>(
    view: &'a TenantListView,
    id: i64,
    output_format: &OutputFormat,
) -> anyhow::Result<&'a TenantRecord> {
    view.get(id).ok_or_else(|| {
        report_error(
            output_format,
            &format!("Tenant {} not found", id),
            Some("TENANT_NOT_FOUND"),
        )
    })
}

async fn show(ctx: &CliContext, id: i64) -> anyhow::Result<()> {
    let view = load(ctx).await?;
    let tenant = lookup(&view, id, &ctx.output_format)?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(tenant)?);
        }
        OutputFormat::Text => {
            println!("ID:          {}", tenant.id);
            println!("Name:        {}", tenant.name);
            if let Some(company) = &tenant.company_name {
                println!("Company:     {}", company);
            }
            println!("Status:      {}", tenant.status);
            println!("Database:    {}", tenant.db_name);
            println!("Host:        {}:{}", tenant.db_host, tenant.db_port);
            println!("DB user:     {}", tenant.db_user);
            println!("Admin email: {}", tenant.admin_email);
            println!(
                "Created:     {}",
                crate::console::render::format_timestamp(&tenant.created_at)
            );
        }
    }
    Ok(())
}

async fn create(ctx: &CliContext, request: TenantCreateRequest) -> anyhow::Result<()> {
    request.validate()?;

    let created = match ctx.api.create_tenant(&request).await {
        Ok(created) => created,
        Err(e) => return Err(report_failure(&ctx.output_format, e)),
    };
    tracing::info!("Created tenant {} ({})", created.tenant_id, created.tenant_db);

    match ctx.output_format {
        OutputFormat::Json => output_success(
            &ctx.output_format,
            "Tenant created successfully",
            Some(json!({
                "tenant_id": created.tenant_id,
                "tenant_db": created.tenant_db,
                "admin_email": created.admin_email,
                "initial_password": created.initial_password,
            })),
        ),
        OutputFormat::Text => {
            // The card needs an event sender for its copy timer; nothing is copied here
            let (events, _receiver) = channel();
            let card = TenantResultView::new(created, events);
            println!("{}", render_result(Some(&card)));
            Ok(())
        }
    }
}

async fn delete(ctx: &CliContext, id: i64, yes: bool) -> anyhow::Result<()> {
    let mut view = load(ctx).await?;
    let pending = view.request_delete(id)?;

    if !yes {
        if let OutputFormat::Text = ctx.output_format {
            eprintln!("{}", render_delete_confirmation(pending));
        }
        if !confirm(&format!("Delete tenant {}?", id))? {
            view.cancel_delete()?;
            return output_success(&ctx.output_format, "Delete cancelled", None);
        }
    }

    view.delete_confirmed(ctx.api.as_ref()).await?;
    if let Some(alert) = view.take_alert() {
        return Err(report_error(&ctx.output_format, &alert, None));
    }

    output_success(
        &ctx.output_format,
        &format!("Tenant {} deleted. Its database was not removed.", id),
        Some(json!({ "tenant_id": id })),
    )
}

async fn toggle(ctx: &CliContext, ids: Vec<i64>) -> anyhow::Result<()> {
    let mut view = load(ctx).await?;
    for id in &ids {
        view.begin_toggle(*id)?;
    }

    let api = ctx.api.as_ref();
    let results = join_all(ids.iter().map(|id| api.toggle_tenant_status(*id))).await;

    let mut failures = Vec::new();
    let mut updated = Vec::new();
    for (id, result) in ids.into_iter().zip(results) {
        view.finish_toggle(id, result);
        match view.take_alert() {
            Some(alert) => failures.push(json!({ "tenant_id": id, "error": alert })),
            None => {
                if let Some(tenant) = view.get(id) {
                    updated.push(json!({ "tenant_id": id, "status": tenant.status }));
                    if let OutputFormat::Text = ctx.output_format {
                        println!("✓ {} ({}) is now {}", tenant.name, id, tenant.status);
                    }
                }
            }
        }
    }

    match ctx.output_format {
        OutputFormat::Json => {
            let body = json!({
                "success": failures.is_empty(),
                "updated": updated,
                "failed": failures,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for failure in &failures {
                eprintln!(
                    "✗ tenant {}: {}",
                    failure["tenant_id"],
                    failure["error"].as_str().unwrap_or_default()
                );
            }
        }
    }

    if !failures.is_empty() {
        anyhow::bail!("{} of {} toggles failed", failures.len(), failures.len() + updated.len());
    }
    Ok(())
}
