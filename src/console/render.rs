//! Plain-text rendering of console state.
//!
//! Every function here is pure: state in, `String` out. The CLI decides when
//! to print.

use chrono::{DateTime, Utc};

use crate::models::{StatusFilter, TenantRecord, TenantStatus};

use super::list::{DeleteConfirmation, ListDisplay, TenantListView};
use super::form::TenantForm;
use super::result::{CopyField, TenantResultView};
use super::shell::{BackendStatus, OfflineBanner, Shell};

const RULE_WIDTH: usize = 90;

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn render_header(status: BackendStatus) -> String {
    let marker = match status {
        BackendStatus::Online => "●",
        BackendStatus::Offline => "○",
        BackendStatus::Checking => "◌",
    };
    format!("Super Admin Service  [{} {}]", marker, status.label())
}

pub fn render_offline_banner(banner: &OfflineBanner) -> String {
    format!(
        "!! Backend Service Unavailable\n   The backend is not running or not accessible at {}\n   {}",
        banner.address, banner.hint
    )
}

pub fn render_form(form: &TenantForm) -> String {
    let fields = form.fields();
    let mut lines = vec![
        "Create New Tenant".to_string(),
        format!("  Tenant Name:  {}", fields.name),
        format!("  Company Name: {}", fields.company_name),
        format!("  Admin Email:  {}", fields.admin_email),
    ];
    if let Some(error) = form.error() {
        lines.push(format!("  ✗ {}", error));
    }
    if form.success_visible() {
        lines.push("  ✓ Tenant created successfully!".to_string());
    }
    lines.push(if form.is_busy() {
        "  [ Creating Tenant... ]".to_string()
    } else {
        "  [ Create Tenant ]".to_string()
    });
    lines.join("\n")
}

fn copy_marker(view: &TenantResultView, field: CopyField) -> &'static str {
    if view.copied() == Some(field) {
        "  ✓ copied"
    } else {
        ""
    }
}

pub fn render_result(view: Option<&TenantResultView>) -> String {
    let Some(view) = view else {
        return "No Tenant Created Yet\n  Fill out the form to create a new tenant database. The credentials will appear here."
            .to_string();
    };

    let result = view.result();
    format!(
        "Tenant Created (ID {})  [Active]\n  Admin Email:      {}{}\n  Database:         {}{}\n  Initial Password: {}{}   (Show Once)\n  ⚠ This password is shown only once. Make sure to save it securely!",
        result.tenant_id,
        result.admin_email,
        copy_marker(view, CopyField::Email),
        result.tenant_db,
        copy_marker(view, CopyField::Database),
        view.displayed_password(),
        copy_marker(view, CopyField::Password),
    )
}

fn status_badge(status: TenantStatus) -> &'static str {
    match status {
        TenantStatus::Active => "Active",
        TenantStatus::Inactive => "Disabled",
    }
}

fn render_filter_bar(view: &TenantListView) -> String {
    let options = [StatusFilter::All, StatusFilter::Active, StatusFilter::Inactive]
        .iter()
        .map(|f| {
            if *f == view.filter() {
                format!("[{}]", f)
            } else {
                f.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let query = if view.query().is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", view.query())
    };
    format!("Search: {}   Filter: {}", query, options)
}

pub fn render_row(tenant: &TenantRecord, busy: bool) -> String {
    let marker = if busy { "…" } else { " " };
    format!(
        "{}{:<5} {:<20} {:<9} {:<32} {:<28} {}:{} ({})\n       created {}",
        marker,
        tenant.id,
        tenant.name,
        status_badge(tenant.status),
        tenant.db_name,
        tenant.admin_email,
        tenant.db_host,
        tenant.db_port,
        tenant.db_user,
        format_timestamp(&tenant.created_at)
    )
}

pub fn render_list(view: &TenantListView) -> String {
    match view.display() {
        ListDisplay::Loading => "Loading tenants...".to_string(),
        ListDisplay::Error(message) => format!(
            "Error Loading Tenants\n  {}\n  Type 'refresh' to try again.",
            message
        ),
        ListDisplay::Empty => {
            "No Tenants Found\n  Create your first tenant using the form above to get started."
                .to_string()
        }
        ListDisplay::NoMatches => format!(
            "Tenant Databases ({})\n{}\nNo tenants match your filters\n  Try adjusting your search or filter criteria, or type 'clear' to clear filters.",
            view.count_label(),
            render_filter_bar(view)
        ),
        ListDisplay::Rows(rows) => {
            let mut lines = vec![
                format!("Tenant Databases ({})", view.count_label()),
                render_filter_bar(view),
                format!(
                    " {:<5} {:<20} {:<9} {:<32} {:<28} {}",
                    "ID", "NAME", "STATUS", "DATABASE", "ADMIN", "HOST"
                ),
                rule(),
            ];
            lines.extend(rows.iter().map(|t| render_row(t, view.is_toggling(t.id))));
            lines.join("\n")
        }
    }
}

pub fn render_delete_confirmation(pending: &DeleteConfirmation) -> String {
    let tenant = &pending.tenant;
    let prompt = if pending.deleting {
        "Deleting..."
    } else {
        "Type 'confirm' to delete or 'cancel' to keep it."
    };
    format!(
        "Delete Tenant?\n  Are you sure you want to delete this tenant? This action cannot be undone.\n    {}\n    {}\n    {}\n  Note: This only removes the tenant record. The tenant's database will NOT be automatically deleted.\n  {}",
        tenant.name, tenant.db_name, tenant.admin_email, prompt
    )
}

pub fn render_shell(shell: &Shell) -> String {
    let mut sections = vec![render_header(shell.status())];
    if let Some(banner) = shell.offline_banner() {
        sections.push(render_offline_banner(&banner));
    }
    sections.push(render_form(shell.form()));
    sections.push(render_result(shell.created()));
    sections.push(render_list(shell.list()));
    if let Some(pending) = shell.list().pending_delete() {
        sections.push(render_delete_confirmation(pending));
    }
    if let Some(alert) = shell.list().alert() {
        sections.push(format!("✗ {}", alert));
    }
    let separator = format!("\n{}\n", rule());
    sections.join(separator.as_str())
}
