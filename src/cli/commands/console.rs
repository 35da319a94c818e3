//! Interactive console: one line of input per action, redrawing the part of
//! the page that changed whenever a backend call or timer completes.

use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::CliContext;
use crate::console::render::*;
use crate::console::{Clipboard, ConsoleEvent, CopyField, FormField, Osc52Clipboard, Shell};
use crate::models::StatusFilter;

const HELP: &str = "\
Commands:
  show                          Redraw the whole console
  status                        Re-check backend health
  refresh                       Reload the tenant list
  search [TEXT]                 Filter the list by text (no TEXT clears it)
  filter all|active|inactive    Filter the list by status
  clear                         Clear search and status filter
  set name|company|email VALUE  Fill in a form field
  submit                        Create the tenant
  password                      Show or hide the initial password
  copy email|db|password        Copy a credential to the clipboard
  toggle ID                     Enable or disable a tenant
  delete ID                     Ask to delete a tenant
  confirm | cancel              Answer a pending delete
  quit                          Leave the console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Help,
    Show,
    Status,
    Refresh,
    Search(String),
    Filter(StatusFilter),
    Clear,
    Set(FormField, String),
    Submit,
    Password,
    Copy(CopyField),
    Toggle(i64),
    Delete(i64),
    Confirm,
    Cancel,
    Quit,
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("'{}' is not a tenant id", raw.trim()))
}

impl FromStr for ConsoleInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match command.to_lowercase().as_str() {
            "help" | "?" => Ok(ConsoleInput::Help),
            "show" | "" => Ok(ConsoleInput::Show),
            "status" => Ok(ConsoleInput::Status),
            "refresh" => Ok(ConsoleInput::Refresh),
            "search" => Ok(ConsoleInput::Search(rest.to_string())),
            "filter" => rest.parse().map(ConsoleInput::Filter),
            "clear" => Ok(ConsoleInput::Clear),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                Ok(ConsoleInput::Set(field.parse()?, value.to_string()))
            }
            "submit" | "create" => Ok(ConsoleInput::Submit),
            "password" => Ok(ConsoleInput::Password),
            "copy" => rest.parse().map(ConsoleInput::Copy),
            "toggle" => parse_id(rest).map(ConsoleInput::Toggle),
            "delete" => parse_id(rest).map(ConsoleInput::Delete),
            "confirm" | "yes" => Ok(ConsoleInput::Confirm),
            "cancel" | "no" => Ok(ConsoleInput::Cancel),
            "quit" | "exit" | "q" => Ok(ConsoleInput::Quit),
            other => Err(format!("unknown command '{}' (type 'help')", other)),
        }
    }
}

/// Apply one line of input and describe the result
pub fn apply(shell: &mut Shell, input: ConsoleInput, clipboard: &mut dyn Clipboard) -> String {
    match input {
        ConsoleInput::Help => HELP.to_string(),
        ConsoleInput::Show => render_shell(shell),
        ConsoleInput::Status => {
            shell.spawn_health_check();
            render_header(shell.status())
        }
        ConsoleInput::Refresh => {
            shell.spawn_refresh();
            "Refreshing tenants...".to_string()
        }
        ConsoleInput::Search(query) => {
            shell.list_mut().set_query(query);
            render_list(shell.list())
        }
        ConsoleInput::Filter(filter) => {
            shell.list_mut().set_filter(filter);
            render_list(shell.list())
        }
        ConsoleInput::Clear => {
            shell.list_mut().clear_filters();
            render_list(shell.list())
        }
        ConsoleInput::Set(field, value) => {
            shell.form_mut().set_field(field, value);
            render_form(shell.form())
        }
        ConsoleInput::Submit => match shell.spawn_submit() {
            Ok(()) => render_form(shell.form()),
            Err(e) => format!("✗ {}", e),
        },
        ConsoleInput::Password => match shell.created_mut() {
            Some(card) => {
                card.toggle_password();
                render_result(shell.created())
            }
            None => "✗ No tenant has been created yet".to_string(),
        },
        ConsoleInput::Copy(field) => match shell.created_mut() {
            Some(card) => match card.copy(field, clipboard) {
                Ok(()) => format!("✓ Copied {}", field),
                Err(e) => format!("✗ {}", e),
            },
            None => "✗ No tenant has been created yet".to_string(),
        },
        ConsoleInput::Toggle(id) => match shell.spawn_toggle(id) {
            Ok(()) => render_list(shell.list()),
            Err(e) => format!("✗ {}", e),
        },
        ConsoleInput::Delete(id) => match shell.list_mut().request_delete(id) {
            Ok(pending) => render_delete_confirmation(pending),
            Err(e) => format!("✗ {}", e),
        },
        ConsoleInput::Confirm => match shell.spawn_confirmed_delete() {
            Ok(id) => format!("Deleting tenant {}...", id),
            Err(e) => format!("✗ {}", e),
        },
        ConsoleInput::Cancel => match shell.list_mut().cancel_delete() {
            Ok(()) => "Delete cancelled".to_string(),
            Err(e) => format!("✗ {}", e),
        },
        ConsoleInput::Quit => String::new(),
    }
}

enum Section {
    Header,
    Form,
    Created,
    Result,
    List,
}

fn section_for(event: &ConsoleEvent) -> Section {
    match event {
        ConsoleEvent::HealthChecked(_) => Section::Header,
        ConsoleEvent::SuccessBannerExpired { .. } => Section::Form,
        ConsoleEvent::TenantCreated(_) => Section::Created,
        ConsoleEvent::CopyAckExpired { .. } => Section::Result,
        ConsoleEvent::TenantsFetched { .. }
        | ConsoleEvent::TenantToggled { .. }
        | ConsoleEvent::TenantDeleted { .. } => Section::List,
    }
}

/// Apply a completed call or timer and render what it changed
pub fn settle(shell: &mut Shell, event: ConsoleEvent) -> String {
    let section = section_for(&event);
    shell.handle(event);

    match section {
        Section::Header => match shell.offline_banner() {
            Some(banner) => format!(
                "{}\n{}",
                render_header(shell.status()),
                render_offline_banner(&banner)
            ),
            None => render_header(shell.status()),
        },
        Section::Form => render_form(shell.form()),
        Section::Created => format!(
            "{}\n\n{}",
            render_form(shell.form()),
            render_result(shell.created())
        ),
        Section::Result => render_result(shell.created()),
        Section::List => match shell.list_mut().take_alert() {
            Some(alert) => format!("{}\n✗ {}", render_list(shell.list()), alert),
            None => render_list(shell.list()),
        },
    }
}

fn prompt() {
    print!("tenadmin> ");
    if let Err(e) = std::io::stdout().flush() {
        tracing::debug!("Failed to flush prompt: {}", e);
    }
}

pub async fn run(ctx: &CliContext) -> anyhow::Result<()> {
    let (mut shell, mut events) = Shell::new(ctx.api.clone(), ctx.config.clone());
    let mut clipboard = Osc52Clipboard::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    shell.start();
    println!("{}", render_shell(&shell));
    println!("Type 'help' for commands.");
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<ConsoleInput>() {
                    Ok(ConsoleInput::Quit) => break,
                    Ok(input) => println!("{}", apply(&mut shell, input, &mut clipboard)),
                    Err(e) => println!("✗ {}", e),
                }
                prompt();
            }
            Some(event) = events.recv() => {
                println!("\n{}", settle(&mut shell, event));
                prompt();
            }
        }
    }

    println!();
    Ok(())
}
