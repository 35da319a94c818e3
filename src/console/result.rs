use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::models::TenantCreateResult;

use super::clipboard::{Clipboard, ClipboardError};
use super::event::{ConsoleEvent, EventSender};
use super::timer::DelayedAction;

/// How long a "copied" acknowledgement stays visible
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

const PASSWORD_MASK: &str = "••••••••••••";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyField {
    Email,
    Database,
    Password,
}

impl FromStr for CopyField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(CopyField::Email),
            "db" | "database" => Ok(CopyField::Database),
            "password" | "pw" => Ok(CopyField::Password),
            other => Err(format!(
                "unknown field '{}' (expected email, db or password)",
                other
            )),
        }
    }
}

impl fmt::Display for CopyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CopyField::Email => "email",
            CopyField::Database => "database name",
            CopyField::Password => "password",
        })
    }
}

/// Credentials of the tenant that was just created. Lives only as long as
/// the console session; nothing here is written anywhere else.
#[derive(Debug)]
pub struct TenantResultView {
    result: TenantCreateResult,
    password_visible: bool,
    copied: Option<CopyField>,
    generation: u64,
    copy_timer: Option<DelayedAction>,
    events: EventSender,
}

impl TenantResultView {
    pub fn new(result: TenantCreateResult, events: EventSender) -> Self {
        Self {
            result,
            password_visible: true,
            copied: None,
            generation: 0,
            copy_timer: None,
            events,
        }
    }

    pub fn result(&self) -> &TenantCreateResult {
        &self.result
    }

    pub fn password_visible(&self) -> bool {
        self.password_visible
    }

    pub fn toggle_password(&mut self) -> bool {
        self.password_visible = !self.password_visible;
        self.password_visible
    }

    pub fn displayed_password(&self) -> &str {
        if self.password_visible {
            &self.result.initial_password
        } else {
            PASSWORD_MASK
        }
    }

    pub fn copied(&self) -> Option<CopyField> {
        self.copied
    }

    fn value_of(&self, field: CopyField) -> &str {
        match field {
            CopyField::Email => &self.result.admin_email,
            CopyField::Database => &self.result.tenant_db,
            CopyField::Password => &self.result.initial_password,
        }
    }

    /// Copy one value and acknowledge it for a short while. A newer copy
    /// replaces the acknowledgement of an older one.
    pub fn copy(
        &mut self,
        field: CopyField,
        clipboard: &mut dyn Clipboard,
    ) -> Result<(), ClipboardError> {
        clipboard.copy(self.value_of(field))?;

        self.generation += 1;
        self.copied = Some(field);
        if let Some(previous) = self.copy_timer.take() {
            previous.cancel();
        }
        self.copy_timer = Some(DelayedAction::schedule(
            COPY_ACK_DURATION,
            &self.events,
            ConsoleEvent::CopyAckExpired {
                tenant_id: self.result.tenant_id,
                generation: self.generation,
            },
        ));
        Ok(())
    }

    /// Expiries scheduled by another card are ignored
    pub fn handle_copy_expired(&mut self, tenant_id: i64, generation: u64) {
        if tenant_id == self.result.tenant_id && generation == self.generation {
            self.copied = None;
            self.copy_timer = None;
        }
    }
}
