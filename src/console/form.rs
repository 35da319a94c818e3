use std::time::Duration;
use thiserror::Error;

use crate::error::ClientError;
use crate::models::{TenantCreateRequest, TenantCreateResult, ValidationError};

use super::event::{ConsoleEvent, EventSender};
use super::timer::DelayedAction;

/// How long the "tenant created" banner stays up
pub const SUCCESS_BANNER_DURATION: Duration = Duration::from_secs(3);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("A tenant is already being created")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    CompanyName,
    AdminEmail,
}

impl std::str::FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(FormField::Name),
            "company" | "company_name" => Ok(FormField::CompanyName),
            "email" | "admin_email" => Ok(FormField::AdminEmail),
            other => Err(format!(
                "unknown field '{}' (expected name, company or email)",
                other
            )),
        }
    }
}

/// Tenant creation form: field values plus the submit lifecycle
#[derive(Debug)]
pub struct TenantForm {
    fields: TenantCreateRequest,
    busy: bool,
    error: Option<String>,
    success: bool,
    generation: u64,
    success_timer: Option<DelayedAction>,
    events: EventSender,
}

impl TenantForm {
    pub fn new(events: EventSender) -> Self {
        Self {
            fields: TenantCreateRequest::default(),
            busy: false,
            error: None,
            success: false,
            generation: 0,
            success_timer: None,
            events,
        }
    }

    pub fn fields(&self) -> &TenantCreateRequest {
        &self.fields
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.fields.name = value,
            FormField::CompanyName => self.fields.company_name = value,
            FormField::AdminEmail => self.fields.admin_email = value,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_visible(&self) -> bool {
        self.success
    }

    /// Validate and go busy. The returned request is what should be sent.
    pub fn begin_submit(&mut self) -> Result<TenantCreateRequest, FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }
        if let Err(e) = self.fields.validate() {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        self.busy = true;
        self.error = None;
        self.hide_success();
        Ok(self.fields.clone())
    }

    /// Settle a submit. On success the fields are cleared, the banner is
    /// scheduled to disappear and the created tenant is handed back.
    pub fn finish_submit(
        &mut self,
        result: Result<TenantCreateResult, ClientError>,
    ) -> Option<TenantCreateResult> {
        self.busy = false;

        match result {
            Ok(created) => {
                self.fields = TenantCreateRequest::default();
                self.show_success();
                Some(created)
            }
            Err(e) => {
                tracing::warn!("Tenant creation failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn handle_banner_expired(&mut self, generation: u64) {
        if generation == self.generation {
            self.success = false;
            self.success_timer = None;
        }
    }

    fn show_success(&mut self) {
        self.generation += 1;
        self.success = true;
        self.success_timer = Some(DelayedAction::schedule(
            SUCCESS_BANNER_DURATION,
            &self.events,
            ConsoleEvent::SuccessBannerExpired {
                generation: self.generation,
            },
        ));
    }

    fn hide_success(&mut self) {
        self.success = false;
        if let Some(timer) = self.success_timer.take() {
            timer.cancel();
        }
    }
}
