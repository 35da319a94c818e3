//! The console page: composes the creation form, the result card and the
//! tenant list, and tracks whether the backend is reachable.
//!
//! Backend calls run in spawned tasks and report back as [`ConsoleEvent`]s;
//! all state changes happen in [`Shell::handle`], one event at a time.

use std::sync::Arc;
use std::time::Duration;

use crate::client::TenantApi;
use crate::config::ConsoleConfig;
use crate::error::ClientError;
use crate::models::HealthStatus;

use super::event::{self, ConsoleEvent, EventReceiver, EventSender};
use super::form::{FormError, TenantForm};
use super::list::{ListError, TenantListView};
use super::result::TenantResultView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Checking,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BackendStatus::Checking => "Checking...",
            BackendStatus::Online => "Service Online",
            BackendStatus::Offline => "Service Offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineBanner {
    pub address: String,
    pub hint: String,
}

pub struct Shell {
    api: Arc<dyn TenantApi>,
    config: ConsoleConfig,
    events: EventSender,
    status: BackendStatus,
    form: TenantForm,
    created: Option<TenantResultView>,
    list: TenantListView,
}

impl Shell {
    pub fn new(api: Arc<dyn TenantApi>, config: ConsoleConfig) -> (Self, EventReceiver) {
        let (events, receiver) = event::channel();
        let shell = Self {
            api,
            config,
            form: TenantForm::new(events.clone()),
            events,
            status: BackendStatus::Checking,
            created: None,
            list: TenantListView::new(),
        };
        (shell, receiver)
    }

    pub fn api(&self) -> &Arc<dyn TenantApi> {
        &self.api
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn status(&self) -> BackendStatus {
        self.status
    }

    pub fn form(&self) -> &TenantForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TenantForm {
        &mut self.form
    }

    pub fn created(&self) -> Option<&TenantResultView> {
        self.created.as_ref()
    }

    pub fn created_mut(&mut self) -> Option<&mut TenantResultView> {
        self.created.as_mut()
    }

    pub fn list(&self) -> &TenantListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut TenantListView {
        &mut self.list
    }

    /// Kick off the initial health probe and tenant fetch
    pub fn start(&mut self) {
        self.spawn_health_check();
        self.spawn_refresh();
    }

    pub fn offline_banner(&self) -> Option<OfflineBanner> {
        (self.status == BackendStatus::Offline).then(|| OfflineBanner {
            address: self.api.base_url().to_string(),
            hint: self.config.start_hint(),
        })
    }

    // ---- health ----

    pub fn spawn_health_check(&mut self) {
        self.status = BackendStatus::Checking;
        let api = Arc::clone(&self.api);
        let timeout = self.config.health_timeout();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = probe(api.as_ref(), timeout).await;
            let _ = events.send(ConsoleEvent::HealthChecked(result));
        });
    }

    /// Probe inline instead of through the event loop
    pub async fn check_backend(&mut self) -> BackendStatus {
        self.status = BackendStatus::Checking;
        let result = probe(self.api.as_ref(), self.config.health_timeout()).await;
        self.apply_health(result);
        self.status
    }

    fn apply_health(&mut self, result: Result<HealthStatus, ClientError>) {
        self.status = match result {
            Ok(health) => {
                tracing::debug!("Backend health: {}", health.status);
                BackendStatus::Online
            }
            Err(e) => {
                tracing::warn!("Backend health check failed: {}", e);
                BackendStatus::Offline
            }
        };
    }

    // ---- list ----

    pub fn spawn_refresh(&mut self) {
        let ticket = self.list.begin_refresh();
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.list_tenants().await;
            let _ = events.send(ConsoleEvent::TenantsFetched { ticket, result });
        });
    }

    pub fn spawn_toggle(&mut self, id: i64) -> Result<(), ListError> {
        self.list.begin_toggle(id)?;
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.toggle_tenant_status(id).await;
            let _ = events.send(ConsoleEvent::TenantToggled { id, result });
        });
        Ok(())
    }

    /// Send the delete that is awaiting confirmation
    pub fn spawn_confirmed_delete(&mut self) -> Result<i64, ListError> {
        let id = self.list.confirm_delete()?;
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.delete_tenant(id).await;
            let _ = events.send(ConsoleEvent::TenantDeleted { id, result });
        });
        Ok(id)
    }

    // ---- form ----

    pub fn spawn_submit(&mut self) -> Result<(), FormError> {
        let request = self.form.begin_submit()?;
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.create_tenant(&request).await;
            let _ = events.send(ConsoleEvent::TenantCreated(result));
        });
        Ok(())
    }

    // ---- event loop ----

    pub fn handle(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::SuccessBannerExpired { generation } => {
                self.form.handle_banner_expired(generation)
            }
            ConsoleEvent::CopyAckExpired {
                tenant_id,
                generation,
            } => {
                if let Some(created) = self.created.as_mut() {
                    created.handle_copy_expired(tenant_id, generation);
                }
            }
            ConsoleEvent::HealthChecked(result) => self.apply_health(result),
            ConsoleEvent::TenantsFetched { ticket, result } => {
                self.list.finish_refresh(ticket, result);
            }
            ConsoleEvent::TenantToggled { id, result } => self.list.finish_toggle(id, result),
            ConsoleEvent::TenantDeleted { id, result } => self.list.finish_delete(id, result),
            ConsoleEvent::TenantCreated(result) => {
                if let Some(created) = self.form.finish_submit(result) {
                    // Replacing the card drops the previous one and its timers
                    self.created = Some(TenantResultView::new(created, self.events.clone()));
                }
            }
        }
    }
}

async fn probe(api: &dyn TenantApi, timeout: Duration) -> Result<HealthStatus, ClientError> {
    match tokio::time::timeout(timeout, api.health_check()).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Health check timed out after {:?}", timeout);
            Err(ClientError::unreachable(api.base_url()))
        }
    }
}
