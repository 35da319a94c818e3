//! Tenant list view state.
//!
//! Holds the last fetched tenant set and derives what is shown from it: the
//! status filter first, then the text search. Delete goes through an explicit
//! confirmation; toggles are tracked per id so several rows can be busy at
//! once.

use std::collections::HashSet;
use thiserror::Error;

use crate::client::TenantApi;
use crate::error::ClientError;
use crate::models::{DeleteTenantResponse, StatusFilter, TenantRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("Tenant {0} is not in the list")]
    UnknownTenant(i64),

    #[error("A delete is already awaiting confirmation for tenant {0}")]
    DeletePending(i64),

    #[error("No delete is awaiting confirmation")]
    NothingToConfirm,

    #[error("Delete of tenant {0} is already in progress")]
    DeleteInProgress(i64),

    #[error("Tenant {0} is already being updated")]
    ToggleInProgress(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Ready,
    Refreshing,
    Error(String),
}

/// Identifies one list fetch; only the most recently issued ticket is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// What the list area should show right now
#[derive(Debug, PartialEq)]
pub enum ListDisplay<'a> {
    Loading,
    Error(&'a str),
    /// No tenants exist at all
    Empty,
    /// Tenants exist but none survive the filter and search
    NoMatches,
    Rows(Vec<&'a TenantRecord>),
}

#[derive(Debug, Clone)]
pub struct DeleteConfirmation {
    pub tenant: TenantRecord,
    pub deleting: bool,
}

#[derive(Debug)]
pub struct TenantListView {
    tenants: Vec<TenantRecord>,
    phase: ListPhase,
    query: String,
    filter: StatusFilter,
    latest_ticket: u64,
    pending_delete: Option<DeleteConfirmation>,
    toggling: HashSet<i64>,
    alert: Option<String>,
}

impl Default for TenantListView {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantListView {
    pub fn new() -> Self {
        Self {
            tenants: Vec::new(),
            phase: ListPhase::Loading,
            query: String::new(),
            filter: StatusFilter::All,
            latest_ticket: 0,
            pending_delete: None,
            toggling: HashSet::new(),
            alert: None,
        }
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn tenants(&self) -> &[TenantRecord] {
        &self.tenants
    }

    pub fn get(&self, id: i64) -> Option<&TenantRecord> {
        self.tenants.iter().find(|t| t.id == id)
    }

    // ---- fetching ----

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_ticket += 1;
        self.phase = match self.phase {
            ListPhase::Ready | ListPhase::Refreshing => ListPhase::Refreshing,
            ListPhase::Loading | ListPhase::Error(_) => ListPhase::Loading,
        };
        RefreshTicket(self.latest_ticket)
    }

    /// Apply a fetch result. Returns `false` when a newer fetch has been issued
    /// since, in which case the result is dropped.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<TenantRecord>, ClientError>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                "Discarding stale tenant list (ticket {}, latest {})",
                ticket.0,
                self.latest_ticket
            );
            return false;
        }

        match result {
            Ok(tenants) => {
                tracing::debug!("Loaded {} tenants", tenants.len());
                self.tenants = tenants;
                self.toggling.retain(|id| self.tenants.iter().any(|t| t.id == *id));
                self.phase = ListPhase::Ready;
            }
            Err(e) => {
                tracing::warn!("Failed to load tenants: {}", e);
                self.phase = ListPhase::Error(e.to_string());
            }
        }
        true
    }

    pub async fn refresh(&mut self, api: &dyn TenantApi) -> bool {
        let ticket = self.begin_refresh();
        let result = api.list_tenants().await;
        self.finish_refresh(ticket, result)
    }

    // ---- search and filter ----

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.filter = StatusFilter::All;
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.is_empty() || self.filter != StatusFilter::All
    }

    /// Tenants that pass the status filter and then the search query
    pub fn visible(&self) -> Vec<&TenantRecord> {
        let needle = self.query.to_lowercase();
        self.tenants
            .iter()
            .filter(|t| self.filter.admits(t.status))
            .filter(|t| t.matches_query(&needle))
            .collect()
    }

    pub fn count_label(&self) -> String {
        let total = self.tenants.len();
        let noun = if total == 1 { "tenant" } else { "tenants" };
        let suffix = if self.is_filtered() { " (filtered)" } else { "" };
        format!("{} of {} {}{}", self.visible().len(), total, noun, suffix)
    }

    pub fn display(&self) -> ListDisplay<'_> {
        match &self.phase {
            ListPhase::Loading => ListDisplay::Loading,
            ListPhase::Error(message) => ListDisplay::Error(message),
            ListPhase::Ready | ListPhase::Refreshing => {
                if self.tenants.is_empty() {
                    return ListDisplay::Empty;
                }
                let rows = self.visible();
                if rows.is_empty() {
                    ListDisplay::NoMatches
                } else {
                    ListDisplay::Rows(rows)
                }
            }
        }
    }

    // ---- delete ----

    pub fn pending_delete(&self) -> Option<&DeleteConfirmation> {
        self.pending_delete.as_ref()
    }

    pub fn request_delete(&mut self, id: i64) -> Result<&DeleteConfirmation, ListError> {
        if let Some(pending) = &self.pending_delete {
            return Err(ListError::DeletePending(pending.tenant.id));
        }
        let tenant = self.get(id).cloned().ok_or(ListError::UnknownTenant(id))?;
        let pending = self.pending_delete.insert(DeleteConfirmation {
            tenant,
            deleting: false,
        });
        Ok(&*pending)
    }

    /// Close the confirmation. Refused while the delete call is in flight.
    pub fn cancel_delete(&mut self) -> Result<(), ListError> {
        if let Some(pending) = self.pending_delete.as_ref().filter(|p| p.deleting) {
            return Err(ListError::DeleteInProgress(pending.tenant.id));
        }
        self.pending_delete = None;
        Ok(())
    }

    /// Mark the pending delete as in flight and hand back the id to send
    pub fn confirm_delete(&mut self) -> Result<i64, ListError> {
        let pending = self
            .pending_delete
            .as_mut()
            .ok_or(ListError::NothingToConfirm)?;
        if pending.deleting {
            return Err(ListError::DeleteInProgress(pending.tenant.id));
        }
        pending.deleting = true;
        Ok(pending.tenant.id)
    }

    pub fn finish_delete(&mut self, id: i64, result: Result<DeleteTenantResponse, ClientError>) {
        match result {
            Ok(response) => {
                self.tenants.retain(|t| t.id != id);
                self.toggling.remove(&id);
                if self.pending_delete.as_ref().map(|p| p.tenant.id) == Some(id) {
                    self.pending_delete = None;
                }
                tracing::debug!("Removed tenant {} from list: {}", id, response.message);
            }
            Err(e) => {
                tracing::warn!("Failed to delete tenant {}: {}", id, e);
                if let Some(pending) = self.pending_delete.as_mut().filter(|p| p.tenant.id == id) {
                    pending.deleting = false;
                }
                self.alert = Some(e.to_string());
            }
        }
    }

    pub async fn delete_confirmed(&mut self, api: &dyn TenantApi) -> Result<(), ListError> {
        let id = self.confirm_delete()?;
        let result = api.delete_tenant(id).await;
        self.finish_delete(id, result);
        Ok(())
    }

    // ---- toggle ----

    pub fn is_toggling(&self, id: i64) -> bool {
        self.toggling.contains(&id)
    }

    pub fn toggling_count(&self) -> usize {
        self.toggling.len()
    }

    pub fn begin_toggle(&mut self, id: i64) -> Result<(), ListError> {
        if self.get(id).is_none() {
            return Err(ListError::UnknownTenant(id));
        }
        if !self.toggling.insert(id) {
            return Err(ListError::ToggleInProgress(id));
        }
        Ok(())
    }

    pub fn finish_toggle(&mut self, id: i64, result: Result<TenantRecord, ClientError>) {
        self.toggling.remove(&id);

        let result = result.and_then(|updated| {
            if updated.id == id {
                Ok(updated)
            } else {
                Err(ClientError::InvalidResponse(format!(
                    "expected tenant {} but got tenant {}",
                    id, updated.id
                )))
            }
        });

        match result {
            Ok(updated) => {
                if let Some(slot) = self.tenants.iter_mut().find(|t| t.id == id) {
                    tracing::debug!("Tenant {} is now {}", id, updated.status);
                    *slot = updated;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to toggle tenant {}: {}", id, e);
                self.alert = Some(e.to_string());
            }
        }
    }

    pub async fn toggle(&mut self, api: &dyn TenantApi, id: i64) -> Result<(), ListError> {
        self.begin_toggle(id)?;
        let result = api.toggle_tenant_status(id).await;
        self.finish_toggle(id, result);
        Ok(())
    }

    // ---- alerts ----

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
