use crate::error::ClientError;
use crate::models::{
    DeleteTenantResponse, HealthStatus, TenantCreateResult, TenantRecord,
};

use super::list::RefreshTicket;

/// Everything that can change console state after the fact: timer expiries and
/// completed backend calls. The shell applies them one at a time.
#[derive(Debug)]
pub enum ConsoleEvent {
    SuccessBannerExpired { generation: u64 },
    /// `tenant_id` names the result card that scheduled it
    CopyAckExpired { tenant_id: i64, generation: u64 },
    HealthChecked(Result<HealthStatus, ClientError>),
    TenantsFetched {
        ticket: RefreshTicket,
        result: Result<Vec<TenantRecord>, ClientError>,
    },
    TenantToggled {
        id: i64,
        result: Result<TenantRecord, ClientError>,
    },
    TenantDeleted {
        id: i64,
        result: Result<DeleteTenantResponse, ClientError>,
    },
    TenantCreated(Result<TenantCreateResult, ClientError>),
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<ConsoleEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<ConsoleEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
