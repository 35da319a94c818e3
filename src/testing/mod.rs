use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::TenantApi;
use crate::error::ClientError;
use crate::models::{
    DeleteTenantResponse, HealthStatus, ServiceInfo, TenantCreateRequest, TenantCreateResult,
    TenantRecord, TenantStatus,
};

pub const FAKE_BASE_URL: &str = "http://fake-backend:8001";

/// In-memory backend for exercising views without HTTP
pub struct FakeTenantApi {
    tenants: Mutex<Vec<TenantRecord>>,
    next_id: Mutex<i64>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
    offline: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeTenantApi {
    pub fn new() -> Self {
        Self::with_tenants(Vec::new())
    }

    pub fn with_tenants(tenants: Vec<TenantRecord>) -> Self {
        let next_id = tenants.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            tenants: Mutex::new(tenants),
            next_id: Mutex::new(next_id),
            failures: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make the next call of `op` fail with a `{detail}` server error
    pub fn fail_next(&self, op: &'static str, status: u16, detail: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, (status, detail.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<TenantRecord> {
        self.tenants.lock().unwrap().clone()
    }

    fn check(&self, op: &'static str) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::unreachable(FAKE_BASE_URL));
        }
        match self.failures.lock().unwrap().remove(op) {
            Some((status, message)) => Err(ClientError::Server { status, message }),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ClientError::Server {
            status: 404,
            message: "Tenant not found".to_string(),
        }
    }
}

#[async_trait]
impl TenantApi for FakeTenantApi {
    fn base_url(&self) -> &str {
        FAKE_BASE_URL
    }

    async fn create_tenant(
        &self,
        request: &TenantCreateRequest,
    ) -> Result<TenantCreateResult, ClientError> {
        self.check("create")?;
        let mut tenants = self.tenants.lock().unwrap();
        if tenants.iter().any(|t| t.name == request.name) {
            return Err(ClientError::Server {
                status: 409,
                message: "Tenant already exists".to_string(),
            });
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let mut record = tenant(id, &request.name, TenantStatus::Active);
        record.admin_email = request.admin_email.clone();
        record.company_name = Some(request.company_name.clone());
        let result = TenantCreateResult {
            tenant_id: id,
            tenant_db: record.db_name.clone(),
            admin_email: request.admin_email.clone(),
            initial_password: format!("Pw!{:08}x", id * 7919),
        };
        tenants.push(record);
        Ok(result)
    }

    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, ClientError> {
        self.check("list")?;
        Ok(self.snapshot())
    }

    async fn delete_tenant(&self, id: i64) -> Result<DeleteTenantResponse, ClientError> {
        self.check("delete")?;
        let mut tenants = self.tenants.lock().unwrap();
        let index = tenants
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        let removed = tenants.remove(index);
        Ok(DeleteTenantResponse {
            message: format!("Tenant '{}' deleted successfully", removed.name),
            tenant_id: removed.id,
            db_name: removed.db_name,
        })
    }

    async fn toggle_tenant_status(&self, id: i64) -> Result<TenantRecord, ClientError> {
        self.check("toggle")?;
        let mut tenants = self.tenants.lock().unwrap();
        let record = tenants
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        record.status = record.status.toggled();
        Ok(record.clone())
    }

    async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        self.check("health")?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
        })
    }

    async fn service_info(&self) -> Result<ServiceInfo, ClientError> {
        self.check("info")?;
        Ok(ServiceInfo {
            service: "super_admin_service".to_string(),
        })
    }
}

pub fn tenant(id: i64, name: &str, status: TenantStatus) -> TenantRecord {
    let slug = name.to_lowercase().replace(' ', "_");
    TenantRecord {
        id,
        name: name.to_string(),
        company_name: None,
        db_name: format!("tenant_{}_17362000{:02}", slug, id),
        db_host: "localhost".to_string(),
        db_port: "5432".to_string(),
        db_user: "postgres".to_string(),
        admin_email: format!("admin@{}.com", slug),
        status,
        created_at: Utc.with_ymd_and_hms(2026, 1, 6, 22, 45, 0).unwrap(),
    }
}

/// Five tenants, ids 1..=5; Acme, Initech and Hooli active, Globex and Umbrella inactive
pub fn sample_tenants() -> Vec<TenantRecord> {
    let mut initech = tenant(3, "Initech", TenantStatus::Active);
    initech.admin_email = "ops@initech.io".to_string();
    vec![
        tenant(1, "Acme", TenantStatus::Active),
        tenant(2, "Globex", TenantStatus::Inactive),
        initech,
        tenant(4, "Umbrella", TenantStatus::Inactive),
        tenant(5, "Hooli", TenantStatus::Active),
    ]
}
