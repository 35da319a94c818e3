//! Backend client: the only place the console talks HTTP.

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::ConsoleConfig;
use crate::error::ClientError;
use crate::models::{
    DeleteTenantResponse, HealthStatus, ServiceInfo, TenantCreateRequest, TenantCreateResult,
    TenantRecord,
};

/// Operations the console performs against the super-admin backend
#[async_trait]
pub trait TenantApi: Send + Sync {
    /// Configured backend address, used in operator-facing messages
    fn base_url(&self) -> &str;

    async fn create_tenant(
        &self,
        request: &TenantCreateRequest,
    ) -> Result<TenantCreateResult, ClientError>;

    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, ClientError>;

    /// Removes the tenant record only; the tenant's database is left in place
    async fn delete_tenant(&self, id: i64) -> Result<DeleteTenantResponse, ClientError>;

    async fn toggle_tenant_status(&self, id: i64) -> Result<TenantRecord, ClientError>;

    async fn health_check(&self) -> Result<HealthStatus, ClientError>;

    async fn service_info(&self) -> Result<ServiceInfo, ClientError>;
}

pub struct HttpTenantClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTenantClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self, ClientError> {
        Self::with_timeout(&config.api_url, config.request_timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.normalize(e))?;
        tracing::debug!("{} {} -> {}", method, url, response.status());
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned + Send>(&self, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.normalize(e))?;

        if !status.is_success() {
            let err = ClientError::from_error_body(status.as_u16(), &body);
            tracing::warn!("Backend returned {}: {}", status, err);
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Fold reqwest failures into the console's error taxonomy
    fn normalize(&self, err: reqwest::Error) -> ClientError {
        if err.is_connect() || err.is_timeout() || (err.is_request() && err.status().is_none()) {
            tracing::warn!("Backend at {} did not respond: {}", self.base_url, err);
            return ClientError::unreachable(&self.base_url);
        }
        if err.is_decode() {
            return ClientError::InvalidResponse(err.to_string());
        }
        tracing::error!("Unexpected transport failure talking to {}: {}", self.base_url, err);
        ClientError::Network(err)
    }
}

#[async_trait]
impl TenantApi for HttpTenantClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_tenant(
        &self,
        request: &TenantCreateRequest,
    ) -> Result<TenantCreateResult, ClientError> {
        let result: TenantCreateResult = self
            .send(Method::POST, "/super-admin/create-tenant", Some(request))
            .await?;
        result.validate()?;
        tracing::info!(
            "Created tenant {} (database {})",
            result.tenant_id,
            result.tenant_db
        );
        Ok(result)
    }

    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, ClientError> {
        self.send::<(), _>(Method::GET, "/super-admin/tenants", None)
            .await
    }

    async fn delete_tenant(&self, id: i64) -> Result<DeleteTenantResponse, ClientError> {
        let path = format!("/super-admin/tenants/{}", id);
        let response: DeleteTenantResponse = self.send::<(), _>(Method::DELETE, &path, None).await?;
        tracing::info!("Deleted tenant record {} ({})", response.tenant_id, response.db_name);
        Ok(response)
    }

    async fn toggle_tenant_status(&self, id: i64) -> Result<TenantRecord, ClientError> {
        let path = format!("/super-admin/tenants/{}/toggle-status", id);
        let record: TenantRecord = self.send::<(), _>(Method::PATCH, &path, None).await?;
        if record.id != id {
            return Err(ClientError::InvalidResponse(format!(
                "toggled tenant {} but backend returned tenant {}",
                id, record.id
            )));
        }
        Ok(record)
    }

    async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        self.send::<(), _>(Method::GET, "/health", None).await
    }

    async fn service_info(&self) -> Result<ServiceInfo, ClientError> {
        self.send::<(), _>(Method::GET, "/", None).await
    }
}
