use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Invalid {field} in response: {reason}")]
    InvalidResponse { field: &'static str, reason: String },
}

/// Body of `POST /super-admin/create-tenant`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCreateRequest {
    pub name: String,
    pub company_name: String,
    pub admin_email: String,
}

impl TenantCreateRequest {
    pub fn new(
        name: impl Into<String>,
        company_name: impl Into<String>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            company_name: company_name.into(),
            admin_email: admin_email.into(),
        }
    }

    /// Same checks a browser applies to `required` inputs and `type=email`;
    /// everything else is the backend's call
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("Tenant name"));
        }
        if self.company_name.is_empty() {
            return Err(ValidationError::MissingField("Company name"));
        }
        if self.admin_email.is_empty() {
            return Err(ValidationError::MissingField("Admin email"));
        }
        if !is_plausible_email(&self.admin_email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// `local@domain` with no whitespace; dotless domains such as `localhost` pass
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.split('.').all(|label| !label.is_empty())
        }
        _ => false,
    }
}

/// One-time credential payload returned by tenant creation.
///
/// `initial_password` is never retrievable again, so it is kept out of
/// `Debug` output to stay out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCreateResult {
    pub tenant_id: i64,
    pub tenant_db: String,
    pub admin_email: String,
    pub initial_password: String,
}

impl TenantCreateResult {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tenant_db.trim().is_empty() {
            return Err(ValidationError::InvalidResponse {
                field: "tenant_db",
                reason: "empty database name".to_string(),
            });
        }
        if self.initial_password.is_empty() {
            return Err(ValidationError::InvalidResponse {
                field: "initial_password",
                reason: "empty password".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for TenantCreateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantCreateResult")
            .field("tenant_id", &self.tenant_id)
            .field("tenant_db", &self.tenant_db)
            .field("admin_email", &self.admin_email)
            .field("initial_password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TenantStatus::Active => TenantStatus::Inactive,
            TenantStatus::Inactive => TenantStatus::Active,
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable tenant row as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub db_name: String,
    pub db_host: String,
    pub db_port: String,
    pub db_user: String,
    pub admin_email: String,
    pub status: TenantStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TenantRecord {
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }

    /// Case-insensitive substring match over name, database, admin email and id.
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.db_name.to_lowercase().contains(needle)
            || self.admin_email.to_lowercase().contains(needle)
            || self.id.to_string().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTenantResponse {
    pub message: String,
    pub tenant_id: i64,
    pub db_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
}

/// Non-2xx body. `detail` is a plain string for handled errors and a list of
/// `{msg, loc, ..}` objects for request validation failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Status filter applied before the text search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn admits(&self, status: TenantStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == TenantStatus::Active,
            StatusFilter::Inactive => status == TenantStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" | "disabled" => Ok(StatusFilter::Inactive),
            other => Err(format!(
                "unknown status filter '{}' (expected all, active or inactive)",
                other
            )),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts RFC 3339 as well as offset-less ISO 8601, which is read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(format!("invalid timestamp '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_json(status: &str) -> serde_json::Value {
        json!({
            "id": 7,
            "name": "Acme",
            "db_name": "tenant_acme_1736200000",
            "db_host": "localhost",
            "db_port": "5432",
            "db_user": "postgres",
            "admin_email": "Admin@Acme.com",
            "status": status,
            "created_at": "2026-01-06T22:45:00.123456"
        })
    }

    #[test]
    fn record_parses_naive_timestamp_as_utc() {
        let record: TenantRecord = serde_json::from_value(record_json("active")).unwrap();
        assert_eq!(record.status, TenantStatus::Active);
        assert_eq!(record.created_at.to_rfc3339(), "2026-01-06T22:45:00.123456+00:00");
        assert!(record.company_name.is_none());
    }

    #[test]
    fn record_rejects_unknown_status() {
        let parsed = serde_json::from_value::<TenantRecord>(record_json("suspended"));
        assert!(parsed.is_err());
    }

    #[test]
    fn record_rejects_missing_fields() {
        let mut value = record_json("active");
        value.as_object_mut().unwrap().remove("db_name");
        assert!(serde_json::from_value::<TenantRecord>(value).is_err());
    }

    #[test]
    fn query_matches_each_searchable_field() {
        let record: TenantRecord = serde_json::from_value(record_json("inactive")).unwrap();
        assert!(record.matches_query("acm"));
        assert!(record.matches_query("1736200000"));
        assert!(record.matches_query("admin@acme"));
        assert!(record.matches_query("7"));
        assert!(!record.matches_query("postgres"));
        assert!(!record.matches_query("localhost"));
    }

    #[test]
    fn create_request_validation() {
        assert!(TenantCreateRequest::new("Acme", "Acme", "a@acme.com").validate().is_ok());
        assert_eq!(
            TenantCreateRequest::new("", "Acme", "a@acme.com").validate(),
            Err(ValidationError::MissingField("Tenant name"))
        );
        assert_eq!(
            TenantCreateRequest::new("Acme", "", "a@acme.com").validate(),
            Err(ValidationError::MissingField("Company name"))
        );
        for bad in ["acme.com", "a@b@c.com", "a @acme.com", "@acme.com", "a@", "a@.acme.com", "a@acme..com"] {
            assert_eq!(
                TenantCreateRequest::new("Acme", "Acme", bad).validate(),
                Err(ValidationError::InvalidEmail),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn create_request_follows_browser_form_rules() {
        // `required` only rejects an empty value
        assert!(TenantCreateRequest::new("  ", "Acme", "a@acme.com").validate().is_ok());
        // `type=email` accepts single-label domains
        assert!(TenantCreateRequest::new("Acme", "Acme", "a@localhost").validate().is_ok());
    }

    #[test]
    fn create_result_debug_redacts_password() {
        let result = TenantCreateResult {
            tenant_id: 1,
            tenant_db: "tenant_acme".into(),
            admin_email: "a@acme.com".into(),
            initial_password: "s3cr3t-Pa55".into(),
        };
        let rendered = format!("{:?}", result);
        assert!(!rendered.contains("s3cr3t-Pa55"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn create_result_rejects_empty_password() {
        let result = TenantCreateResult {
            tenant_id: 1,
            tenant_db: "tenant_acme".into(),
            admin_email: "a@acme.com".into(),
            initial_password: String::new(),
        };
        assert!(result.validate().is_err());
    }

    #[test]
    fn error_body_flattens_validation_list() {
        let body: ErrorBody = serde_json::from_value(json!({
            "detail": [
                {"loc": ["body", "admin_email"], "msg": "value is not a valid email address"},
                {"loc": ["body", "name"], "msg": "field required"}
            ]
        }))
        .unwrap();
        assert_eq!(
            body.message().as_deref(),
            Some("value is not a valid email address; field required")
        );

        let plain: ErrorBody = serde_json::from_value(json!({"detail": "Tenant already exists"})).unwrap();
        assert_eq!(plain.message().as_deref(), Some("Tenant already exists"));

        let empty: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.message().is_none());
    }

    #[test]
    fn status_filter_parsing() {
        assert_eq!("Active".parse::<StatusFilter>(), Ok(StatusFilter::Active));
        assert_eq!("disabled".parse::<StatusFilter>(), Ok(StatusFilter::Inactive));
        assert!("paused".parse::<StatusFilter>().is_err());
        assert!(StatusFilter::All.admits(TenantStatus::Inactive));
        assert!(!StatusFilter::Active.admits(TenantStatus::Inactive));
    }
}
