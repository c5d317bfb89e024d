/// Core types for the hotspot admin gateway
///
/// This module defines the types shared by the services and handlers:
/// - Session tokens issued to the operator
/// - Hotspot user projections of router records
/// - Import rows and import summaries
/// - The gateway error taxonomy

use chrono::{DateTime, Utc};
use hotspot_routeros::{Record, RouterError};
use serde::{Deserialize, Serialize};

/// Session token returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Opaque token the client echoes in the `authorization` header
    pub token: String,
    /// Expiration timestamp, `None` when sessions never expire
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Typed projection of a router hotspot user record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotUser {
    /// Router-assigned internal id (`.id`, e.g. `*1A`)
    pub id: String,
    pub name: String,
    pub password: String,
    pub profile: String,
}

impl HotspotUser {
    pub fn from_record(record: &Record) -> Self {
        let field = |key: &str| {
            record
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        Self {
            id: field(".id"),
            name: field("name"),
            password: field("password"),
            profile: field("profile"),
        }
    }
}

/// Fields submitted to create a hotspot user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHotspotUser {
    pub name: String,
    pub password: String,
    pub profile: String,
}

/// One line of an uploaded import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the uploaded file
    pub line: u64,
    pub user: NewHotspotUser,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub added: usize,
    pub failed: usize,
}

/// Error type for the gateway
///
/// Every handler converts these into the `{data:{result:false}, error:{description}}`
/// envelope; see [`AdminError::description`] for what the client gets to see.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // ===== Auth Errors =====
    /// Bad credentials or a token that does not match the stored one
    #[error("Not authorize")]
    Unauthorized,

    /// Stored session token has expired
    #[error("Session expired")]
    SessionExpired,

    // ===== Router Errors =====
    /// The router rejected a command; message passed through verbatim
    #[error("{0}")]
    Router(String),

    /// Connection-level failure, logged server side only
    #[error("Internal error: {0}")]
    Internal(String),

    // ===== Request Errors =====
    /// Uploaded file is not comma-separated text
    #[error("failure: file is not csv format")]
    InvalidFormat,

    /// Request body could not be parsed
    #[error("{0}")]
    InvalidRequest(String),

    // ===== Report Errors =====
    /// Requested report does not exist or its name is not a report name
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Workbook could not be built or written
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(String),

    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdminError {
    pub const GENERIC_FAILURE: &'static str = "failure: somthing invalid, call administrator";

    /// Text placed in the response envelope's `error.description`
    pub fn description(&self) -> String {
        match self {
            AdminError::Unauthorized | AdminError::SessionExpired => "Not authorize".to_string(),
            AdminError::Router(msg) | AdminError::InvalidRequest(msg) => msg.clone(),
            AdminError::InvalidFormat => self.to_string(),
            AdminError::NotFound(_) => "report not found".to_string(),
            AdminError::Io(msg) => msg.clone(),
            AdminError::Internal(_) | AdminError::Spreadsheet(_) | AdminError::Config(_) => {
                Self::GENERIC_FAILURE.to_string()
            }
        }
    }
}

impl From<RouterError> for AdminError {
    fn from(err: RouterError) -> Self {
        if err.is_connect() {
            AdminError::Internal(err.to_string())
        } else {
            AdminError::Router(err.message())
        }
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::Io(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AdminError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AdminError::Spreadsheet(err.to_string())
    }
}

impl From<csv::Error> for AdminError {
    fn from(err: csv::Error) -> Self {
        AdminError::InvalidRequest(format!("failure: unreadable csv: {}", err))
    }
}

impl From<figment::Error> for AdminError {
    fn from(err: figment::Error) -> Self {
        AdminError::Config(err.to_string())
    }
}
