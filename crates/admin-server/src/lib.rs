/// Hotspot Admin Gateway Library
///
/// This crate provides an administrative HTTP gateway in front of a RouterOS
/// router's hotspot user directory. It authenticates a single operator and
/// proxies a small set of operations to the router:
///
/// - Operator login with a single active session token
/// - Listing, adding and removing hotspot users
/// - Best-effort bulk import from CSV
/// - Export to `.xlsx` reports and report download

// Core types used across the gateway
pub mod types;
pub use types::{AdminError, HotspotUser, ImportRow, ImportSummary, NewHotspotUser, SessionToken};

// Configuration loading (figment: defaults, TOML, environment)
pub mod config;
pub use config::{AdminIdentity, GatewayConfig};

// Session token storage keyed by admin username
pub mod credential_store;
pub use credential_store::{CredentialStore, MemoryCredentialStore};

// Auth Gate: login and token authorization
pub mod auth_service;
pub use auth_service::AuthService;

// Hotspot user operations on the router link
pub mod hotspot_service;
pub use hotspot_service::HotspotService;

// CSV import parsing
pub mod import;

// Spreadsheet reports on local disk
pub mod reports;
pub use reports::ReportStore;

// HTTP handlers for REST API endpoints
pub mod handlers;
pub use handlers::AppState;

// Route tree and service assembly
pub mod routes;
