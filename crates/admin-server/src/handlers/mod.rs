/// HTTP Handlers for the Admin Gateway
///
/// This module contains the request handlers, the shared application state,
/// and the response envelope every JSON endpoint answers with:
///
/// ```json
/// { "data": { "result": false }, "error": { "description": "Not authorize" } }
/// ```

pub mod auth;
pub mod reports;
pub mod users;

use std::sync::Arc;

use hotspot_routeros::{RestConnector, RouterConnector, RouterLink};
use salvo::prelude::*;
use serde::Serialize;

use crate::auth_service::AuthService;
use crate::config::GatewayConfig;
use crate::credential_store::{CredentialStore, MemoryCredentialStore};
use crate::hotspot_service::HotspotService;
use crate::reports::ReportStore;
use crate::types::AdminError;

/// Shared application state for handlers
///
/// Services are wrapped in Arc so the state is cheap to clone into the depot.
#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub hotspot_service: Arc<HotspotService>,
}

impl AppState {
    /// Wires the services against an arbitrary router connector and credential store
    pub fn new(
        config: &GatewayConfig,
        connector: Arc<dyn RouterConnector>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let auth_service = AuthService::new(config.admin.clone(), store, config.session_ttl());
        let hotspot_service = HotspotService::new(
            RouterLink::new(connector),
            Arc::new(ReportStore::new(config.report_dir.clone())),
            config.import_pacing(),
        );
        Self {
            auth_service: Arc::new(auth_service),
            hotspot_service: Arc::new(hotspot_service),
        }
    }

    /// Production wiring: REST transport and in-memory credential store
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AdminError> {
        let connector = RestConnector::new(&config.router)?;
        Ok(Self::new(
            config,
            Arc::new(connector),
            Arc::new(MemoryCredentialStore::new()),
        ))
    }
}

/// Hoop placing the [`AppState`] into every request's depot
pub struct InjectState(pub AppState);

#[handler]
impl InjectState {
    async fn handle(&self, depot: &mut Depot) {
        depot.inject(self.0.clone());
    }
}

pub fn app_state(depot: &Depot) -> Result<AppState, AdminError> {
    depot
        .obtain::<AppState>()
        .cloned()
        .map_err(|_| AdminError::Internal("application state not initialized".to_string()))
}

// ===== Response Envelope =====

/// `error` member of the envelope; serializes as `{}` on success
#[derive(Debug, Default, Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub error: ErrorBody,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            error: ErrorBody::default(),
        }
    }
}

/// Bare `{result}` payload
#[derive(Debug, Serialize)]
pub struct ResultData {
    pub result: bool,
}

pub fn render_ok(res: &mut Response) {
    res.render(Json(Envelope::ok(ResultData { result: true })));
}

/// Renders `err` as the failure envelope with a matching status code
pub fn render_error(res: &mut Response, err: AdminError) {
    let status = match &err {
        AdminError::Unauthorized | AdminError::SessionExpired => StatusCode::UNAUTHORIZED,
        AdminError::InvalidFormat | AdminError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AdminError::NotFound(_) => StatusCode::NOT_FOUND,
        AdminError::Router(_) => StatusCode::BAD_GATEWAY,
        AdminError::Internal(_)
        | AdminError::Spreadsheet(_)
        | AdminError::Io(_)
        | AdminError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {}", err);
    }

    res.status_code(status);
    res.render(Json(Envelope {
        data: ResultData { result: false },
        error: ErrorBody {
            description: Some(err.description()),
        },
    }));
}

/// Token from the `authorization` header; a `Bearer ` prefix is optional
pub fn request_token(req: &Request) -> Option<String> {
    let value = req.headers().get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    Some(token.to_string())
}

/// Rejects the request unless it carries the current session token
#[handler]
pub async fn require_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let result = match app_state(depot) {
        Ok(state) => {
            let token = request_token(req).unwrap_or_default();
            state.auth_service.authorize(&token).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::warn!("rejected {} {}: {}", req.method(), req.uri().path(), e);
        render_error(res, e);
        ctrl.skip_rest();
    }
}

/// Health check endpoint
#[handler]
pub async fn health_check() -> &'static str {
    "OK"
}
