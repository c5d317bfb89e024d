/// Operator authentication handlers
///
/// # Endpoints
///
/// - `POST /login` - Verify admin credentials and issue a session token
/// - `POST /logout` - Drop the current session

use salvo::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Envelope, app_state, render_error, render_ok};
use crate::types::AdminError;

/// Request body for login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Missing fields are treated as empty and fail authentication
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub result: bool,
    pub token: String,
}

/// POST /login
///
/// # Request Body
///
/// ```json
/// { "username": "admin", "password": "..." }
/// ```
///
/// # Response
///
/// - 200 OK: `{"data":{"result":true,"token":"..."},"error":{}}`
/// - 401 Unauthorized: `{"data":{"result":false},"error":{"description":"Not authorize"}}`
#[handler]
pub async fn login(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    let body = match req.parse_json::<LoginRequest>().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Invalid login request: {}", e);
            return render_error(res, AdminError::Unauthorized);
        }
    };

    match state.auth_service.login(&body.username, &body.password).await {
        Ok(token) => {
            tracing::info!("User {} logged in successfully", body.username);
            res.render(Json(Envelope::ok(LoginData {
                result: true,
                token: token.token,
            })));
        }
        Err(e) => {
            if matches!(e, AdminError::Unauthorized) {
                tracing::warn!("Failed login attempt for user: {}", body.username);
            }
            render_error(res, e);
        }
    }
}

/// POST /logout
///
/// Requires a valid session; afterwards no token authorizes until the next login.
#[handler]
pub async fn logout(depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    match state.auth_service.logout().await {
        Ok(()) => {
            tracing::info!("User {} logged out", state.auth_service.admin_username());
            render_ok(res);
        }
        Err(e) => render_error(res, e),
    }
}
