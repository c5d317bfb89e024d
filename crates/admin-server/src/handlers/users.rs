/// Hotspot user handlers
///
/// # Endpoints
///
/// - `GET /users` - List hotspot users
/// - `POST /users/add` - Create a hotspot user
/// - `DELETE /users/{id}` - Remove a hotspot user by router id
/// - `POST /import` - Bulk-create users from an uploaded CSV file
///
/// All of them require the session token in the `authorization` header.

use hotspot_routeros::Record;
use salvo::prelude::*;
use serde::Serialize;

use super::{Envelope, app_state, render_error, render_ok};
use crate::import;
use crate::types::{AdminError, NewHotspotUser};

#[derive(Debug, Serialize)]
pub struct ItemsData {
    pub result: bool,
    pub items: Vec<Record>,
}

/// GET /users
///
/// Items are the router's records plus an `id` copied from `.id`.
#[handler]
pub async fn list_users(depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    match state.hotspot_service.list_users(true).await {
        Ok(items) => res.render(Json(Envelope::ok(ItemsData {
            result: true,
            items,
        }))),
        Err(e) => render_error(res, e),
    }
}

/// POST /users/add
///
/// # Request Body
///
/// ```json
/// { "name": "guest01", "password": "pw", "profile": "default" }
/// ```
///
/// Field contents are not validated here; the router rejects what it does not accept.
#[handler]
pub async fn add_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    let body = match req.parse_json::<NewHotspotUser>().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Invalid add user request: {}", e);
            return render_error(res, AdminError::InvalidRequest("Invalid request body".to_string()));
        }
    };

    match state.hotspot_service.add_user(&body).await {
        Ok(()) => render_ok(res),
        Err(e) => render_error(res, e),
    }
}

/// DELETE /users/{id}
#[handler]
pub async fn remove_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    let Some(id) = req.param::<String>("id") else {
        return render_error(res, AdminError::InvalidRequest("Missing user id".to_string()));
    };

    match state.hotspot_service.remove_user(&id).await {
        Ok(()) => render_ok(res),
        Err(e) => render_error(res, e),
    }
}

/// POST /import
///
/// Multipart upload with a `file` field of type `text/csv`, one
/// `name,password,profile` per line. The rows are added in the background;
/// the response only confirms the upload was accepted.
#[handler]
pub async fn import_users(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    let Some(file) = req.file("file").await else {
        return render_error(res, AdminError::InvalidFormat);
    };
    let is_csv = file
        .content_type()
        .as_ref()
        .is_some_and(|mime| import::is_csv_mime(mime));
    if !is_csv {
        return render_error(res, AdminError::InvalidFormat);
    }

    let content = match tokio::fs::read(file.path()).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => return render_error(res, e.into()),
    };
    let rows = match import::parse_rows(&content) {
        Ok(rows) => rows,
        Err(e) => return render_error(res, e),
    };

    tracing::info!("importing {} hotspot user(s)", rows.len());
    let service = state.hotspot_service.clone();
    tokio::spawn(async move {
        match service.import_users(&rows).await {
            Ok(summary) => tracing::info!(
                "import finished: {} added, {} failed of {}",
                summary.added,
                summary.failed,
                summary.total
            ),
            Err(e) => tracing::error!("import aborted: {}", e),
        }
    });

    render_ok(res);
}
