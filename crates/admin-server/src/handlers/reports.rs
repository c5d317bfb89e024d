/// Report handlers
///
/// # Endpoints
///
/// - `GET /export` - Write all hotspot users into a new workbook (token required)
/// - `GET /download/{filename}` - Fetch a generated workbook (no token)

use salvo::http::header::{self, HeaderValue};
use salvo::prelude::*;
use serde::Serialize;

use super::{app_state, render_error};
use crate::reports::XLSX_CONTENT_TYPE;
use crate::types::AdminError;

/// Export answers outside the usual envelope: `{"result":true,"file":"report-….xlsx"}`
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub result: bool,
    pub file: String,
}

/// GET /export
#[handler]
pub async fn export_users(depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    match state.hotspot_service.export_users().await {
        Ok(file) => res.render(Json(ExportResponse { result: true, file })),
        Err(e) => render_error(res, e),
    }
}

/// GET /download/{filename}
///
/// Only names of the form `report-<digits>.xlsx` are served.
#[handler]
pub async fn download(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match app_state(depot) {
        Ok(state) => state,
        Err(e) => return render_error(res, e),
    };

    let name = req.param::<String>("filename").unwrap_or_default();
    let bytes = match state.hotspot_service.reports().read(&name).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("download of {:?} failed: {}", name, e);
            return render_error(res, e);
        }
    };

    let headers = res.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Err(e) = res.write_body(bytes) {
        render_error(res, AdminError::Io(e.to_string()));
    }
}
