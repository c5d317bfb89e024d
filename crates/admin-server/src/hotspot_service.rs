/// Hotspot user operations
///
/// Each operation is one call on the shared [`RouterLink`]: connect, issue
/// the hotspot command, close. Bulk import is the only operation that issues
/// several commands, all on one session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hotspot_routeros::{Record, RouterLink, hotspot};

use crate::reports::ReportStore;
use crate::types::{AdminError, HotspotUser, ImportRow, ImportSummary, NewHotspotUser};

#[derive(Debug, Clone)]
pub struct HotspotService {
    link: RouterLink,
    reports: Arc<ReportStore>,
    import_pacing: Duration,
}

impl HotspotService {
    pub fn new(link: RouterLink, reports: Arc<ReportStore>, import_pacing: Duration) -> Self {
        Self {
            link,
            reports,
            import_pacing,
        }
    }

    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    /// Lists hotspot users as the router reports them
    ///
    /// With `normalize`, every record also gets an `id` field copied from
    /// the router's `.id`.
    pub async fn list_users(&self, normalize: bool) -> Result<Vec<Record>, AdminError> {
        let mut records = self
            .link
            .run(&hotspot::print_users())
            .await
            .map_err(log_router_error)?;

        if normalize {
            for record in &mut records {
                if let Some(id) = record.get(".id").cloned() {
                    record.insert("id".to_string(), id);
                }
            }
        }
        Ok(records)
    }

    pub async fn add_user(&self, user: &NewHotspotUser) -> Result<(), AdminError> {
        self.link
            .run(&hotspot::add_user(&user.name, &user.password, &user.profile))
            .await
            .map_err(log_router_error)?;
        tracing::info!("hotspot user {} added", user.name);
        Ok(())
    }

    /// `id` is the router's identifier for the user (`*1A`)
    pub async fn remove_user(&self, id: &str) -> Result<(), AdminError> {
        self.link
            .run(&hotspot::remove_user(id))
            .await
            .map_err(log_router_error)?;
        tracing::info!("hotspot user {} removed", id);
        Ok(())
    }

    /// Adds every row on one router session, in order, pacing between rows
    ///
    /// Row failures are logged and counted, never returned. Only a failure
    /// to open the session is an error.
    pub async fn import_users(&self, rows: &[ImportRow]) -> Result<ImportSummary, AdminError> {
        let commands: Vec<_> = rows
            .iter()
            .map(|row| hotspot::add_user(&row.user.name, &row.user.password, &row.user.profile))
            .collect();

        let outcome = self
            .link
            .run_each(&commands, self.import_pacing)
            .await
            .map_err(log_router_error)?;

        for (row, result) in rows.iter().zip(&outcome.results) {
            if let Err(e) = result {
                tracing::warn!("import line {} ({}) failed: {}", row.line, row.user.name, e);
            }
        }

        Ok(ImportSummary {
            total: rows.len(),
            added: outcome.succeeded(),
            failed: outcome.failed(),
        })
    }

    /// Writes all hotspot users into a new report and returns its file name
    pub async fn export_users(&self) -> Result<String, AdminError> {
        let users: Vec<HotspotUser> = self
            .list_users(false)
            .await?
            .iter()
            .map(HotspotUser::from_record)
            .collect();

        let reports = self.reports.clone();
        let file_name = tokio::task::spawn_blocking(move || reports.write_users(&users, Utc::now()))
            .await
            .map_err(|e| AdminError::Internal(format!("report task failed: {}", e)))??;

        tracing::info!("report {} written to {}", file_name, self.reports.dir().display());
        Ok(file_name)
    }
}

fn log_router_error(err: hotspot_routeros::RouterError) -> AdminError {
    if err.is_connect() {
        tracing::error!("router unavailable: {}", err);
    }
    err.into()
}
