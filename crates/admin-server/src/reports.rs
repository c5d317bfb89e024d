/// Spreadsheet reports
///
/// Writes hotspot user exports as `.xlsx` workbooks into a fixed directory
/// and reads them back by name. Only names produced by [`ReportStore::file_name_for`]
/// are ever resolved against the directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_xlsxwriter::{Format, Workbook};

use crate::types::{AdminError, HotspotUser};

/// Worksheet name inside every report
pub const SHEET_NAME: &str = "Users";

/// Header row, in column order
pub const HEADERS: [&str; 3] = ["Username", "Password", "Profile"];

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

static REPORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^report-[0-9]{1,20}\.xlsx$").expect("report name pattern is valid")
});

#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `report-<epoch milliseconds>.xlsx`
    pub fn file_name_for(at: DateTime<Utc>) -> String {
        format!("report-{}.xlsx", at.timestamp_millis())
    }

    /// Whether `name` has the shape of a generated report name
    pub fn is_report_name(name: &str) -> bool {
        REPORT_NAME.is_match(name)
    }

    /// Builds the workbook and writes it into the report directory
    ///
    /// Blocking; callers on the async runtime should run it with `spawn_blocking`.
    ///
    /// # Returns
    /// The generated file name (not the full path)
    pub fn write_users(&self, users: &[HotspotUser], at: DateTime<Utc>) -> Result<String, AdminError> {
        std::fs::create_dir_all(&self.dir)?;

        let file_name = Self::file_name_for(at);
        let mut workbook = build_workbook(users)?;
        workbook.save(self.dir.join(&file_name))?;
        Ok(file_name)
    }

    /// Reads a previously generated report
    ///
    /// # Errors
    /// * `AdminError::NotFound` - the name is not a report name, or no such file exists
    /// * `AdminError::Io` - any other read failure
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, AdminError> {
        if !Self::is_report_name(name) {
            return Err(AdminError::NotFound(name.to_string()));
        }
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AdminError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn build_workbook(users: &[HotspotUser]) -> Result<Workbook, AdminError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (idx, user) in users.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &user.name)?;
        worksheet.write_string(row, 1, &user.password)?;
        worksheet.write_string(row, 2, &user.profile)?;
    }
    Ok(workbook)
}
