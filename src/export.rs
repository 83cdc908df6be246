// src/export.rs
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

use crate::alert::AlertSink;
use crate::backend::ResultsBackend;
use crate::cancel::{CancelScope, CancelToken};
use crate::errors::{ExtractError, Result};
use crate::models::{RawStudentRecord, ResultSet, Summary};
use crate::normalize::status_to_backend;
use crate::observe::{Event, Observer};

pub const FILE_PREFIX: &str = "engineering_results";

/// The two report artifacts the backend can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Excel,
    Pdf,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 2] = [ReportFormat::Excel, ReportFormat::Pdf];

    pub fn endpoint(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "/api/download/excel",
            ReportFormat::Pdf => "/api/download/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn failure_alert(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "Failed to download Excel file.",
            ReportFormat::Pdf => "Failed to download PDF file.",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Excel => write!(f, "Excel"),
            ReportFormat::Pdf => write!(f, "PDF"),
        }
    }
}

/// Request body for both report endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPayload {
    pub results: Vec<RawStudentRecord>,
    pub summary: Summary,
}

impl ExportPayload {
    /// Converts the view model back into the backend's wire shape.
    pub fn from_results(results: &ResultSet) -> Self {
        Self {
            results: results
                .iter()
                .map(|r| RawStudentRecord {
                    roll_number: r.roll_number.clone(),
                    cgpa: r.cgpa.clone(),
                    status: status_to_backend(r.status).to_string(),
                })
                .collect(),
            summary: Summary::tally(results.as_slice()),
        }
    }
}

/// `engineering_results_<YYYY-MM-DD>.<ext>`
pub fn report_filename(format: ReportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        FILE_PREFIX,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Name for the `n`-th attempt at saving `filename`: the name itself first,
/// then ` (1)`, ` (2)`, ... before the extension.
pub fn numbered_name(filename: &str, n: usize) -> String {
    if n == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem} ({n}).{ext}"),
        None => format!("{filename} ({n})"),
    }
}

/// Writes `bytes` under the first free numbered variant of `filename` in
/// `dir`. The file is created exclusively, so an existing file is never
/// overwritten, even by a concurrent save of the same name.
pub async fn save_new(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let mut n = 0;
    loop {
        let path = dir.join(numbered_name(filename, n));
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;

        match opened {
            Ok(mut file) => {
                file.write_all(bytes).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Requests rendered reports and saves them as downloads.
///
/// Takes the result set by shared reference: a failed export never touches
/// what is on screen. Each call is self-contained, so both formats can run
/// at once.
pub struct ReportExporter {
    backend: Arc<dyn ResultsBackend>,
    observer: Arc<dyn Observer>,
    alerts: Arc<dyn AlertSink>,
    download_dir: PathBuf,
    // Replaced, not just cancelled, so the exporter stays usable.
    scope: Mutex<CancelScope>,
}

impl ReportExporter {
    pub fn new(
        backend: Arc<dyn ResultsBackend>,
        observer: Arc<dyn Observer>,
        alerts: Arc<dyn AlertSink>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            backend,
            observer,
            alerts,
            download_dir,
            scope: Mutex::new(CancelScope::new()),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Cancels every export still in flight. Exports started afterwards run
    /// normally.
    pub fn cancel_all(&self) {
        if let Ok(mut scope) = self.scope.lock() {
            // Dropping the old scope cancels its tokens.
            *scope = CancelScope::new();
        }
    }

    fn token(&self) -> Result<CancelToken> {
        self.scope
            .lock()
            .map(|scope| scope.token())
            .map_err(|_| ExtractError::Cancelled)
    }

    /// Exports `results` in `format` and returns the saved file's path.
    ///
    /// Raises one alert on failure. A cancelled export returns `Cancelled`
    /// quietly.
    pub async fn download(&self, format: ReportFormat, results: &ResultSet) -> Result<PathBuf> {
        let payload = ExportPayload::from_results(results);
        self.observer.observe(&Event::ExportRequested {
            format,
            count: payload.results.len(),
        });

        match self.fetch_and_save(format, &payload).await {
            Ok(path) => Ok(path),
            Err(ExtractError::Cancelled) => {
                self.observer.observe(&Event::ExportCancelled { format });
                Err(ExtractError::Cancelled)
            }
            Err(error) => {
                self.observer
                    .observe(&Event::ExportFailed { format, error: &error });
                self.alerts.alert(format.failure_alert());
                Err(error)
            }
        }
    }

    async fn fetch_and_save(&self, format: ReportFormat, payload: &ExportPayload) -> Result<PathBuf> {
        let token = self.token()?;
        let bytes = token
            .guard(self.backend.download_report(format, payload))
            .await??;

        let filename = report_filename(format, Utc::now().date_naive());
        let path = save_new(&self.download_dir, &filename, &bytes).await?;

        self.observer.observe(&Event::ExportSaved {
            format,
            path: &path,
            bytes: bytes.len(),
        });
        Ok(path)
    }
}
