// src/backend/mod.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::Result;
use crate::export::{ExportPayload, ReportFormat};
use crate::models::{QueryRequest, RawStudentRecord, Summary};

pub mod http;

pub use http::HttpBackend;

/// Body of a successful `/api/results` call.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsResponse {
    pub results: Vec<RawStudentRecord>,
    /// The backend's own tally. Informational only; the client recounts.
    #[serde(default)]
    pub summary: Option<Summary>,
}

/// The remote service that looks up results and renders reports.
///
/// Implementations only talk to the wire; state handling, normalization and
/// alerts live with the callers.
#[async_trait]
pub trait ResultsBackend: Send + Sync {
    /// Fetches raw result records for a roll-number range.
    async fn fetch_results(&self, query: &QueryRequest) -> Result<ResultsResponse>;

    /// Requests a rendered report and returns its bytes untouched.
    async fn download_report(&self, format: ReportFormat, payload: &ExportPayload)
    -> Result<Vec<u8>>;
}
