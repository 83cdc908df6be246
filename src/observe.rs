// src/observe.rs
//
// All diagnostic output of the library goes through `Observer`, so callers can
// route it to `log`, collect it in tests, or switch it off.

use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::errors::ExtractError;
use crate::export::ReportFormat;
use crate::models::Summary;

/// Something worth telling whoever watches the client.
#[derive(Debug)]
pub enum Event<'a> {
    QuerySubmitted {
        query_id: Uuid,
        start_roll: &'a str,
        end_roll: &'a str,
    },
    UnusualRollFormat {
        roll_number: &'a str,
    },
    ResultsLoaded {
        query_id: Uuid,
        count: usize,
    },
    FetchFailed {
        query_id: Uuid,
        error: &'a ExtractError,
    },
    StaleOutcomeDiscarded {
        query_id: Uuid,
    },
    UnrecognizedStatus {
        roll_number: &'a str,
        status: &'a str,
    },
    SummaryMismatch {
        backend: Summary,
        computed: Summary,
    },
    ExportRequested {
        format: ReportFormat,
        count: usize,
    },
    ExportSaved {
        format: ReportFormat,
        path: &'a Path,
        bytes: usize,
    },
    ExportFailed {
        format: ReportFormat,
        error: &'a ExtractError,
    },
    ExportCancelled {
        format: ReportFormat,
    },
}

pub trait Observer: Send + Sync {
    fn observe(&self, event: &Event<'_>);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn observe(&self, event: &Event<'_>) {
        match event {
            Event::QuerySubmitted { query_id, start_roll, end_roll } => {
                log::info!("query {query_id}: fetching results {start_roll}..{end_roll}");
            }
            Event::UnusualRollFormat { roll_number } => {
                log::warn!("roll number '{roll_number}' does not look like YYEGXXXGNN");
            }
            Event::ResultsLoaded { query_id, count } => {
                log::info!("query {query_id}: loaded {count} results");
            }
            Event::FetchFailed { query_id, error } => {
                log::error!("query {query_id}: fetch failed: {error}");
            }
            Event::StaleOutcomeDiscarded { query_id } => {
                log::debug!("query {query_id}: outcome arrived after interest was lost, ignored");
            }
            Event::UnrecognizedStatus { roll_number, status } => {
                log::warn!("{roll_number}: unrecognized status '{status}', treating as success");
            }
            Event::SummaryMismatch { backend, computed } => {
                log::warn!("backend summary {backend:?} disagrees with computed {computed:?}");
            }
            Event::ExportRequested { format, count } => {
                log::info!("requesting {format} report for {count} results");
            }
            Event::ExportSaved { format, path, bytes } => {
                log::info!("saved {format} report ({bytes} bytes) to {}", path.display());
            }
            Event::ExportFailed { format, error } => {
                log::error!("{format} report failed: {error}");
            }
            Event::ExportCancelled { format } => {
                log::debug!("{format} report cancelled, nothing saved");
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn observe(&self, _event: &Event<'_>) {}
}

/// Keeps a debug rendering of each event. Handy for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<String>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded events whose rendering starts with `variant`.
    pub fn count(&self, variant: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(variant))
            .count()
    }
}

impl Observer for MemoryObserver {
    fn observe(&self, event: &Event<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(format!("{event:?}"));
        }
    }
}
