// src/session.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::alert::AlertSink;
use crate::backend::{ResultsBackend, ResultsResponse};
use crate::cancel::{CancelScope, CancelToken};
use crate::errors::{ExtractError, Result};
use crate::form::RollNumberForm;
use crate::models::{QueryRequest, ResultSet, Summary};
use crate::normalize::normalize_all;
use crate::observe::{Event, Observer};

pub const FETCH_FAILED_ALERT: &str = "Failed to fetch results. Please try again.";

/// Lifecycle of the results query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failed,
}

struct InFlight {
    generation: u64,
    query_id: Uuid,
    // Dropping the scope cancels the request.
    scope: CancelScope,
}

/// Holds the current result set and drives the fetch state machine.
///
/// At most one query is in flight. Starting a query clears the previous
/// results; a failed query leaves them cleared.
pub struct Session {
    backend: Arc<dyn ResultsBackend>,
    observer: Arc<dyn Observer>,
    alerts: Arc<dyn AlertSink>,
    phase: Phase,
    results: ResultSet,
    show_results: bool,
    generation: u64,
    in_flight: Option<InFlight>,
}

/// A query that has been accepted but not yet sent.
///
/// Running it does not borrow the session, so the request can be awaited on
/// another task while the session keeps serving reads.
pub struct PendingQuery {
    request: QueryRequest,
    generation: u64,
    backend: Arc<dyn ResultsBackend>,
    token: CancelToken,
}

impl PendingQuery {
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub async fn run(self) -> FetchOutcome {
        let result = self
            .token
            .guard(self.backend.fetch_results(&self.request))
            .await
            .and_then(|response| response);

        FetchOutcome {
            query_id: self.request.id(),
            generation: self.generation,
            result,
        }
    }
}

/// What came back for a [`PendingQuery`]; hand it to [`Session::finish`].
pub struct FetchOutcome {
    query_id: Uuid,
    generation: u64,
    result: Result<ResultsResponse>,
}

impl FetchOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.result, Err(ExtractError::Cancelled))
    }
}

impl Session {
    pub fn new(
        backend: Arc<dyn ResultsBackend>,
        observer: Arc<dyn Observer>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            backend,
            observer,
            alerts,
            phase: Phase::Idle,
            results: ResultSet::default(),
            show_results: false,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True exactly while a query is outstanding; drives the loading indicator.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Whether the results table and download controls should be shown.
    pub fn results_visible(&self) -> bool {
        self.show_results && !self.is_loading()
    }

    /// Accepts a submission and moves to `Loading`.
    ///
    /// Fails with `Busy` while another query is outstanding and with
    /// `InvalidQuery` for blank fields; in both cases nothing changes.
    pub fn begin(&mut self, form: &RollNumberForm) -> Result<PendingQuery> {
        if self.is_loading() {
            return Err(ExtractError::Busy);
        }
        let request = form.to_request(self.observer.as_ref())?;

        self.results = ResultSet::default();
        self.show_results = false;
        self.phase = Phase::Loading;
        self.generation += 1;

        let scope = CancelScope::new();
        let token = scope.token();
        self.in_flight = Some(InFlight {
            generation: self.generation,
            query_id: request.id(),
            scope,
        });

        self.observer.observe(&Event::QuerySubmitted {
            query_id: request.id(),
            start_roll: request.start_roll(),
            end_roll: request.end_roll(),
        });

        Ok(PendingQuery {
            request,
            generation: self.generation,
            backend: Arc::clone(&self.backend),
            token,
        })
    }

    /// Applies a finished request. Returns the number of loaded results.
    ///
    /// Outcomes for a query that is no longer current are dropped without
    /// touching state and reported as `Cancelled`.
    pub fn finish(&mut self, outcome: FetchOutcome) -> Result<usize> {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == outcome.generation);
        if !current || outcome.is_cancelled() {
            self.observer.observe(&Event::StaleOutcomeDiscarded {
                query_id: outcome.query_id,
            });
            return Err(ExtractError::Cancelled);
        }
        self.in_flight = None;

        match outcome.result {
            Ok(response) => {
                let results = normalize_all(response.results, self.observer.as_ref());

                if let Some(backend) = response.summary {
                    let computed = Summary::tally(results.as_slice());
                    if backend != computed {
                        self.observer
                            .observe(&Event::SummaryMismatch { backend, computed });
                    }
                }

                let count = results.len();
                self.results = results;
                self.show_results = true;
                self.phase = Phase::Success;
                self.observer.observe(&Event::ResultsLoaded {
                    query_id: outcome.query_id,
                    count,
                });
                Ok(count)
            }
            Err(error) => {
                self.results = ResultSet::default();
                self.show_results = false;
                self.phase = Phase::Failed;
                self.observer.observe(&Event::FetchFailed {
                    query_id: outcome.query_id,
                    error: &error,
                });
                self.alerts.alert(FETCH_FAILED_ALERT);
                Err(error)
            }
        }
    }

    /// Cancels the outstanding query, if any, and returns to `Idle`.
    pub fn abandon(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.scope.cancel();
            self.observer.observe(&Event::StaleOutcomeDiscarded {
                query_id: in_flight.query_id,
            });
            self.phase = Phase::Idle;
        }
    }

    /// Validates, fetches and applies a query in one go.
    pub async fn submit(&mut self, form: &RollNumberForm) -> Result<usize> {
        let pending = self.begin(form)?;
        let outcome = pending.run().await;
        self.finish(outcome)
    }
}
