// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{ExtractError, Result};

/// Outcome category of one student lookup. Exactly one holds per result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Backlog,
    NotFound,
    Error,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Success,
        Status::Backlog,
        Status::NotFound,
        Status::Error,
    ];

    /// Label shown on the status badge.
    pub fn badge(&self) -> &'static str {
        match self {
            Status::Success => "Active",
            Status::Backlog => "Backlog",
            Status::NotFound => "Not Found",
            Status::Error => "Error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Backlog => write!(f, "backlog"),
            Status::NotFound => write!(f, "not_found"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// A CGPA as the backend sends it: either a JSON number or a string,
/// which may be a placeholder such as `"--"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cgpa {
    Number(f64),
    Text(String),
}

impl Cgpa {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cgpa::Text(t) if t == "--" || t == "-")
    }
}

impl From<f64> for Cgpa {
    fn from(value: f64) -> Self {
        Cgpa::Number(value)
    }
}

impl From<&str> for Cgpa {
    fn from(value: &str) -> Self {
        Cgpa::Text(value.to_string())
    }
}

/// One result record in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStudentRecord {
    pub roll_number: String,
    pub cgpa: Cgpa,
    pub status: String,
}

/// The normalized, display-ready view of one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub roll_number: String,
    pub cgpa: Cgpa,
    pub status: Status,
}

impl StudentResult {
    pub fn new(roll_number: impl Into<String>, cgpa: impl Into<Cgpa>, status: Status) -> Self {
        Self {
            roll_number: roll_number.into(),
            cgpa: cgpa.into(),
            status,
        }
    }
}

/// A validated roll-number range. Both ends are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    id: Uuid,
    start_roll: String,
    end_roll: String,
}

impl QueryRequest {
    pub fn new(start_roll: &str, end_roll: &str) -> Result<Self> {
        let start_roll = start_roll.trim();
        let end_roll = end_roll.trim();

        if start_roll.is_empty() {
            return Err(ExtractError::InvalidQuery(
                "starting roll number is empty".to_string(),
            ));
        }
        if end_roll.is_empty() {
            return Err(ExtractError::InvalidQuery(
                "ending roll number is empty".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            start_roll: start_roll.to_string(),
            end_roll: end_roll.to_string(),
        })
    }

    /// Correlation id for diagnostics. Never sent to the backend.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start_roll(&self) -> &str {
        &self.start_roll
    }

    pub fn end_roll(&self) -> &str {
        &self.end_roll
    }
}

/// Results of one query, in backend order. Replaced as a whole, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet(Vec<StudentResult>);

impl ResultSet {
    pub fn new(results: Vec<StudentResult>) -> Self {
        Self(results)
    }

    pub fn as_slice(&self) -> &[StudentResult] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudentResult> {
        self.0.iter()
    }
}

impl FromIterator<StudentResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = StudentResult>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-status counts. On the wire the success count is called `active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "active")]
    pub success: usize,
    pub backlog: usize,
    pub not_found: usize,
    pub error: usize,
}

impl Summary {
    /// Counts each status class. Order of `results` does not matter.
    pub fn tally(results: &[StudentResult]) -> Self {
        results.iter().fold(Summary::default(), |mut acc, r| {
            match r.status {
                Status::Success => acc.success += 1,
                Status::Backlog => acc.backlog += 1,
                Status::NotFound => acc.not_found += 1,
                Status::Error => acc.error += 1,
            }
            acc
        })
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Success => self.success,
            Status::Backlog => self.backlog,
            Status::NotFound => self.not_found,
            Status::Error => self.error,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.backlog + self.not_found + self.error
    }
}
