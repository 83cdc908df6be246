// src/normalize.rs
use crate::models::{RawStudentRecord, ResultSet, Status, StudentResult};
use crate::observe::{Event, Observer};

pub const ACTIVE_TEXT: &str = "Active";
pub const BACKLOG_TEXT: &str = "Backlog";
pub const NOT_FOUND_TEXT: &str = "Student does not exist.";
pub const ERROR_TEXT: &str = "Error in extracting information.";

/// Maps the backend's free-text status onto the closed enum.
///
/// Exact, case- and punctuation-sensitive match. Anything unrecognized falls
/// back to `Success`.
pub fn status_from_backend(text: &str) -> Status {
    match text {
        BACKLOG_TEXT => Status::Backlog,
        NOT_FOUND_TEXT => Status::NotFound,
        ERROR_TEXT => Status::Error,
        _ => Status::Success,
    }
}

/// Inverse of [`status_from_backend`], used when sending results back for export.
pub fn status_to_backend(status: Status) -> &'static str {
    match status {
        Status::Success => ACTIVE_TEXT,
        Status::Backlog => BACKLOG_TEXT,
        Status::NotFound => NOT_FOUND_TEXT,
        Status::Error => ERROR_TEXT,
    }
}

fn is_known_status(text: &str) -> bool {
    matches!(text, ACTIVE_TEXT | BACKLOG_TEXT | NOT_FOUND_TEXT | ERROR_TEXT)
}

pub fn normalize_record(raw: RawStudentRecord, observer: &dyn Observer) -> StudentResult {
    if !is_known_status(&raw.status) {
        observer.observe(&Event::UnrecognizedStatus {
            roll_number: &raw.roll_number,
            status: &raw.status,
        });
    }

    StudentResult {
        status: status_from_backend(&raw.status),
        roll_number: raw.roll_number,
        cgpa: raw.cgpa,
    }
}

pub fn normalize_all(records: Vec<RawStudentRecord>, observer: &dyn Observer) -> ResultSet {
    records
        .into_iter()
        .map(|raw| normalize_record(raw, observer))
        .collect()
}
