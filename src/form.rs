// src/form.rs
use regex::Regex;
use std::sync::LazyLock;

use crate::errors::Result;
use crate::models::QueryRequest;
use crate::observe::{Event, Observer};

/// Roll numbers the backend knows how to expand, e.g. `24EG105G01`.
static ROLL_NUMBER_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{2}[A-Z]{2}\d{3}[A-Z]\d{2}$").unwrap());

pub fn looks_like_roll_number(roll: &str) -> bool {
    ROLL_NUMBER_SHAPE.is_match(roll.trim())
}

/// The two-field range form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollNumberForm {
    pub start: String,
    pub end: String,
}

impl RollNumberForm {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self, loading: bool) -> bool {
        !loading && !self.start.trim().is_empty() && !self.end.trim().is_empty()
    }

    /// Packages the fields into a trimmed query.
    ///
    /// The shape check only produces a diagnostic; the backend decides what
    /// it accepts.
    pub fn to_request(&self, observer: &dyn Observer) -> Result<QueryRequest> {
        let request = QueryRequest::new(&self.start, &self.end)?;

        for roll in [request.start_roll(), request.end_roll()] {
            if !looks_like_roll_number(roll) {
                observer.observe(&Event::UnusualRollFormat { roll_number: roll });
            }
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExtractError;
    use crate::observe::MemoryObserver;

    #[test]
    fn test_can_submit_requires_both_fields() {
        assert!(RollNumberForm::new("24EG105G01", "24EG105G66").can_submit(false));
        assert!(!RollNumberForm::new("24EG105G01", "   ").can_submit(false));
        assert!(!RollNumberForm::new("", "24EG105G66").can_submit(false));
    }

    #[test]
    fn test_can_submit_disabled_while_loading() {
        assert!(!RollNumberForm::new("24EG105G01", "24EG105G66").can_submit(true));
    }

    #[test]
    fn test_roll_number_shape() {
        assert!(looks_like_roll_number("24EG105G01"));
        assert!(looks_like_roll_number("24eg105g01"));
        assert!(looks_like_roll_number(" 23CS210A12 "));
        assert!(!looks_like_roll_number("R1"));
        assert!(!looks_like_roll_number("24EG105G1"));
    }

    #[test]
    fn test_unusual_shape_is_reported_but_accepted() {
        let observer = MemoryObserver::new();
        let request = RollNumberForm::new(" R1 ", "24EG105G66")
            .to_request(&observer)
            .unwrap();

        assert_eq!(request.start_roll(), "R1");
        assert_eq!(observer.count("UnusualRollFormat"), 1);
    }

    #[test]
    fn test_blank_field_is_invalid() {
        let observer = MemoryObserver::new();
        let err = RollNumberForm::new("24EG105G01", "\t")
            .to_request(&observer)
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidQuery(_)));
        assert!(observer.events().is_empty());
    }
}
