// src/present.rs
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::models::{Cgpa, ResultSet, Status, StudentResult, Summary};

pub const TOP_PERFORMERS: usize = 3;

pub const NOT_FOUND_DISPLAY: &str = "Student does not exist";
pub const ERROR_DISPLAY: &str = "Error in extracting information";
pub const PLACEHOLDER_DISPLAY: &str = "--";

static LEADING_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// Numeric value of a CGPA for ranking.
///
/// Text is read like a leading float: `"8.5 (R)"` is 8.5, `"--"` has no value.
pub fn cgpa_value(cgpa: &Cgpa) -> Option<f64> {
    let value = match cgpa {
        Cgpa::Number(n) => Some(*n),
        Cgpa::Text(text) => LEADING_FLOAT
            .find(text.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok()),
    };
    value.filter(|v| !v.is_nan())
}

/// Display ordering.
///
/// Successes first, by CGPA descending, with unparseable CGPAs after the
/// parseable ones. Everything else compares equal so a stable sort keeps
/// backend order.
pub fn compare_for_display(a: &StudentResult, b: &StudentResult) -> Ordering {
    match (a.status == Status::Success, b.status == Status::Success) {
        (true, true) => match (cgpa_value(&a.cgpa), cgpa_value(&b.cgpa)) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Returns a sorted copy; the input is left as received.
pub fn sort_results(results: &[StudentResult]) -> Vec<StudentResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(compare_for_display);
    sorted
}

pub fn display_cgpa(result: &StudentResult) -> String {
    match result.status {
        Status::NotFound => NOT_FOUND_DISPLAY.to_string(),
        Status::Error => ERROR_DISPLAY.to_string(),
        Status::Backlog => PLACEHOLDER_DISPLAY.to_string(),
        Status::Success => match &result.cgpa {
            cgpa if cgpa.is_placeholder() => PLACEHOLDER_DISPLAY.to_string(),
            Cgpa::Number(n) => format!("{:.2}", n),
            Cgpa::Text(text) => text.clone(),
        },
    }
}

/// `index` is the position in sorted output, starting at 0.
pub fn is_top_performer(index: usize, result: &StudentResult) -> bool {
    index < TOP_PERFORMERS && result.status == Status::Success
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// 1-based position in sorted order.
    pub position: usize,
    pub roll_number: String,
    pub cgpa: String,
    pub status: Status,
    pub top_performer: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub rows: Vec<DisplayRow>,
    pub summary: Summary,
}

pub fn present(results: &ResultSet) -> Presentation {
    let rows = sort_results(results.as_slice())
        .iter()
        .enumerate()
        .map(|(index, result)| DisplayRow {
            position: index + 1,
            roll_number: result.roll_number.clone(),
            cgpa: display_cgpa(result),
            status: result.status,
            top_performer: is_top_performer(index, result),
        })
        .collect();

    Presentation {
        rows,
        summary: Summary::tally(results.as_slice()),
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Success => Color::Green,
        Status::Backlog => Color::DarkYellow,
        Status::NotFound => Color::Grey,
        Status::Error => Color::Red,
    }
}

/// Renders the results table followed by the four summary tiles.
/// An empty presentation renders as an empty string.
pub fn render_table(presentation: &Presentation) -> String {
    if presentation.rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Roll Number").add_attribute(Attribute::Bold),
            Cell::new("CGPA").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for row in &presentation.rows {
        let roll = if row.top_performer {
            format!("{} 🏆", row.roll_number)
        } else {
            row.roll_number.clone()
        };
        table.add_row(vec![
            Cell::new(roll),
            Cell::new(&row.cgpa),
            Cell::new(row.status.badge()).fg(status_color(row.status)),
        ]);
    }

    let mut tiles = Table::new();
    tiles
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            "Active Students",
            "With Backlogs",
            "Not Found",
            "Errors",
        ]);
    let summary = presentation.summary;
    tiles.add_row(vec![
        Cell::new(summary.success).fg(Color::Green),
        Cell::new(summary.backlog).fg(Color::DarkYellow),
        Cell::new(summary.not_found).fg(Color::Grey),
        Cell::new(summary.error).fg(Color::Red),
    ]);

    format!(
        "Results Summary ({} students)\n{}\n{}",
        presentation.rows.len(),
        table,
        tiles
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(roll: &str, cgpa: impl Into<Cgpa>) -> StudentResult {
        StudentResult::new(roll, cgpa, Status::Success)
    }

    fn other(roll: &str, status: Status) -> StudentResult {
        StudentResult::new(roll, "--", status)
    }

    fn rolls(results: &[StudentResult]) -> Vec<&str> {
        results.iter().map(|r| r.roll_number.as_str()).collect()
    }

    fn mixed() -> Vec<StudentResult> {
        vec![
            other("E1", Status::Error),
            ok("S1", 7.2),
            other("B1", Status::Backlog),
            ok("S2", "9.05"),
            other("N1", Status::NotFound),
            ok("S3", 8.4),
            other("B2", Status::Backlog),
            ok("S4", "8.40"),
        ]
    }

    #[test]
    fn test_cgpa_value_parsing() {
        assert_eq!(cgpa_value(&Cgpa::Number(9.1)), Some(9.1));
        assert_eq!(cgpa_value(&"8.75".into()), Some(8.75));
        assert_eq!(cgpa_value(&" 8.5 (R)".into()), Some(8.5));
        assert_eq!(cgpa_value(&".5".into()), Some(0.5));
        assert_eq!(cgpa_value(&"--".into()), None);
        assert_eq!(cgpa_value(&"N/A".into()), None);
        assert_eq!(cgpa_value(&Cgpa::Number(f64::NAN)), None);
    }

    #[test]
    fn test_successes_first_descending() {
        let sorted = sort_results(&mixed());
        assert_eq!(
            rolls(&sorted),
            vec!["S2", "S3", "S4", "S1", "E1", "B1", "N1", "B2"]
        );
    }

    #[test]
    fn test_adjacent_successes_never_increase() {
        let sorted = sort_results(&mixed());
        let values: Vec<f64> = sorted
            .iter()
            .filter(|r| r.status == Status::Success)
            .filter_map(|r| cgpa_value(&r.cgpa))
            .collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_non_success_keep_input_order() {
        let input = mixed();
        let sorted = sort_results(&input);
        let keep = |v: &[StudentResult]| -> Vec<String> {
            v.iter()
                .filter(|r| r.status != Status::Success)
                .map(|r| r.roll_number.clone())
                .collect()
        };
        assert_eq!(keep(&sorted), keep(&input));
    }

    #[test]
    fn test_sort_is_idempotent_and_leaves_input_alone() {
        let input = mixed();
        let once = sort_results(&input);
        let twice = sort_results(&once);
        assert_eq!(once, twice);
        assert_eq!(rolls(&input)[0], "E1");
    }

    #[test]
    fn test_equal_cgpa_keeps_input_order() {
        // 8.4 and "8.40" tie; input order decides.
        let sorted = sort_results(&[ok("A", "8.40"), ok("B", 8.4), ok("C", 9.0)]);
        assert_eq!(rolls(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_unparseable_success_sorts_after_ranked_successes() {
        let sorted = sort_results(&[
            ok("X", "--"),
            other("B", Status::Backlog),
            ok("Y", 6.0),
            ok("Z", "pending"),
        ]);
        assert_eq!(rolls(&sorted), vec!["Y", "X", "Z", "B"]);
    }

    #[test]
    fn test_display_values() {
        assert_eq!(display_cgpa(&ok("R", 9.1)), "9.10");
        assert_eq!(display_cgpa(&ok("R", "8.756")), "8.756");
        assert_eq!(display_cgpa(&ok("R", "-")), "--");
        assert_eq!(
            display_cgpa(&StudentResult::new("R", 7.0, Status::Backlog)),
            "--"
        );
        assert_eq!(display_cgpa(&other("R", Status::NotFound)), NOT_FOUND_DISPLAY);
        assert_eq!(display_cgpa(&other("R", Status::Error)), ERROR_DISPLAY);
    }

    #[test]
    fn test_top_performers_are_first_three_successes() {
        let presentation = present(&mixed().into_iter().collect());
        let top: Vec<&str> = presentation
            .rows
            .iter()
            .filter(|r| r.top_performer)
            .map(|r| r.roll_number.as_str())
            .collect();
        assert_eq!(top, vec!["S2", "S3", "S4"]);
    }

    #[test]
    fn test_fewer_than_three_successes_marks_fewer() {
        let set: ResultSet = vec![
            other("B1", Status::Backlog),
            ok("S1", 6.5),
            other("N1", Status::NotFound),
        ]
        .into_iter()
        .collect();

        let presentation = present(&set);
        let marked: Vec<usize> = presentation
            .rows
            .iter()
            .filter(|r| r.top_performer)
            .map(|r| r.position)
            .collect();
        assert_eq!(marked, vec![1]);
    }

    #[test]
    fn test_summary_counts_unsorted_set() {
        let set: ResultSet = mixed().into_iter().collect();
        let presentation = present(&set);
        assert_eq!(
            presentation.summary,
            Summary {
                success: 4,
                backlog: 2,
                not_found: 1,
                error: 1
            }
        );
        assert_eq!(presentation.summary.total(), set.len());
    }

    #[test]
    fn test_scenario_a_presentation() {
        let set: ResultSet = vec![ok("R1", 9.1), other("R2", Status::Backlog)]
            .into_iter()
            .collect();
        let presentation = present(&set);

        assert_eq!(presentation.rows[0].roll_number, "R1");
        assert_eq!(presentation.rows[0].cgpa, "9.10");
        assert!(presentation.rows[0].top_performer);
        assert_eq!(presentation.rows[1].cgpa, "--");
        assert_eq!(
            presentation.summary,
            Summary {
                success: 1,
                backlog: 1,
                not_found: 0,
                error: 0
            }
        );
    }

    #[test]
    fn test_render_table_contents() {
        let set: ResultSet = vec![ok("R1", 9.1), other("R2", Status::Backlog)]
            .into_iter()
            .collect();
        let rendered = render_table(&present(&set));

        assert!(rendered.starts_with("Results Summary (2 students)"));
        assert!(rendered.contains("R1 🏆"));
        assert!(rendered.contains("9.10"));
        assert!(rendered.contains("Backlog"));
        assert!(rendered.contains("With Backlogs"));
    }

    #[test]
    fn test_render_empty_is_blank() {
        assert!(render_table(&present(&ResultSet::default())).is_empty());
    }
}
