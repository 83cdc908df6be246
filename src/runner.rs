// src/runner.rs
use futures::future;
use std::path::PathBuf;
use std::time::Instant;

use crate::errors::Result;
use crate::export::{ReportExporter, ReportFormat};
use crate::form::RollNumberForm;
use crate::models::ResultSet;
use crate::present::{present, render_table};
use crate::session::Session;

/// Fetch one range and print the table. Returns the number of results loaded.
pub async fn run_query(session: &mut Session, form: &RollNumberForm) -> Result<usize> {
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!(
        "🎯 Fetching results for {} .. {}",
        form.start.trim(),
        form.end.trim()
    );
    println!("{}\n", separator);

    let start = Instant::now();
    println!("⏳ Fetching results...");
    let count = session.submit(form).await?;
    println!(
        "✅ Loaded {} results in {}ms\n",
        count,
        start.elapsed().as_millis()
    );

    if session.results_visible() {
        let table = render_table(&present(session.results()));
        if table.is_empty() {
            println!("ℹ️  No students found in that range");
        } else {
            println!("{}", table);
        }
    }

    Ok(count)
}

/// Requests every format in `formats` concurrently. One failing has no effect
/// on the others.
pub async fn download_reports(
    exporter: &ReportExporter,
    formats: &[ReportFormat],
    results: &ResultSet,
) -> Vec<(ReportFormat, Result<PathBuf>)> {
    let batch_start = Instant::now();

    let futures: Vec<_> = formats
        .iter()
        .map(|format| async move { (*format, exporter.download(*format, results).await) })
        .collect();

    let outcomes = future::join_all(futures).await;

    for (format, outcome) in &outcomes {
        match outcome {
            Ok(path) => println!("📥 {} report saved to {}", format, path.display()),
            Err(e) => eprintln!("⚠️  {} report not saved: {}", format, e),
        }
    }
    println!(
        "\n📊 {} report(s) processed in {}ms",
        outcomes.len(),
        batch_start.elapsed().as_millis()
    );

    outcomes
}
