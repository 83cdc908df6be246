// src/main.rs
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use result_extractor::alert::ConsoleAlerts;
use result_extractor::backend::{HttpBackend, ResultsBackend};
use result_extractor::banner;
use result_extractor::config::AppConfig;
use result_extractor::export::{ReportExporter, ReportFormat};
use result_extractor::form::RollNumberForm;
use result_extractor::observe::{LogObserver, Observer};
use result_extractor::runner;
use result_extractor::session::Session;

/// Fetch CGPA results for a roll-number range and download reports.
#[derive(Parser, Debug)]
#[command(name = "result-extractor", version, about)]
struct Cli {
    /// Starting roll number, e.g. 24EG105G01 (prompted if omitted)
    start: Option<String>,

    /// Ending roll number, e.g. 24EG105G66 (prompted if omitted)
    end: Option<String>,

    /// Download the Excel report after fetching
    #[arg(long)]
    excel: bool,

    /// Download the PDF report after fetching
    #[arg(long)]
    pdf: bool,

    /// TOML config file (defaults to ./extractor.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Directory reports are saved to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn load_config(cli: &Cli) -> result_extractor::errors::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(api_base) = &cli.api_base {
        config.api_base = api_base.clone();
    }
    if let Some(dir) = &cli.out_dir {
        config.download_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    banner::print_banner();

    // A missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("🔗 Backend: {}", config.api_base);

    let start = match cli.start.clone() {
        Some(start) => start,
        None => prompt("Starting Roll Number").unwrap_or_default(),
    };
    let end = match cli.end.clone() {
        Some(end) => end,
        None => prompt("Ending Roll Number").unwrap_or_default(),
    };
    let form = RollNumberForm::new(start, end);
    if !form.can_submit(false) {
        eprintln!("❌ Both starting and ending roll numbers are required");
        return ExitCode::FAILURE;
    }

    let backend: Arc<dyn ResultsBackend> =
        Arc::new(HttpBackend::new(reqwest::Client::new(), &config));
    let observer: Arc<dyn Observer> = Arc::new(LogObserver);
    let alerts = Arc::new(ConsoleAlerts);

    let mut session = Session::new(backend.clone(), observer.clone(), alerts.clone());
    if runner::run_query(&mut session, &form).await.is_err() {
        return ExitCode::FAILURE;
    }

    let formats: Vec<ReportFormat> = ReportFormat::ALL
        .into_iter()
        .filter(|format| match format {
            ReportFormat::Excel => cli.excel,
            ReportFormat::Pdf => cli.pdf,
        })
        .collect();

    if !formats.is_empty() {
        let exporter = ReportExporter::new(backend, observer, alerts, config.download_dir.clone());
        println!("\n📂 Saving reports to {}", exporter.download_dir().display());
        runner::download_reports(&exporter, &formats, session.results()).await;
    }

    ExitCode::SUCCESS
}
