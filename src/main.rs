mod config;
mod db;
mod fetch;
mod industry;
mod parser;
mod period;
mod record;
mod text;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use config::Settings;
use db::{RowSink, SqliteSink};
use record::{Assembler, Overrides};

#[derive(Parser)]
#[command(name = "job_tracker", about = "Log job applications from their posting URLs")]
struct Cli {
    /// Settings file (default: ./config.yml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a posting, extract its details and append a row
    Add {
        /// Job posting URL
        url: String,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Print the row as JSON instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the most recent rows
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Args)]
struct OverrideArgs {
    /// Where the posting was found (e.g. LinkedIn, Referral)
    #[arg(long)]
    source: Option<String>,
    /// Application status (e.g. Applied, Interview)
    #[arg(long)]
    status: Option<String>,
    /// Industry label, stored as given
    #[arg(long)]
    industry: Option<String>,
    /// Period label, stored as given
    #[arg(long)]
    period: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Application ID
    #[arg(long)]
    id: Option<String>,
}

impl From<OverrideArgs> for Overrides {
    fn from(a: OverrideArgs) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Overrides {
            application_id: keep(a.id),
            company: keep(a.company),
            position_title: keep(a.title),
            location: keep(a.location),
            industry: keep(a.industry),
            period: keep(a.period),
            source: keep(a.source),
            status: keep(a.status),
            notes: keep(a.notes),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Add {
            url,
            overrides,
            dry_run,
        } => {
            let html = match fetch::fetch_page(&url, &settings.fetch).await {
                Ok(body) => Some(body),
                Err(e) => {
                    warn!("Fetch failed, continuing with URL only: {}", e);
                    None
                }
            };

            let extraction = parser::extract_job(&url, html.as_deref());
            let industries = settings.industry_map()?;
            if industries.is_empty() {
                info!("No industry keywords configured, industry defaults to '{}'", settings.defaults.industry);
            }
            let defaults = settings.record_defaults();
            let now = Utc::now().with_timezone(&settings.timezone()?);
            let record = Assembler::new(&industries, settings.period, &defaults).assemble(
                &url,
                &extraction,
                &overrides.into(),
                &now,
            );

            if dry_run {
                println!("{}", serde_json::to_string_pretty(&record)?);
                return Ok(());
            }

            let mut sink = SqliteSink::open(&settings.sink.database)
                .with_context(|| format!("Failed to open {}", settings.sink.database.display()))?;
            sink.append(&record)?;
            info!(
                "Saved {} in {}",
                extraction.classification.family,
                format_duration(t0.elapsed())
            );

            for (name, value) in record::COLUMNS.iter().zip(record.to_row()) {
                println!("{:<18} {}", format!("{}:", name), value);
            }
        }
        Commands::List { limit } => {
            let sink = SqliteSink::open(&settings.sink.database)
                .with_context(|| format!("Failed to open {}", settings.sink.database.display()))?;
            let rows = sink.recent(limit)?;
            if rows.is_empty() {
                println!("No applications logged yet. Run 'add <URL>' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<19} | {:<20} | {:<28} | {:<18} | {:<6} | {:<10}",
                "#", "Date", "Company", "Position", "Location", "Period", "Status"
            );
            println!("{}", "-".repeat(120));

            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<19} | {:<20} | {:<28} | {:<18} | {:<6} | {:<10}",
                    i + 1,
                    truncate(&r.date_applied, 19),
                    truncate(&r.company, 20),
                    truncate(&r.position_title, 28),
                    truncate(&r.location, 18),
                    r.period,
                    truncate(&r.application_status, 10),
                );
            }

            println!("\n{} of {} applications", rows.len(), sink.count()?);
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
