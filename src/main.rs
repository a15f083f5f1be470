mod db;
mod fetch;
mod parser;
mod urls;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "covid_scraper", about = "covid19.gov.vn timeline scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the page queue with the timeline archive URLs
    Init,
    /// Fetch unvisited pages
    Scrape {
        /// Max pages to fetch (default: all unvisited)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Parse fetched pages into structured records
    Process {
        /// Max pages to process (default: all unprocessed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Scrape + process in one pipeline
    Run {
        /// Max pages to scrape+process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Write all records as JSON lines
    Export {
        /// Output path
        #[arg(short, long, default_value = "data/records.jl")]
        output: PathBuf,
    },
    /// Show scraping statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = urls::timeline_urls();
            let inserted = db::insert_pages(&conn, &pages)?;
            println!(
                "Inserted {} new timeline URLs ({} total generated)",
                inserted,
                pages.len()
            );
            Ok(())
        }
        Commands::Scrape { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first or all pages are fetched.");
                return Ok(());
            }
            println!("Fetching {} pages (streaming to DB)...", pages.len());
            let stats = fetch::fetch_pages_streaming(&conn, pages).await?;
            println!(
                "Done: {} fetched ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::Process { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unprocessed(&conn, limit)?;
            if pages.is_empty() {
                println!("No unprocessed pages. Run 'scrape' first.");
                return Ok(());
            }
            println!("Processing {} pages...", pages.len());
            let counts = process_pages(&conn, &pages)?;
            counts.print();
            Ok(())
        }
        Commands::Run { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first.");
                return Ok(());
            }

            // Phase 1: Fetch (streaming to DB)
            let t_fetch = Instant::now();
            println!(
                "Pipeline: fetching {} pages (streaming to DB)...",
                pages.len()
            );
            let stats = fetch::fetch_pages_streaming(&conn, pages).await?;
            println!(
                "Fetched {} pages ({} ok, {} errors) in {:.1}s",
                stats.total,
                stats.ok,
                stats.errors,
                t_fetch.elapsed().as_secs_f64()
            );

            // Phase 2: Process
            let t_process = Instant::now();
            let unprocessed = db::fetch_unprocessed(&conn, None)?;
            if unprocessed.is_empty() {
                println!("Nothing to process (all fetched pages had errors).");
                return Ok(());
            }
            println!("Processing {} pages...", unprocessed.len());
            let counts = process_pages(&conn, &unprocessed)?;
            println!("Processed in {:.1}s", t_process.elapsed().as_secs_f64());
            counts.print();
            Ok(())
        }
        Commands::Export { output } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_records(&conn)?;
            if rows.is_empty() {
                println!("No records to export. Run 'process' first.");
                return Ok(());
            }
            let written = export_records(&rows, &output)?;
            println!("Exported {} records to {}", written, output.display());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Total:     {}", s.total);
            println!("Visited:   {}", s.visited);
            println!("Unvisited: {}", s.unvisited);
            println!("Fetched:   {}", s.scraped);
            println!("Errors:    {}", s.errors);
            println!("Processed: {}", s.processed);
            println!("Records:   {}", s.records);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ProcessCounts {
    pages: usize,
    records: usize,
    errors: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} records from {} pages ({} unusable entries).",
            self.records, self.pages, self.errors,
        );
    }
}

fn process_pages(
    conn: &rusqlite::Connection,
    pages: &[db::ScrapedPage],
) -> anyhow::Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts {
        pages: pages.len(),
        records: 0,
        errors: 0,
    };

    for chunk in pages.chunks(200) {
        let outcomes: Vec<_> = chunk.par_iter().map(parser::process_page).collect();

        let mut rows = Vec::new();
        let mut page_ids = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            counts.errors += outcome.errors;
            page_ids.push(outcome.page_data_id);
            rows.extend(outcome.records);
        }

        counts.records += rows.len();
        db::save_records(conn, &rows)?;
        db::mark_processed(conn, &page_ids)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

/// Write records as JSON lines: the persisted city_cases JSON is embedded
/// verbatim (array of pairs or the sentinel string).
fn export_records(rows: &[db::ExportRow], path: &std::path::Path) -> anyhow::Result<usize> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    for r in rows {
        let city_cases: serde_json::Value = match &r.city_cases {
            Some(json) => serde_json::from_str(json).unwrap_or(serde_json::Value::Null),
            None => serde_json::Value::Null,
        };
        let obj = serde_json::json!({
            "time": r.time,
            "new_cases": r.new_cases,
            "city_cases": city_cases,
            "url": r.url,
        });
        writeln!(out, "{}", obj)?;
    }
    out.flush()?;
    Ok(rows.len())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
