//! querychart CLI - draw chart reports from rollup query results
//!
//! # Reports
//!
//! ```bash
//! querychart volume                  # q1: monthly bar + weekly line
//! querychart ctr                     # q2: ranked bar, heatmap, weekday bars
//! querychart domains --delete-frames # q3: per-category GIF + small multiples
//! querychart events                  # q4: dual-axis series with event markers
//! querychart correlation -t AAPL     # q5: search interest vs. stock price
//! querychart all                     # every report
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! querychart inspect data/question2-data.csv -g hour -g weekday -l CATEGORY
//! ```

use clap::{Parser, Subcommand};
use querychart::{
    log_error, reports, ColumnOp, LogEntry, LogLevel, Normalizer, Partitioner, ReportId, Settings, Shaping, UnmatchedPolicy,
    JOURNAL,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "querychart")]
#[command(about = "Render chart reports from rollup CSV results", long_about = None)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the input CSV files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Root directory for the questionN output folders
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Fail on values outside a declared ordering instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    /// Write the run log as JSON to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// q1: monthly and weekly search volume
    Volume,

    /// q2: click-through rate by category, hour and weekday
    Ctr,

    /// q3: top domains per category
    Domains {
        /// Delete the per-category frames after the GIF is written
        #[arg(long)]
        delete_frames: bool,
    },

    /// q4: daily trend against external events
    Events,

    /// q5: search interest against a stock price
    Correlation {
        /// Ticker to select (default: EBAY)
        #[arg(short, long)]
        ticker: Option<String>,
    },

    /// Run every report
    All {
        /// Delete the per-category frames after the GIF is written
        #[arg(long)]
        delete_frames: bool,

        /// Ticker for the correlation report
        #[arg(short, long)]
        ticker: Option<String>,
    },

    /// Load any CSV and print its views as JSON
    Inspect {
        /// Input CSV file
        input: PathBuf,

        /// Grouping column whose absence marks a rollup level (repeatable)
        #[arg(short, long)]
        grouping: Vec<String>,

        /// Primary label column; rows where it is absent are grand totals
        #[arg(short, long)]
        label: Option<String>,

        /// Extra null sentinel besides [NULL] and the empty string (repeatable)
        #[arg(short, long)]
        sentinel: Vec<String>,

        /// Column to coerce to a number (repeatable)
        #[arg(short, long)]
        numeric: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log_file = cli.log_file.clone();

    let result = run(cli);

    if let Err(ref e) = result {
        JOURNAL.record(LogEntry::error(e.to_string()));
    }
    if let Some(path) = log_file {
        if let Err(e) = JOURNAL.write_json(&path) {
            eprintln!("❌ Error: cannot write log file {}: {}", path.display(), e);
        }
    }

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = load_settings(&cli)?;

    match cli.command {
        Commands::Volume => cmd_report(ReportId::SearchVolume, &settings),
        Commands::Ctr => cmd_report(ReportId::CategoryCtr, &settings),
        Commands::Domains { delete_frames } => {
            settings.delete_intermediate_files |= delete_frames;
            cmd_report(ReportId::TopDomains, &settings)
        }
        Commands::Events => cmd_report(ReportId::EventResponse, &settings),
        Commands::Correlation { ticker } => {
            if let Some(t) = ticker {
                settings.ticker = t;
            }
            cmd_report(ReportId::StockCorrelation, &settings)
        }
        Commands::All {
            delete_frames,
            ticker,
        } => {
            settings.delete_intermediate_files |= delete_frames;
            if let Some(t) = ticker {
                settings.ticker = t;
            }
            cmd_all(&settings)
        }
        Commands::Inspect {
            input,
            grouping,
            label,
            sentinel,
            numeric,
            output,
        } => cmd_inspect(&input, grouping, label, sentinel, numeric, output.as_deref()),
    }
}

/// Defaults < settings file < environment < flags
fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let base = match &cli.config {
        Some(path) => {
            eprintln!("⚙️  Settings: {}", path.display());
            Settings::load(path)?
        }
        None => Settings::default(),
    };
    let mut settings = base.apply_env();

    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        settings.out_dir = dir.clone();
    }
    if cli.strict {
        settings.unmatched = UnmatchedPolicy::Strict;
    }
    Ok(settings)
}

fn cmd_report(id: ReportId, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = reports::run(id, settings)?;
    if outcome.discarded > 0 {
        eprintln!("   {} grand-total row(s) left out", outcome.discarded);
    }
    let warnings = JOURNAL.count(LogLevel::Warning);
    if warnings > 0 {
        eprintln!("   ⚠️  {} warning(s), see above", warnings);
    }
    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_all(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut failed = Vec::new();
    for id in ReportId::ALL {
        if let Err(e) = reports::run(id, settings) {
            log_error(format!("{} failed: {}", id, e));
            failed.push(id.to_string());
        }
        eprintln!();
    }

    if !failed.is_empty() {
        return Err(format!("{} report(s) failed: {}", failed.len(), failed.join(", ")).into());
    }
    eprintln!("✨ All {} reports done!", ReportId::ALL.len());
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    grouping: Vec<String>,
    label: Option<String>,
    sentinels: Vec<String>,
    numeric: Vec<String>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Inspecting: {}", input.display());

    let mut normalizer = Normalizer::new();
    for token in sentinels {
        normalizer = normalizer.sentinel(token);
    }
    for column in numeric {
        normalizer = normalizer.step(column, ColumnOp::ToNumber);
    }
    let mut partitioner = Partitioner::new(grouping);
    if let Some(label) = label {
        partitioner = partitioner.label(label);
    }

    let partition = Shaping::new(normalizer).partitioned(partitioner).run(input)?;

    let views: Vec<Value> = partition
        .views()
        .map(|(key, view)| {
            json!({
                "view": partition.describe(key),
                "key": key.0,
                "rows": view.to_json(),
            })
        })
        .collect();
    let count = views.len();
    let report = json!({
        "views": views,
        "grandTotals": partition.grand_totals().to_json(),
    });

    eprintln!("✅ {} view(s)", count);
    let json = serde_json::to_string_pretty(&report)?;
    write_output(&json, output)?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
