use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use joblink_client::{CsvSheet, ReqwestFetcher};
use joblink_core::period::{detect_period_from_text, guess_period};
use joblink_core::{Config, MetadataPipeline, Overrides, RowSink, assemble_record};

#[derive(Parser)]
#[command(name = "joblink", version, about = "Add job postings to a tracking sheet by URL")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true, env = "JOBLINK_CONFIG", default_value = "config.yml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a posting and append it to the sheet
    Add {
        /// Job posting URL
        url: String,

        #[command(flatten)]
        fields: FieldArgs,

        /// Print the row that would be appended without touching the sheet
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Scrape a posting and print the detected metadata as JSON
    Scrape {
        /// Job posting URL
        url: String,
    },
}

/// Explicit values; each one overrides whatever was scraped or configured.
#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Job source (e.g. LinkedIn, Referral)
    #[arg(long)]
    source: Option<String>,
    /// Application status (e.g. Applied, Interview)
    #[arg(long)]
    status: Option<String>,
    /// Industry / sector, normalised against the configured labels
    #[arg(long)]
    industry: Option<String>,
    /// Application period (e.g. Summer, Fall)
    #[arg(long)]
    period: Option<String>,
    /// Company name
    #[arg(long)]
    company: Option<String>,
    /// Position title
    #[arg(long)]
    title: Option<String>,
    /// Job location
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    contact_person: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
    #[arg(long)]
    contact_phone: Option<String>,
    /// Next follow-up date
    #[arg(long = "next-followup")]
    next_followup: Option<String>,
    #[arg(long)]
    interview_dates: Option<String>,
    #[arg(long)]
    resume_version: Option<String>,
    #[arg(long)]
    cover_letter_version: Option<String>,
    /// Offer status (Y/N)
    #[arg(long)]
    offer_received: Option<String>,
    #[arg(long)]
    offer_details: Option<String>,
    /// Decision status (Y/N)
    #[arg(long)]
    decision_made: Option<String>,
}

impl From<FieldArgs> for Overrides {
    fn from(args: FieldArgs) -> Self {
        Overrides {
            company: args.company,
            title: args.title,
            location: args.location,
            industry: args.industry,
            period: args.period,
            source: args.source,
            status: args.status,
            notes: args.notes,
            contact_person: args.contact_person,
            contact_email: args.contact_email,
            contact_phone: args.contact_phone,
            next_followup: args.next_followup,
            interview_dates: args.interview_dates,
            resume_version: args.resume_version,
            cover_letter_version: args.cover_letter_version,
            offer_received: args.offer_received,
            offer_details: args.offer_details,
            decision_made: args.decision_made,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("joblink=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Config is never allowed to degrade: fail before any sheet access.
    let config = Arc::new(
        Config::from_file(&cli.config)
            .with_context(|| format!("Failed to load config {}", cli.config.display()))?,
    );

    match cli.command {
        Commands::Add {
            url,
            fields,
            dry_run,
        } => cmd_add(&url, fields.into(), dry_run, config).await?,
        Commands::Scrape { url } => cmd_scrape(&url, config).await?,
    }

    Ok(())
}

async fn cmd_add(url: &str, overrides: Overrides, dry_run: bool, config: Arc<Config>) -> Result<()> {
    let tz = config.timezone()?;

    // 1. Open the sheet (header is ensured on open)
    let mut sheet = if dry_run {
        None
    } else {
        Some(
            CsvSheet::open(&config.sheet.path)
                .with_context(|| format!("Could not open sheet {}", config.sheet.path.display()))?,
        )
    };

    // 2. Scrape (best-effort)
    let fetcher = ReqwestFetcher::new().context("Failed to create HTTP client")?;
    let pipeline = MetadataPipeline::new(fetcher, Arc::clone(&config));
    let meta = pipeline.resolve(url).await;

    // 3. Assemble
    let now = chrono::Utc::now().with_timezone(&tz);
    let assembled = assemble_record(url, &meta, &overrides, &config, &now);
    if !assembled.location.is_empty() {
        tracing::info!(location = %assembled.location, "Location detected");
    }

    // 4. Append or preview
    match sheet.as_mut() {
        Some(sheet) => {
            sheet
                .append_row(&assembled.record)
                .with_context(|| format!("Failed to append row for {url}"))?;
            println!("✓ Added row to {}:", config.sheet.path.display());
            println!("{}", serde_json::to_string(&assembled.record.to_row())?);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&assembled.record.to_map())?);
        }
    }

    Ok(())
}

async fn cmd_scrape(url: &str, config: Arc<Config>) -> Result<()> {
    let tz = config.timezone()?;
    let fetcher = ReqwestFetcher::new().context("Failed to create HTTP client")?;
    let pipeline = MetadataPipeline::new(fetcher, Arc::clone(&config));

    let meta = pipeline
        .try_resolve(url)
        .await
        .with_context(|| format!("Scrape failed for {url}"))?;

    let title = meta.title.as_deref().unwrap_or_default();
    let period = detect_period_from_text(&[title, url])
        .unwrap_or_else(|| guess_period(&chrono::Utc::now().with_timezone(&tz)));

    let mut output = serde_json::to_value(&meta)?;
    output["period"] = serde_json::Value::String(period.to_string());
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
