use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use course_churn_dataset::{
    dataset, db, labels, logging, pipeline, report, EventRecord, PipelineConfig, SubmissionRecord,
};

#[derive(Parser)]
#[command(name = "course-churn-dataset")]
#[command(about = "Build churn prediction datasets from online course logs", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON file with points_threshold / window_days
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, env = "POINTS_TO_PASS_COURSE")]
    points_threshold: Option<u32>,
    #[arg(long, env = "DAYS_THRESHOLD_TO_PREDICT_CHURN")]
    window_days: Option<u32>,
}

impl ConfigArgs {
    fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        Ok(base.with_overrides(self.points_threshold, self.window_days))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build X and y from CSV logs
    Build {
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        submissions: PathBuf,
        #[arg(long, default_value = "X.csv")]
        out_x: PathBuf,
        #[arg(long, default_value = "y.csv")]
        out_y: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Generate a markdown report of the dataset
    Report {
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        submissions: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Create or upgrade the database schema
    InitDb,
    /// Import raw logs from CSV files into Postgres
    Import {
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        submissions: PathBuf,
    },
    /// Build X and y from the logs stored in Postgres
    BuildFromDb {
        #[arg(long, default_value = "X.csv")]
        out_x: PathBuf,
        #[arg(long, default_value = "y.csv")]
        out_y: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set for database commands")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

fn write_dataset(
    events: &[EventRecord],
    submissions: &[SubmissionRecord],
    config: &PipelineConfig,
    out_x: &Path,
    out_y: &Path,
) -> anyhow::Result<()> {
    let (x, y) = pipeline::get_x_y(events, submissions, config)?;

    dataset::write_features(out_x, &x)
        .with_context(|| format!("failed to write {}", out_x.display()))?;
    dataset::write_labels(out_y, &y)
        .with_context(|| format!("failed to write {}", out_y.display()))?;

    println!(
        "Wrote {} feature rows to {} and {} labels to {}.",
        x.len(),
        out_x.display(),
        y.len(),
        out_y.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json, &cli.log_level);

    match cli.command {
        Commands::Build {
            events,
            submissions,
            out_x,
            out_y,
            config,
        } => {
            let config = config.resolve()?;
            let events = dataset::read_events(&events)
                .with_context(|| format!("failed to read {}", events.display()))?;
            let submissions = dataset::read_submissions(&submissions)
                .with_context(|| format!("failed to read {}", submissions.display()))?;
            write_dataset(&events, &submissions, &config, &out_x, &out_y)?;
        }
        Commands::Report {
            events,
            submissions,
            out,
            config,
        } => {
            let config = config.resolve()?;
            let events = dataset::read_events(&events)
                .with_context(|| format!("failed to read {}", events.display()))?;
            let submissions = dataset::read_submissions(&submissions)
                .with_context(|| format!("failed to read {}", submissions.display()))?;

            let (x, y) = pipeline::get_x_y(&events, &submissions, &config)?;
            let passed_steps = labels::passed_steps(&events, &submissions)?;
            let report = report::build_report(&config, &x, &y, &passed_steps);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Import {
            events,
            submissions,
        } => {
            let pool = connect().await?;
            let event_rows = db::import_events_csv(&pool, &events).await?;
            let submission_rows = db::import_submissions_csv(&pool, &submissions).await?;
            println!("Inserted {event_rows} events and {submission_rows} submissions.");
        }
        Commands::BuildFromDb {
            out_x,
            out_y,
            config,
        } => {
            let config = config.resolve()?;
            let pool = connect().await?;
            let events = db::fetch_events(&pool).await?;
            let submissions = db::fetch_submissions(&pool).await?;
            write_dataset(&events, &submissions, &config, &out_x, &out_y)?;
        }
    }

    Ok(())
}
