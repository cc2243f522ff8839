use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use progress_forecast::models::StudentTelemetry;
use progress_forecast::rng::WeightPolicy;
use progress_forecast::{batch, db, report, telemetry};

#[derive(Parser)]
#[command(name = "progress-forecast")]
#[command(about = "Multi-horizon progress forecasts for students with dyslexia", long_about = None)]
struct Cli {
    /// Postgres connection string; not needed when reading from --csv
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo students and progress records
    Seed,
    /// Import progress records from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Forecast students and print JSON
    Predict {
        /// Student email; all students when omitted
        #[arg(long)]
        student: Option<String>,
        /// Read records from a CSV file instead of the database
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Fixed weight seed for reproducible output
        #[arg(long, env = "FORECAST_SEED")]
        seed: Option<u64>,
    },
    /// Generate a markdown cohort report
    Report {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, env = "FORECAST_SEED")]
        seed: Option<u64>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<PgPool> {
    let database_url =
        database_url.context("DATABASE_URL must be set when no --csv source is given")?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn load_students(
    database_url: Option<&str>,
    csv: Option<&PathBuf>,
    student: Option<&str>,
) -> anyhow::Result<Vec<StudentTelemetry>> {
    match csv {
        Some(path) => {
            let mut students = telemetry::load_csv(path)?;
            if let Some(email) = student {
                students.retain(|s| s.student_id == email);
            }
            Ok(students)
        }
        None => {
            let pool = connect(database_url).await?;
            db::fetch_telemetry(&pool, student).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("progress_forecast=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&connect(database_url).await?).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&connect(database_url).await?).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&connect(database_url).await?, &csv).await?;
            println!("Inserted {inserted} progress records from {}.", csv.display());
        }
        Commands::Predict { student, csv, seed } => {
            let students = load_students(database_url, csv.as_ref(), student.as_deref()).await?;
            if students.is_empty() {
                println!("No students found.");
                return Ok(());
            }
            let reports = batch::forecast_cohort(&students, WeightPolicy::from_seed(seed));
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Commands::Report { csv, seed, out } => {
            let policy = WeightPolicy::from_seed(seed);
            let students = load_students(database_url, csv.as_ref(), None).await?;
            let reports = batch::forecast_cohort(&students, policy);
            let markdown = report::build_report(&reports, policy);
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
