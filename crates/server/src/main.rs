//! MedRec server
//!
//! Command line entry point: `medrec serve` starts the HTTP API and
//! `medrec seed` fills the database with demo prescriptions.

use clap::{Args, Parser, Subcommand};
use medrec_persistence::backends::sqlite::SqliteBackend;
use medrec_persistence::seed::{DEFAULT_SEED_COUNT, SeedOptions, seed_prescriptions};
use medrec_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::{info, warn};

/// MedRec patients, medications and prescriptions service.
#[derive(Debug, Parser)]
#[command(name = "medrec", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server.
    Serve(ServerConfig),

    /// Replace every prescription with randomly generated demo data.
    Seed(SeedArgs),
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// Number of prescriptions to generate.
    #[arg(long = "prescription", value_name = "N", default_value_t = DEFAULT_SEED_COUNT)]
    count: usize,

    /// Insert sample patients and medications when none are usable.
    #[arg(long)]
    bootstrap: bool,

    /// SQLite database path.
    #[arg(long, env = "MEDREC_DATABASE_URL", default_value = "medrec.db")]
    database_url: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MEDREC_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Opens the SQLite database and creates the schema if needed.
fn open_backend(database_url: &str) -> anyhow::Result<SqliteBackend> {
    info!(database = %database_url, "Initializing SQLite backend");
    let backend = SqliteBackend::open(database_url)?;
    backend.init_schema()?;
    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        database = %config.database_url,
        "Starting MedRec server"
    );

    let backend = open_backend(&config.database_url)?;
    let app = create_app_with_config(backend, config.clone());

    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Runs the demo data generator.
async fn seed(args: SeedArgs) -> anyhow::Result<()> {
    if args.database_url == ":memory:" {
        warn!("Seeding an in-memory database; the data is lost on exit");
    }

    let backend = open_backend(&args.database_url)?;
    let options = SeedOptions {
        count: args.count,
        today: chrono::Local::now().date_naive(),
        bootstrap: args.bootstrap,
    };

    let report = seed_prescriptions(&backend, &mut rand::thread_rng(), &options).await?;

    println!(
        "{} prescriptions removed, {} prescriptions created",
        report.removed, report.created
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => {
            init_logging(&config.log_level);
            serve(config).await
        }
        Command::Seed(args) => {
            init_logging(&args.log_level);
            seed(args).await
        }
    }
}
