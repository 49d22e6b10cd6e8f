// admin/main.rs - scripts for initializing and checking the bot database

use clap::{Parser, Subcommand};
use database::{
    init::drop_database, initialize, manifest, verify, InitOptions, DATABASE_NAME,
};
use dotenvy::dotenv;
use mongodb::Client;
use tracing::subscriber::set_global_default;
use tracing::{info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Parser, Debug)]
#[clap(name = "admin")]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommands,
    #[arg(
        long,
        env = "MONGODB_URI",
        default_value = "mongodb://localhost:27017"
    )]
    database_uri: String,
    #[arg(long, env = "DATABASE_NAME", default_value = DATABASE_NAME)]
    database_name: String,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Create the collections and indexes, keeping anything already present
    #[clap(name = "init-db")]
    InitDatabase {
        /// Drop the database before initializing it
        #[arg(long)]
        drop: bool,
        /// Request background index builds
        #[arg(long)]
        background: bool,
    },
    /// Compare the live schema with the declared one
    #[clap(name = "verify-db")]
    VerifyDatabase,
    /// Print the declared collections and indexes as JSON
    #[clap(name = "show-schema")]
    ShowSchema,
}

fn init_tracing() -> Result<(), String> {
    // Forward records from crates logging through `log`
    LogTracer::init().map_err(|e| e.to_string())?;

    let env_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| e.to_string())?;
    let fmt_layer = fmt::layer().with_target(true);
    let subscriber = Registry::default().with(env_layer).with(fmt_layer);
    set_global_default(subscriber).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Load environment variables from .env file
    dotenv().ok();

    // Parse CLI args, using ENV vars if not provided
    let args = Args::parse();

    init_tracing()?;

    if let Subcommands::ShowSchema = args.subcommand {
        let schema = serde_json::to_string_pretty(&manifest()).map_err(|e| e.to_string())?;
        println!("{}", schema);
        return Ok(());
    }

    // Create database client
    let db_client = Client::with_uri_str(&args.database_uri)
        .await
        .map_err(|e| format!("Failed to connect to database: {}", e))?;
    let db = db_client.database(&args.database_name);

    // Perform subcommand logic
    match args.subcommand {
        Subcommands::InitDatabase { drop, background } => {
            if drop {
                warn!("Dropping database {}.", args.database_name);
                drop_database(&db).await.map_err(|e| e.to_string())?;
            }

            info!("Initializing database {}.", args.database_name);
            let report = initialize(&db, &InitOptions { background })
                .await
                .map_err(|e| e.to_string())?;

            if !report.existing.is_empty() {
                info!("Already present: {}", report.existing.join(", "));
            }
            info!("Declared {} indexes.", report.indexes.len());
        }
        Subcommands::VerifyDatabase => {
            let report = verify(&db).await.map_err(|e| e.to_string())?;
            if report.is_clean() {
                info!("Database {} matches the declared schema.", args.database_name);
            } else {
                warn!("Database {} differs: {}", args.database_name, report);
            }
            report.ensure_clean().map_err(|e| e.to_string())?;
        }
        Subcommands::ShowSchema => {}
    }

    Ok(())
}
