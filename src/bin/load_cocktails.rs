use std::path::PathBuf;

use clap::Parser;
use cocktail_catalog::{
    config::DbConfig,
    error::{ApiError, Error},
    loader::{load_cocktails, parse_records},
    logging,
    postgres::{run_migrations, PgStore},
};

/// Replaces the recipe table with the contents of a JSON export.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file holding an array of cocktail records
    file: PathBuf,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

async fn run(args: &Args) -> Result<(), Error> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|e| ApiError::InvalidRequest.new(&format!("Cannot read {}: {e}", args.file.display())))?;
    let records = parse_records(&text)?;

    let store = PgStore::connect(&DbConfig::new(&args.database_url)).await?;
    run_migrations(store.pool()).await?;

    let summary = load_cocktails(records, &store).await?;
    log::info!(
        "Done: {} loaded, {} skipped, {} cocktails in the database",
        summary.loaded,
        summary.skipped,
        summary.total_in_store
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init(&args.log_level);

    if let Err(e) = run(&args).await {
        log::error!("Loading failed: {e}");
        std::process::exit(1);
    }
}
