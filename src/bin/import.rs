use std::env;
use std::fs;

use anyhow::{bail, Context};
use portfolio_tracker::config::Config;
use portfolio_tracker::db;
use portfolio_tracker::import::{import_companies, prepare_csv};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage: portfolio-import [--dry-run] <file.csv>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing (INFO level)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenvy::dotenv();

    // Command-line flags
    let args: Vec<String> = env::args().skip(1).collect();
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let Some(path) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!(USAGE);
    };

    let input = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;

    // Parse and validate before opening the store; a bad file never touches the database
    let companies = match prepare_csv(&input) {
        Ok(companies) => companies,
        Err(e) => {
            error!(file = %path, "{}", e);
            bail!("import rejected: {}", e);
        }
    };
    info!(file = %path, rows = companies.len(), "File is valid");

    if dry_run {
        for company in &companies {
            info!(
                name = %company.name,
                total_funding = company.total_funding,
                current_revenue = company.current_revenue,
                investors = company.investor_list.len(),
                "Would import"
            );
        }
        info!("Dry run; nothing written");
        return Ok(());
    }

    let config = Config::from_env()?;
    let db_conn = db::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let created = import_companies(&db_conn, companies).await?;
    for company in &created {
        info!(id = %company.id, name = %company.name, "Imported");
    }
    info!("Imported {} companies from {}", created.len(), path);
    Ok(())
}
