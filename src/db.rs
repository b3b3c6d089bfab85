use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connects to the store and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    // Every pooled connection to an in-memory SQLite database would see its own empty database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    tracing::info!(
        "Connecting to database: {}",
        if database_url.starts_with("postgres") { "PostgreSQL" } else { "SQLite" }
    );

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
