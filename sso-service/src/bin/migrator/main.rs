use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// `migrator` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrator",
    about = "Apply SQL migrations from a directory to the sso storage",
    version
)]
struct CliArgs {
    /// Path to the SQLite database file.
    #[arg(long = "storage-path", value_name = "path")]
    storage_path: String,
    /// Directory holding `<version>_<description>.sql` migrations.
    #[arg(long = "migrations-path", value_name = "path")]
    migrations_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let connect_options =
        SqliteConnectOptions::from_str(&args.storage_path)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .with_context(|| format!("open storage {}", args.storage_path))?;

    let mut migrator = Migrator::new(args.migrations_path.as_path())
        .await
        .with_context(|| format!("read migrations from {}", args.migrations_path.display()))?;
    // Other directories (e.g. test fixtures) may share the same database
    migrator.set_ignore_missing(true);

    let pending = pending_versions(&migrator, &pool).await?;
    if pending.is_empty() {
        tracing::info!("No migrations to apply");
        return Ok(());
    }

    migrator.run(&pool).await?;
    tracing::info!(versions = ?pending, "Applied migrations");

    pool.close().await;
    Ok(())
}

async fn pending_versions(
    migrator: &Migrator,
    pool: &sqlx::SqlitePool,
) -> Result<Vec<i64>, anyhow::Error> {
    let applied = sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations")
        .fetch_all(pool)
        .await;

    let applied: Vec<i64> = match applied {
        Ok(versions) => versions,
        // Table does not exist before the first run
        Err(sqlx::Error::Database(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    Ok(migrator
        .iter()
        .map(|migration| migration.version)
        .filter(|version| !applied.contains(version))
        .collect())
}
