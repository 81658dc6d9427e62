use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Connect to the database at `url` and run pending migrations
    pub async fn connect(url: &str, sql_echo: bool) -> Result<Self> {
        log::debug!("Connecting to database: {}", url);

        if let Some(path) = sqlite_file_path(url) {
            // Create parent directories if they don't exist
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).context(format!(
                    "Failed to create database directory: {}",
                    parent.display()
                ))?;
            }
        }

        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(sql_echo)
            .sqlx_logging_level(log::LevelFilter::Info);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", url))?;

        let database = Database { conn };
        database.migrate().await?;

        log::info!("Database ready at: {}", url);
        Ok(database)
    }

    /// Apply every migration that has not run yet
    pub async fn migrate(&self) -> Result<()> {
        log::debug!("Running database migrations");
        migration::Migrator::up(&self.conn, None)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

/// Filesystem path of a `sqlite://` URL, or `None` for in-memory and
/// non-SQLite URLs.
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(Path::new(path))
}
