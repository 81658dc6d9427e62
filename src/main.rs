mod config;
mod database;
mod entities;
mod http_server;
mod logging;
mod ports;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "VENUE_BOOKING_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Database connection URL (overrides the config file)
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Log every SQL statement
    #[arg(long, env = "SQL_ECHO", global = true)]
    sql_echo: bool,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "VENUE_BOOKING_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the booking site over HTTP
    Serve {
        /// The address to bind
        #[arg(long, default_value = "127.0.0.1", env = "VENUE_BOOKING_HOST")]
        host: String,

        /// The port to run the server on
        #[arg(short, long, default_value = "5000", env = "VENUE_BOOKING_HTTP_PORT")]
        port: u16,
    },
    /// Run pending database migrations and exit
    Migrate,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .context("Failed to load venue-booking config")?;

    let sql_echo = args.sql_echo || config.sql_echo;
    let log_file = args.log_file.clone().or_else(|| config.log_file.clone());
    setup_logging(args.log_level, log_file, args.log_file_level, sql_echo)?;

    log::debug!("Venue booking starting");

    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(|| config.database_url());

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config at: {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Migrate => {
            Database::connect(&database_url, sql_echo).await?;
            log::info!("Migrations complete");
        }
        Commands::Serve { host, port } => {
            let database = Database::connect(&database_url, sql_echo).await?;
            log::info!("Starting HTTP server on {}:{}", host, port);
            http_server::app::start(HttpServerConfig {
                host,
                port,
                database,
            })
            .await?;
        }
    }

    Ok(())
}
