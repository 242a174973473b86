//! Promptlib - a shared library of AI prompt templates.
//!
//! This is the main binary. It opens the SQLite database, serves the HTTP
//! API until Ctrl-C, then closes the database.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;
use promptlib_server::{Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use promptlib_storage::Database;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// One year.
const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

/// Promptlib - a shared library of AI prompt templates
#[derive(Parser, Debug)]
#[command(name = "promptlib", version, about)]
struct Args {
    /// Host to bind the API server to
    #[arg(long, env = "PROMPTLIB_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the API server to
    #[arg(long, env = "PROMPTLIB_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Database file (default: promptlib.db in the app data directory)
    #[arg(long, env = "PROMPTLIB_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Only allow sign-in with emails from this domain
    #[arg(long, env = "PROMPTLIB_ALLOWED_DOMAIN")]
    allowed_domain: Option<String>,

    /// Session idle timeout in hours (1 to 8760)
    #[arg(
        long,
        env = "PROMPTLIB_SESSION_TTL_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SESSION_TTL_HOURS)
    )]
    session_ttl_hours: u64,

    /// Allow POST /api/seed to load sample prompts
    #[arg(long, env = "PROMPTLIB_ENABLE_SEED")]
    enable_seed: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn server_config(&self, db_path: &std::path::Path) -> ServerConfig {
        ServerConfig::with_db_path(db_path.to_string_lossy())
            .with_host(self.host.clone())
            .with_port(self.port)
            .with_allowed_domain(self.allowed_domain.clone())
            .with_session_timeout(Duration::from_secs(self.session_ttl_hours * 60 * 60))
            .with_seed(self.enable_seed)
    }
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "promptlib", "promptlib").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("promptlib={},warn", log_level)));

    // Try to set up file logging
    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("promptlib")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                if args.debug {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stdout))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                } else {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                }

                tracing::info!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the duration of the program
    let _log_guard = init_logging(&args);

    tracing::info!("Starting Promptlib...");
    tracing::debug!("Args: {:?}", args);

    let db_path = match args.db_path.clone() {
        Some(path) => path,
        None => Database::default_db_path()?,
    };
    let db = Database::with_path(&db_path)?;

    let server = Server::with_database(args.server_config(&db_path), db.clone())?;
    server.run_until(shutdown_signal()).await?;

    // The server has dropped its handles by now
    if let Err(e) = db.close() {
        tracing::warn!("Database not closed cleanly: {}", e);
    }

    tracing::info!("Promptlib shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["promptlib"]).unwrap();
        assert_eq!(args.port, DEFAULT_PORT);
        assert_eq!(args.session_ttl_hours, 24);
        assert!(!args.enable_seed);
        assert!(args.db_path.is_none());
    }

    #[test]
    fn test_server_config_from_args() {
        let args = Args::try_parse_from([
            "promptlib",
            "--host",
            "0.0.0.0",
            "--port",
            "9001",
            "--allowed-domain",
            "example.com",
            "--session-ttl-hours",
            "2",
            "--enable-seed",
        ])
        .unwrap();

        let config = args.server_config(std::path::Path::new("/tmp/promptlib.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9001);
        assert_eq!(config.allowed_domain.as_deref(), Some("example.com"));
        assert_eq!(config.session_timeout, Duration::from_secs(2 * 60 * 60));
        assert!(config.enable_seed);
        assert_eq!(config.db_path.as_deref(), Some("/tmp/promptlib.db"));
    }

    #[test]
    fn test_session_ttl_out_of_range_rejected() {
        assert!(Args::try_parse_from(["promptlib", "--session-ttl-hours", "0"]).is_err());
        assert!(Args::try_parse_from(["promptlib", "--session-ttl-hours", "8761"]).is_err());
        assert!(
            Args::try_parse_from(["promptlib", "--session-ttl-hours", "18446744073709551615"])
                .is_err()
        );

        let args = Args::try_parse_from(["promptlib", "--session-ttl-hours", "8760"]).unwrap();
        let config = args.server_config(std::path::Path::new("/tmp/promptlib.db"));
        assert_eq!(config.session_timeout, Duration::from_secs(8760 * 60 * 60));
    }
}
