//! Promptlib Server - HTTP API server.
//!
//! This crate provides the HTTP API for the prompt library.
//!
//! ## Endpoints
//!
//! - `GET /api/prompts` - List prompts (approved by default)
//! - `POST /api/prompts` - Submit a prompt (requires auth)
//! - `GET|PUT|DELETE /api/prompts/{id}` - Read, edit or delete a prompt
//! - `GET /api/prompts/my` - The caller's own prompts
//! - `GET /api/prompts/saved` - The caller's saved prompts
//! - `POST|DELETE /api/prompts/{id}/save` - Save or unsave a prompt
//! - `GET /api/departments` - Departments with approved prompt counts
//! - `POST /api/auth/signin`, `GET /api/auth/session`, `POST /api/auth/signout`
//! - `GET /api/health` - Database liveness
//! - `POST /api/seed` - Load sample prompts (when enabled)
//!
//! ## Example
//!
//! ```no_run
//! use promptlib_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default()).await.unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

mod auth;
pub mod error;
mod handlers;
pub mod models;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use promptlib_core::identity::DEFAULT_SESSION_TIMEOUT;
use promptlib_storage::Database;

pub use error::{ApiError, Result};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 48780;

/// Default server host (localhost only).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 48780).
    pub port: u16,
    /// Database path (None = in-memory).
    pub db_path: Option<String>,
    /// Only accept sign-ins from this email domain.
    pub allowed_domain: Option<String>,
    /// Session idle timeout.
    pub session_timeout: Duration,
    /// Allow `POST /api/seed`.
    pub enable_seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
            allowed_domain: None,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            enable_seed: false,
        }
    }
}

impl ServerConfig {
    /// Creates a config with a specific database path.
    pub fn with_db_path(path: impl Into<String>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Restricts sign-in to one email domain.
    pub fn with_allowed_domain(mut self, domain: Option<String>) -> Self {
        self.allowed_domain = domain;
        self
    }

    /// Sets the session idle timeout.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Enables or disables the seed endpoint.
    pub fn with_seed(mut self, enabled: bool) -> Self {
        self.enable_seed = enabled;
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] promptlib_storage::StorageError),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// Builds the API router over `state`.
pub fn build_router(state: AppState) -> Router {
    // Browser front-ends are served from elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/prompts",
            get(handlers::list_prompts).post(handlers::create_prompt),
        )
        .route("/api/prompts/my", get(handlers::my_prompts))
        .route("/api/prompts/saved", get(handlers::saved_prompts))
        .route(
            "/api/prompts/{id}",
            get(handlers::get_prompt)
                .put(handlers::update_prompt)
                .delete(handlers::delete_prompt),
        )
        .route(
            "/api/prompts/{id}/save",
            post(handlers::save_prompt).delete(handlers::unsave_prompt),
        )
        .route("/api/departments", get(handlers::list_departments))
        .route("/api/auth/signin", post(handlers::sign_in))
        .route("/api/auth/session", get(handlers::get_session))
        .route("/api/auth/signout", post(handlers::sign_out))
        .route("/api/health", get(handlers::health))
        .route("/api/seed", post(handlers::seed_database))
        .layer(cors)
        .with_state(state)
}

/// The HTTP API server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub async fn new(config: ServerConfig) -> std::result::Result<Self, ServerError> {
        let db = if let Some(ref path) = config.db_path {
            Database::with_path(path)?
        } else {
            Database::in_memory()?
        };

        Self::with_database(config, db)
    }

    /// Creates a server with an existing database.
    pub fn with_database(
        config: ServerConfig,
        db: Database,
    ) -> std::result::Result<Self, ServerError> {
        let state = AppState::with_config(db, &config);
        Self::with_state(config, state)
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        let router = build_router(state);

        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self { router, addr })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server until the process is stopped.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the server until `shutdown` resolves, then drains open connections.
    pub async fn run_until<F>(self, shutdown: F) -> std::result::Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting Promptlib API server on {}", self.addr);

        let domain = if self.addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };

        // SO_REUSEADDR so a restart can bind while old sockets linger
        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .set_reuse_address(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        socket
            .bind(&self.addr.into())
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .listen(128)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        // Non-blocking for tokio
        socket
            .set_nonblocking(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = tokio::net::TcpListener::from_std(std_listener)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        info!("API server stopped");
        Ok(())
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
