//! Application state for the API server.

use std::sync::Arc;

use promptlib_core::IdentityBridge;
use promptlib_storage::{Database, Result as StorageResult};

use crate::ServerConfig;

/// Identity bridge backed by the shared database.
pub type Identity = IdentityBridge<Arc<Database>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Arc<Database>,
    /// Sign-in and session handling.
    pub identity: Arc<Identity>,
    /// Whether `POST /api/seed` is allowed.
    pub enable_seed: bool,
}

impl AppState {
    /// Creates a new application state with the given database and default settings.
    pub fn new(db: Database) -> Self {
        Self::with_config(db, &ServerConfig::default())
    }

    /// Creates application state using the identity and seeding settings from `config`.
    pub fn with_config(db: Database, config: &ServerConfig) -> Self {
        let db = Arc::new(db);
        let identity = IdentityBridge::new(Arc::clone(&db))
            .with_allowed_domain(config.allowed_domain.clone())
            .with_session_timeout(config.session_timeout);

        Self {
            db,
            identity: Arc::new(identity),
            enable_seed: config.enable_seed,
        }
    }

    /// Creates application state with an in-memory database.
    pub fn in_memory() -> StorageResult<Self> {
        Ok(Self::new(Database::in_memory()?))
    }
}
