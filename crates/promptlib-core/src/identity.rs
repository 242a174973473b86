//! Identity bridge between an external OAuth sign-in and local users.
//!
//! The OAuth handshake itself happens elsewhere. This module receives the
//! verified identity, keeps the local `users` table in step with it, and
//! hands out session tokens.
//!
//! ## Flow
//!
//! - Sign-in: derive a stable user id from the email, upsert the user row,
//!   then issue a session token. A failed upsert refuses the sign-in.
//! - Session: resolve a token, look the user up by email and attach its id.
//!   A failed lookup leaves the session without an id.
//!
//! ## Usage
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//! use promptlib_core::identity::{ExternalIdentity, IdentityBridge, UserStore, UserUpsert};
//!
//! #[derive(Default)]
//! struct Users(Mutex<HashMap<String, String>>);
//!
//! impl UserStore for Users {
//!     type Error = std::convert::Infallible;
//!
//!     fn upsert_user(&self, user: &UserUpsert) -> Result<(), Self::Error> {
//!         self.0.lock().unwrap().insert(user.email.clone(), user.id.clone());
//!         Ok(())
//!     }
//!
//!     fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>, Self::Error> {
//!         Ok(self.0.lock().unwrap().get(email).cloned())
//!     }
//! }
//!
//! let bridge = IdentityBridge::new(Users::default());
//! let signed_in = bridge
//!     .sign_in(ExternalIdentity::new("google", "ada@example.com", "Ada"))
//!     .unwrap();
//!
//! let session = bridge.session(&signed_in.token).unwrap();
//! assert_eq!(session.user_id, signed_in.user_id);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default idle timeout for sessions (24 hours).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Length of generated session tokens.
const TOKEN_LENGTH: usize = 43;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email is outside the allowed workspace domain.
    #[error("sign-in rejected: {0} is not in the allowed domain")]
    DomainRejected(String),

    /// The user row could not be written, so sign-in is refused.
    #[error("failed to create or update user: {0}")]
    UpsertFailed(String),

    /// Session expired or unknown.
    #[error("session expired or invalid")]
    SessionInvalid,
}

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// A verified identity handed over by the external OAuth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Provider name, e.g. `google`.
    pub provider: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl ExternalIdentity {
    /// Creates an identity with an email and name and no image.
    pub fn new(
        provider: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            email: Some(email.into()),
            name: Some(name.into()),
            image: None,
        }
    }

    /// Sets the avatar image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// User fields written on every sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpsert {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

/// Persistence needed by the identity bridge.
pub trait UserStore {
    type Error: fmt::Display;

    /// Insert the user, or refresh name/image/updated_at if the email exists.
    fn upsert_user(&self, user: &UserUpsert) -> std::result::Result<(), Self::Error>;

    /// Look up a user id by email.
    fn find_user_id_by_email(&self, email: &str) -> std::result::Result<Option<String>, Self::Error>;
}

impl<S: UserStore> UserStore for Arc<S> {
    type Error = S::Error;

    fn upsert_user(&self, user: &UserUpsert) -> std::result::Result<(), Self::Error> {
        (**self).upsert_user(user)
    }

    fn find_user_id_by_email(&self, email: &str) -> std::result::Result<Option<String>, Self::Error> {
        (**self).find_user_id_by_email(email)
    }
}

/// Derive the stable user id for an email.
///
/// The email is trimmed and lowercased, hashed with SHA-256, and the first
/// 16 bytes are hex-encoded.
pub fn user_id_for_email(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_email(email).as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` belongs to `domain` (case-insensitive).
pub fn email_in_domain(email: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches('@').to_lowercase();
    email
        .trim()
        .rsplit_once('@')
        .map(|(_, d)| d.to_lowercase() == domain)
        .unwrap_or(false)
}

/// An opaque session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new random session token.
    pub fn new() -> Self {
        let token: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Create a session token from an existing string.
    ///
    /// Used for reconstructing tokens from request headers.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the token as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity data carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
struct SessionData {
    claims: SessionClaims,
    last_used: Instant,
}

impl SessionData {
    fn new(claims: SessionClaims) -> Self {
        Self {
            claims,
            last_used: Instant::now(),
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_used.elapsed() > timeout
    }

    fn touch(&mut self) {
        self.last_used = Instant::now();
    }
}

/// Manages active sessions with idle expiry.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<SessionToken, SessionData>>>,
    timeout: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a session manager with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_SESSION_TIMEOUT)
    }

    /// Create a session manager with a custom idle timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout,
        }
    }

    /// Create a new session and return its token.
    pub fn create_session(&self, claims: SessionClaims) -> SessionToken {
        let token = SessionToken::new();

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions.insert(token.clone(), SessionData::new(claims));

        // Clean up expired sessions while we have the lock
        let timeout = self.timeout;
        sessions.retain(|_, data| !data.is_expired(timeout));

        token
    }

    /// Validate a token, refresh its expiry, and return its claims.
    pub fn validate_session(&self, token: &SessionToken) -> Option<SessionClaims> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let expired = match sessions.get_mut(token) {
            Some(data) if data.is_expired(self.timeout) => true,
            Some(data) => {
                data.touch();
                return Some(data.claims.clone());
            }
            None => return None,
        };

        if expired {
            sessions.remove(token);
        }
        None
    }

    /// Invalidate (logout) a session.
    pub fn invalidate_session(&self, token: &SessionToken) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    /// Get the number of active (non-expired) sessions.
    pub fn active_session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|d| !d.is_expired(self.timeout))
            .count()
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub token: SessionToken,
    /// Local user id, absent when the identity had no email or name.
    pub user_id: Option<String>,
}

/// A materialized session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    /// Owner id for authorization checks. `None` means unauthenticated.
    pub user_id: Option<String>,
}

/// Maps external identities to local users and sessions.
#[derive(Debug)]
pub struct IdentityBridge<S> {
    store: S,
    sessions: SessionManager,
    allowed_domain: Option<String>,
}

impl<S: UserStore> IdentityBridge<S> {
    /// Create a bridge over a user store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            sessions: SessionManager::new(),
            allowed_domain: None,
        }
    }

    /// Only accept emails from this domain.
    pub fn with_allowed_domain(mut self, domain: Option<String>) -> Self {
        self.allowed_domain = domain.filter(|d| !d.trim().is_empty());
        self
    }

    /// Use a custom session idle timeout.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.sessions = SessionManager::with_timeout(timeout);
        self
    }

    /// The underlying user store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The session manager.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Handle a verified sign-in.
    pub fn sign_in(&self, identity: ExternalIdentity) -> Result<SignIn> {
        let email = identity
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty());
        let email = email.as_deref();
        let name = identity
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        info!(provider = %identity.provider, email = ?email, "Sign-in attempt");

        if let (Some(domain), Some(email)) = (self.allowed_domain.as_deref(), email) {
            if !email_in_domain(email, domain) {
                warn!(email, domain, "Sign-in rejected by domain restriction");
                return Err(AuthError::DomainRejected(email.to_string()));
            }
        }

        let user_id = match (email, name) {
            (Some(email), Some(name)) => {
                let user = UserUpsert {
                    id: user_id_for_email(email),
                    email: email.to_string(),
                    name: name.to_string(),
                    image: identity.image.clone(),
                };

                self.store.upsert_user(&user).map_err(|e| {
                    warn!(email, error = %e, "User upsert failed, refusing sign-in");
                    AuthError::UpsertFailed(e.to_string())
                })?;

                debug!(email, user_id = %user.id, "User upserted");
                Some(user.id)
            }
            _ => {
                warn!(?email, ?name, "Identity missing email or name, user not stored");
                None
            }
        };

        let token = self.sessions.create_session(SessionClaims {
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            image: identity.image,
        });

        Ok(SignIn { token, user_id })
    }

    /// Resolve a token into a session, attaching the local user id.
    pub fn session(&self, token: &SessionToken) -> Option<Session> {
        let claims = self.sessions.validate_session(token)?;

        let user_id = claims.email.as_deref().and_then(|email| {
            match self.store.find_user_id_by_email(email) {
                Ok(found) => found,
                Err(e) => {
                    warn!(email, error = %e, "User lookup failed, session has no user id");
                    None
                }
            }
        });

        Some(Session {
            email: claims.email,
            name: claims.name,
            image: claims.image,
            user_id,
        })
    }

    /// End a session.
    pub fn sign_out(&self, token: &SessionToken) {
        self.sessions.invalidate_session(token);
    }
}
