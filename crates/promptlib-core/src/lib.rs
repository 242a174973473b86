//! Promptlib Core - taxonomies, moderation, and identity.
//!
//! This crate holds the storage-independent rules of the prompt library:
//!
//! - Closed department and category taxonomies
//! - The prompt moderation status and its transitions
//! - Input validation for submissions and filters
//! - The identity bridge from external sign-in to local users and sessions

pub mod identity;
pub mod moderation;
pub mod summary;
pub mod taxonomy;
pub mod validation;

pub use identity::{
    AuthError, ExternalIdentity, IdentityBridge, Session, SessionToken, SignIn, UserStore,
    UserUpsert,
};
pub use moderation::PromptStatus;
pub use summary::{department_summaries, DepartmentSummary};
pub use taxonomy::{Category, Department};
pub use validation::ValidationError;
