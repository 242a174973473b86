//! Promptlib Storage - SQLite persistence layer.
//!
//! This crate provides database storage for the prompt library.
//! It handles:
//!
//! - Users, keyed by an id derived from their email
//! - Prompts and their moderation status
//! - Per-user saved prompts (bookmarks)
//! - Department counts of approved prompts
//!
//! # Example
//!
//! ```no_run
//! use promptlib_core::{Category, Department, PromptStatus};
//! use promptlib_storage::{Database, NewPrompt, PromptFilter};
//!
//! let db = Database::in_memory().unwrap();
//!
//! let prompt = db.create_prompt(NewPrompt {
//!     title: "Weekly status".to_string(),
//!     description: "Summarize the week".to_string(),
//!     department: Department::ProjectManagement,
//!     category: Category::Reporting,
//!     prompt: "Summarize [PROJECT] progress".to_string(),
//!     creator_id: "user-id".to_string(),
//! }).unwrap();
//!
//! db.moderate_prompt(prompt.id, PromptStatus::Approved).unwrap();
//! let listed = db.list_prompts(&PromptFilter::approved()).unwrap();
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;
pub mod seed;

pub use database::Database;
pub use error::{Result, StorageError};
pub use models::{
    NewPrompt, Prompt, PromptFilter, PromptUpdate, SaveOutcome, SavedPromptEntry, User,
};
pub use pool::ConnectionPool;
pub use schema::SCHEMA_VERSION;
