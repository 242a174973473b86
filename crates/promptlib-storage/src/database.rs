//! High-level database interface.

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use promptlib_core::{Department, PromptStatus, UserStore, UserUpsert};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::{
    NewPrompt, Prompt, PromptFilter, PromptUpdate, SaveOutcome, SavedPromptEntry, User,
};
use crate::pool::ConnectionPool;
use crate::repository::{PromptsRepo, SavedPromptsRepo, UsersRepo};

/// High-level database interface for Promptlib.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "promptlib", "promptlib").ok_or_else(|| {
            StorageError::Config("Could not determine app data directory".into())
        })?;

        Ok(proj_dirs.data_dir().join("promptlib.db"))
    }

    /// Close the database. Fails while other clones are still alive.
    pub fn close(self) -> Result<()> {
        info!("Closing database");
        self.pool.close()
    }

    /// Version string of the linked SQLite library. Doubles as a liveness probe.
    pub fn sqlite_version(&self) -> Result<String> {
        let conn = self.pool.get()?;
        let version = conn.query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
        Ok(version)
    }

    // === Users ===

    /// Insert or refresh a user record.
    pub fn upsert_user(&self, user: &UserUpsert) -> Result<()> {
        let conn = self.pool.get()?;
        UsersRepo::upsert(&conn, user)
    }

    /// Get a user by email.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        UsersRepo::get_by_email(&conn, email)
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        UsersRepo::get_by_id(&conn, id)
    }

    // === Prompts ===

    /// Create a prompt and return it as stored. New prompts are always pending.
    pub fn create_prompt(&self, prompt: NewPrompt) -> Result<Prompt> {
        let conn = self.pool.get()?;
        let id = PromptsRepo::insert(&conn, &prompt)?;
        debug!(id, creator = %prompt.creator_id, "Created prompt");

        PromptsRepo::get_by_id(&conn, id)?
            .ok_or_else(|| StorageError::NotFound(format!("prompt {}", id)))
    }

    /// List prompts matching a filter, newest first.
    pub fn list_prompts(&self, filter: &PromptFilter) -> Result<Vec<Prompt>> {
        let conn = self.pool.get()?;
        PromptsRepo::list(&conn, filter)
    }

    /// Get a prompt by ID.
    pub fn get_prompt(&self, id: i64) -> Result<Option<Prompt>> {
        let conn = self.pool.get()?;
        PromptsRepo::get_by_id(&conn, id)
    }

    /// Get every prompt a user created, whatever its status.
    pub fn get_prompts_by_creator(&self, creator_id: &str) -> Result<Vec<Prompt>> {
        let conn = self.pool.get()?;
        PromptsRepo::list_by_creator(&conn, creator_id)
    }

    /// Apply a partial edit. The prompt goes back to pending.
    ///
    /// Returns the updated prompt, or `None` if it does not exist.
    pub fn update_prompt(&self, id: i64, update: &PromptUpdate) -> Result<Option<Prompt>> {
        let conn = self.pool.get()?;
        if !PromptsRepo::update(&conn, id, update)? {
            return Ok(None);
        }
        PromptsRepo::get_by_id(&conn, id)
    }

    /// Delete a prompt and every bookmark of it.
    pub fn delete_prompt(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        PromptsRepo::delete(&conn, id)
    }

    /// Move a prompt to a new moderation status.
    pub fn moderate_prompt(&self, id: i64, target: PromptStatus) -> Result<Prompt> {
        let conn = self.pool.get()?;
        let current = PromptsRepo::get_by_id(&conn, id)?
            .ok_or_else(|| StorageError::NotFound(format!("prompt {}", id)))?;

        if !current.status.can_moderate_to(target) {
            return Err(StorageError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        PromptsRepo::set_status(&conn, id, target)?;
        info!(id, from = %current.status, to = %target, "Moderated prompt");

        PromptsRepo::get_by_id(&conn, id)?
            .ok_or_else(|| StorageError::NotFound(format!("prompt {}", id)))
    }

    /// Count approved prompts per department. Departments without any are absent.
    pub fn count_approved_by_department(&self) -> Result<HashMap<Department, i64>> {
        let conn = self.pool.get()?;
        PromptsRepo::count_approved_by_department(&conn)
    }

    // === Saved prompts ===

    /// Bookmark a prompt for a user.
    pub fn save_prompt(&self, user_id: &str, prompt_id: i64) -> Result<SaveOutcome> {
        let conn = self.pool.get()?;
        SavedPromptsRepo::save(&conn, user_id, prompt_id)
    }

    /// Remove a bookmark.
    pub fn unsave_prompt(&self, user_id: &str, prompt_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        SavedPromptsRepo::unsave(&conn, user_id, prompt_id)
    }

    /// Get a user's saved prompts, most recently saved first.
    pub fn get_saved_prompts(&self, user_id: &str) -> Result<Vec<SavedPromptEntry>> {
        let conn = self.pool.get()?;
        SavedPromptsRepo::list_by_user(&conn, user_id)
    }

    /// Check whether a user has saved a prompt.
    pub fn is_prompt_saved(&self, user_id: &str, prompt_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        SavedPromptsRepo::is_saved(&conn, user_id, prompt_id)
    }
}

impl UserStore for Database {
    type Error = StorageError;

    fn upsert_user(&self, user: &UserUpsert) -> Result<()> {
        Database::upsert_user(self, user)
    }

    fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>> {
        Ok(self.get_user_by_email(email)?.map(|user| user.id))
    }
}
