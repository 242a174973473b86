//! Saved prompt (bookmark) repository.

use rusqlite::{ffi, params, Connection};

use crate::error::{Result, StorageError};
use crate::models::{SaveOutcome, SavedPromptEntry};
use crate::repository::prompts::{row_to_prompt, PROMPT_COLUMNS};
use crate::repository::timestamp_column;

/// Repository for saved prompt operations.
pub struct SavedPromptsRepo;

impl SavedPromptsRepo {
    /// Save a prompt for a user.
    ///
    /// A single insert; the UNIQUE(user_id, prompt_id) constraint decides
    /// whether the bookmark already existed.
    pub fn save(conn: &Connection, user_id: &str, prompt_id: i64) -> Result<SaveOutcome> {
        let result = conn.execute(
            "INSERT INTO saved_prompts (user_id, prompt_id) VALUES (?1, ?2)",
            params![user_id, prompt_id],
        );

        match result {
            Ok(_) => Ok(SaveOutcome::Saved),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Ok(SaveOutcome::AlreadySaved)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                // SQLite does not say which reference failed
                Err(StorageError::NotFound(format!(
                    "prompt {} or user {}",
                    prompt_id, user_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a bookmark. Returns false if there was none.
    pub fn unsave(conn: &Connection, user_id: &str, prompt_id: i64) -> Result<bool> {
        let deleted = conn.execute(
            "DELETE FROM saved_prompts WHERE user_id = ?1 AND prompt_id = ?2",
            params![user_id, prompt_id],
        )?;
        Ok(deleted > 0)
    }

    /// List a user's saved prompts, most recently saved first.
    pub fn list_by_user(conn: &Connection, user_id: &str) -> Result<Vec<SavedPromptEntry>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, sp.created_at
             FROM saved_prompts sp
             JOIN prompts p ON p.id = sp.prompt_id
             WHERE sp.user_id = ?1
             ORDER BY sp.created_at DESC, sp.id DESC",
            PROMPT_COLUMNS
        ))?;

        let entries = stmt
            .query_map([user_id], |row| {
                Ok(SavedPromptEntry {
                    prompt: row_to_prompt(row)?,
                    saved_at: timestamp_column(row, 10)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Check whether a user has saved a prompt.
    pub fn is_saved(conn: &Connection, user_id: &str, prompt_id: i64) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM saved_prompts WHERE user_id = ?1 AND prompt_id = ?2",
            params![user_id, prompt_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{add_user, new_prompt, setup_db};
    use crate::repository::PromptsRepo;
    use promptlib_core::Department;

    #[test]
    fn test_save_then_save_again() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();

        assert_eq!(
            SavedPromptsRepo::save(&conn, &user, id).unwrap(),
            SaveOutcome::Saved
        );
        assert_eq!(
            SavedPromptsRepo::save(&conn, &user, id).unwrap(),
            SaveOutcome::AlreadySaved
        );

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM saved_prompts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_save_missing_prompt_is_not_found() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");

        let result = SavedPromptsRepo::save(&conn, &user, 404);
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_save_for_unknown_user_is_not_found() {
        let conn = setup_db();
        let owner = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&owner, "X", Department::Sales)).unwrap();

        match SavedPromptsRepo::save(&conn, "ghost", id) {
            Err(StorageError::NotFound(what)) => {
                assert_eq!(what, format!("prompt {} or user ghost", id));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unsave() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();

        SavedPromptsRepo::save(&conn, &user, id).unwrap();
        assert!(SavedPromptsRepo::is_saved(&conn, &user, id).unwrap());

        assert!(SavedPromptsRepo::unsave(&conn, &user, id).unwrap());
        assert!(!SavedPromptsRepo::is_saved(&conn, &user, id).unwrap());
        assert!(!SavedPromptsRepo::unsave(&conn, &user, id).unwrap());
    }

    #[test]
    fn test_list_by_user_newest_first() {
        let conn = setup_db();
        let ada = add_user(&conn, "ada@example.com");
        let bob = add_user(&conn, "bob@example.com");

        let a = PromptsRepo::insert(&conn, &new_prompt(&ada, "a", Department::Sales)).unwrap();
        let b = PromptsRepo::insert(&conn, &new_prompt(&ada, "b", Department::Design)).unwrap();

        SavedPromptsRepo::save(&conn, &bob, b).unwrap();
        SavedPromptsRepo::save(&conn, &bob, a).unwrap();

        let saved = SavedPromptsRepo::list_by_user(&conn, &bob).unwrap();
        let ids: Vec<i64> = saved.iter().map(|e| e.prompt.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(saved[1].prompt.department, Department::Design);

        assert!(SavedPromptsRepo::list_by_user(&conn, &ada).unwrap().is_empty());
    }

    #[test]
    fn test_deleting_prompt_removes_bookmarks() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();
        SavedPromptsRepo::save(&conn, &user, id).unwrap();

        PromptsRepo::delete(&conn, id).unwrap();

        assert!(SavedPromptsRepo::list_by_user(&conn, &user).unwrap().is_empty());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM saved_prompts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
