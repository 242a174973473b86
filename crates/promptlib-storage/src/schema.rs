//! Database schema and migrations.

use promptlib_core::{Category, Department, PromptStatus};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            "Running migrations from version {} to {}",
            current_version, SCHEMA_VERSION
        );

        if current_version < 1 {
            migrate_v1(conn)?;
        }

        if current_version < 2 {
            migrate_v2(conn)?;
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!("Migrations complete");
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// SQL list literal for a `CHECK (column IN (...))` constraint.
fn sql_value_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Migration to version 1: users, prompts, saved prompts.
fn migrate_v1(conn: &Connection) -> Result<()> {
    info!("Applying migration v1: Initial schema");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            image TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let departments: Vec<&str> = Department::all().iter().map(|d| d.as_str()).collect();
    let categories: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
    let statuses: Vec<&str> = PromptStatus::all().iter().map(|s| s.as_str()).collect();

    // Closed sets are mirrored as CHECK constraints so stored rows cannot
    // hold values the enums do not know.
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS prompts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                department TEXT NOT NULL CHECK (department IN ({})),
                category TEXT NOT NULL CHECK (category IN ({})),
                prompt TEXT NOT NULL,
                creator_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ({})),
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY (creator_id) REFERENCES users(id)
            )",
            sql_value_list(&departments),
            sql_value_list(&categories),
            sql_value_list(&statuses),
        ),
        [],
    )?;

    // Bookmarks go away with their prompt
    conn.execute(
        "CREATE TABLE IF NOT EXISTS saved_prompts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            prompt_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (prompt_id) REFERENCES prompts(id) ON DELETE CASCADE,
            UNIQUE (user_id, prompt_id)
        )",
        [],
    )?;

    Ok(())
}

/// Migration to version 2: Indexes for filtered listings.
fn migrate_v2(conn: &Connection) -> Result<()> {
    info!("Applying migration v2: Listing indexes");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_prompts_department ON prompts (department)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_prompts_status ON prompts (status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_prompts_creator ON prompts (creator_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_saved_prompts_user ON saved_prompts (user_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn insert_user(conn: &Connection) {
        conn.execute(
            "INSERT INTO users (id, email, name) VALUES ('u1', 'u1@example.com', 'U1')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_sql_value_list_quotes_each_value() {
        assert_eq!(sql_value_list(&["a", "b"]), "'a', 'b'");
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_indexes_created() {
        let conn = setup();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name IN
                 ('idx_prompts_department', 'idx_prompts_status', 'idx_prompts_creator', 'idx_saved_prompts_user')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let conn = setup();
        insert_user(&conn);

        conn.execute(
            "INSERT INTO prompts (title, description, department, category, prompt, creator_id)
             VALUES ('t', 'd', 'sales', 'email', 'p', 'u1')",
            [],
        )
        .unwrap();

        let status: String = conn
            .query_row("SELECT status FROM prompts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "pending");
    }

    #[test]
    fn test_check_constraints_reject_unknown_values() {
        let conn = setup();
        insert_user(&conn);

        let bad_department = conn.execute(
            "INSERT INTO prompts (title, description, department, category, prompt, creator_id)
             VALUES ('t', 'd', 'legal', 'email', 'p', 'u1')",
            [],
        );
        assert!(bad_department.is_err());

        let bad_status = conn.execute(
            "INSERT INTO prompts (title, description, department, category, prompt, creator_id, status)
             VALUES ('t', 'd', 'sales', 'email', 'p', 'u1', 'archived')",
            [],
        );
        assert!(bad_status.is_err());
    }

    #[test]
    fn test_prompt_requires_existing_creator() {
        let conn = setup();

        let result = conn.execute(
            "INSERT INTO prompts (title, description, department, category, prompt, creator_id)
             VALUES ('t', 'd', 'sales', 'email', 'p', 'ghost')",
            [],
        );
        assert!(result.is_err());
    }
}
