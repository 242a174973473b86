//! User repository.

use promptlib_core::UserUpsert;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::User;
use crate::repository::timestamp_column;

const USER_COLUMNS: &str = "id, email, name, image, created_at, updated_at";

/// Repository for user operations.
pub struct UsersRepo;

impl UsersRepo {
    /// Insert a user, or refresh name, image and updated_at on email conflict.
    pub fn upsert(conn: &Connection, user: &UserUpsert) -> Result<()> {
        conn.execute(
            "INSERT INTO users (id, email, name, image)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(email) DO UPDATE SET
                name = excluded.name,
                image = excluded.image,
                updated_at = datetime('now')",
            params![user.id, user.email, user.name, user.image],
        )?;

        Ok(())
    }

    /// Get a user by email.
    pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                [email],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Get a user by ID.
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                [id],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        image: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        updated_at: timestamp_column(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup_db;

    fn ada() -> UserUpsert {
        UserUpsert {
            id: "ada-id".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_upsert_inserts_new_user() {
        let conn = setup_db();

        UsersRepo::upsert(&conn, &ada()).unwrap();

        let user = UsersRepo::get_by_email(&conn, "ada@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "ada-id");
        assert_eq!(user.name, "Ada");
        assert!(user.image.is_none());
    }

    #[test]
    fn test_upsert_refreshes_existing_user() {
        let conn = setup_db();
        UsersRepo::upsert(&conn, &ada()).unwrap();

        let mut again = ada();
        again.name = "Ada Lovelace".to_string();
        again.image = Some("https://img/ada.png".to_string());
        UsersRepo::upsert(&conn, &again).unwrap();

        let user = UsersRepo::get_by_id(&conn, "ada-id").unwrap().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.image.as_deref(), Some("https://img/ada.png"));
        assert!(user.updated_at >= user.created_at);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_missing_user_is_none() {
        let conn = setup_db();

        assert!(UsersRepo::get_by_email(&conn, "nobody@example.com")
            .unwrap()
            .is_none());
        assert!(UsersRepo::get_by_id(&conn, "nobody").unwrap().is_none());
    }
}
