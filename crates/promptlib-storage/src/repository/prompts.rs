//! Prompt repository.

use std::collections::HashMap;

use promptlib_core::{Category, Department, PromptStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{NewPrompt, Prompt, PromptFilter, PromptUpdate};
use crate::repository::{enum_column, timestamp_column};

/// Prompt columns, in the order `row_to_prompt` reads them.
pub(crate) const PROMPT_COLUMNS: &str = "p.id, p.title, p.description, p.department, p.category, \
     p.prompt, p.creator_id, p.status, p.created_at, p.updated_at";

/// Repository for prompt operations.
pub struct PromptsRepo;

impl PromptsRepo {
    /// Insert a new prompt. The status is always `pending`.
    pub fn insert(conn: &Connection, prompt: &NewPrompt) -> Result<i64> {
        conn.execute(
            "INSERT INTO prompts (title, description, department, category, prompt, creator_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                prompt.title,
                prompt.description,
                prompt.department.as_str(),
                prompt.category.as_str(),
                prompt.prompt,
                prompt.creator_id,
                PromptStatus::initial().as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a prompt by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Prompt>> {
        let prompt = conn
            .query_row(
                &format!("SELECT {} FROM prompts p WHERE p.id = ?1", PROMPT_COLUMNS),
                [id],
                row_to_prompt,
            )
            .optional()?;

        Ok(prompt)
    }

    /// List prompts matching the filter, newest first.
    pub fn list(conn: &Connection, filter: &PromptFilter) -> Result<Vec<Prompt>> {
        let mut sql = format!("SELECT {} FROM prompts p WHERE 1=1", PROMPT_COLUMNS);
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(department) = filter.department {
            sql.push_str(" AND p.department = ?");
            params_vec.push(Box::new(department.as_str()));
        }

        if let Some(category) = filter.category {
            sql.push_str(" AND p.category = ?");
            params_vec.push(Box::new(category.as_str()));
        }

        if let Some(status) = filter.status {
            sql.push_str(" AND p.status = ?");
            params_vec.push(Box::new(status.as_str()));
        }

        sql.push_str(" ORDER BY p.created_at DESC, p.id DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let prompts = stmt
            .query_map(params_refs.as_slice(), row_to_prompt)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(prompts)
    }

    /// List every prompt by a creator, any status, newest first.
    pub fn list_by_creator(conn: &Connection, creator_id: &str) -> Result<Vec<Prompt>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM prompts p WHERE p.creator_id = ?1
             ORDER BY p.created_at DESC, p.id DESC",
            PROMPT_COLUMNS
        ))?;

        let prompts = stmt
            .query_map([creator_id], row_to_prompt)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(prompts)
    }

    /// Apply a partial edit.
    ///
    /// Always stamps `updated_at` and puts the prompt back into `pending`,
    /// even when `update` is empty. Returns false if no row matched.
    pub fn update(conn: &Connection, id: i64, update: &PromptUpdate) -> Result<bool> {
        let mut sets: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = update.title {
            sets.push("title = ?");
            params_vec.push(Box::new(title.clone()));
        }

        if let Some(ref description) = update.description {
            sets.push("description = ?");
            params_vec.push(Box::new(description.clone()));
        }

        if let Some(department) = update.department {
            sets.push("department = ?");
            params_vec.push(Box::new(department.as_str()));
        }

        if let Some(category) = update.category {
            sets.push("category = ?");
            params_vec.push(Box::new(category.as_str()));
        }

        if let Some(ref prompt) = update.prompt {
            sets.push("prompt = ?");
            params_vec.push(Box::new(prompt.clone()));
        }

        // Edits always go back through moderation
        sets.push("status = ?");
        params_vec.push(Box::new(PromptStatus::Pending.as_str()));
        sets.push("updated_at = datetime('now')");

        let sql = format!("UPDATE prompts SET {} WHERE id = ?", sets.join(", "));
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let updated = conn.execute(&sql, params_refs.as_slice())?;

        Ok(updated > 0)
    }

    /// Set the moderation status directly.
    pub fn set_status(conn: &Connection, id: i64, status: PromptStatus) -> Result<bool> {
        let updated = conn.execute(
            "UPDATE prompts SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(updated > 0)
    }

    /// Delete a prompt. Saved-prompt rows referencing it cascade.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM prompts WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Count approved prompts per department. Departments without any are absent.
    pub fn count_approved_by_department(conn: &Connection) -> Result<HashMap<Department, i64>> {
        let mut stmt = conn.prepare(
            "SELECT department, COUNT(*) FROM prompts
             WHERE status = ?1
             GROUP BY department",
        )?;

        let rows = stmt.query_map([PromptStatus::Approved.as_str()], |row| {
            Ok((
                enum_column(row, 0, "department", Department::parse)?,
                row.get::<_, i64>(1)?,
            ))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (department, count) = row?;
            counts.insert(department, count);
        }

        Ok(counts)
    }
}

pub(crate) fn row_to_prompt(row: &Row<'_>) -> rusqlite::Result<Prompt> {
    Ok(Prompt {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        department: enum_column(row, 3, "department", Department::parse)?,
        category: enum_column(row, 4, "category", Category::parse)?,
        prompt: row.get(5)?,
        creator_id: row.get(6)?,
        status: enum_column(row, 7, "status", PromptStatus::parse)?,
        created_at: timestamp_column(row, 8)?,
        updated_at: timestamp_column(row, 9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{add_user, new_prompt, setup_db};

    #[test]
    fn test_insert_is_pending() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");

        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();

        let prompt = PromptsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(prompt.title, "X");
        assert_eq!(prompt.department, Department::Sales);
        assert_eq!(prompt.category, Category::Email);
        assert_eq!(prompt.creator_id, user);
        assert_eq!(prompt.status, PromptStatus::Pending);
    }

    #[test]
    fn test_get_missing_is_none() {
        let conn = setup_db();
        assert!(PromptsRepo::get_by_id(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_list_filters_and_orders_newest_first() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");

        let a = PromptsRepo::insert(&conn, &new_prompt(&user, "a", Department::Sales)).unwrap();
        let b = PromptsRepo::insert(&conn, &new_prompt(&user, "b", Department::Sales)).unwrap();
        let c =
            PromptsRepo::insert(&conn, &new_prompt(&user, "c", Department::Marketing)).unwrap();

        let all = PromptsRepo::list(&conn, &PromptFilter::default()).unwrap();
        let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c, b, a]);

        let sales = PromptsRepo::list(
            &conn,
            &PromptFilter {
                department: Some(Department::Sales),
                ..Default::default()
            },
        )
        .unwrap();
        let ids: Vec<i64> = sales.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b, a]);

        let planning = PromptsRepo::list(
            &conn,
            &PromptFilter {
                category: Some(Category::Planning),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(planning.is_empty());
    }

    #[test]
    fn test_new_prompt_visible_to_creator_not_public() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");

        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();

        let mine = PromptsRepo::list_by_creator(&conn, &user).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert_eq!(mine[0].status, PromptStatus::Pending);

        let public = PromptsRepo::list(&conn, &PromptFilter::approved()).unwrap();
        assert!(public.is_empty());
    }

    #[test]
    fn test_list_by_creator_only_returns_own() {
        let conn = setup_db();
        let ada = add_user(&conn, "ada@example.com");
        let bob = add_user(&conn, "bob@example.com");

        PromptsRepo::insert(&conn, &new_prompt(&ada, "a", Department::Sales)).unwrap();
        PromptsRepo::insert(&conn, &new_prompt(&bob, "b", Department::Sales)).unwrap();

        let mine = PromptsRepo::list_by_creator(&conn, &ada).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "a");
    }

    #[test]
    fn test_update_from_any_status_resets_to_pending() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");

        for status in PromptStatus::all() {
            let id =
                PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();
            PromptsRepo::set_status(&conn, id, *status).unwrap();

            let update = PromptUpdate {
                title: Some("Renamed".to_string()),
                ..Default::default()
            };
            assert!(PromptsRepo::update(&conn, id, &update).unwrap());

            let prompt = PromptsRepo::get_by_id(&conn, id).unwrap().unwrap();
            assert_eq!(prompt.title, "Renamed");
            assert_eq!(prompt.status, PromptStatus::Pending);
        }
    }

    #[test]
    fn test_update_is_partial() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();

        let update = PromptUpdate {
            department: Some(Department::Finance),
            category: Some(Category::Reporting),
            ..Default::default()
        };
        PromptsRepo::update(&conn, id, &update).unwrap();

        let prompt = PromptsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(prompt.title, "X");
        assert_eq!(prompt.department, Department::Finance);
        assert_eq!(prompt.category, Category::Reporting);
        assert!(prompt.updated_at >= prompt.created_at);
    }

    #[test]
    fn test_empty_update_still_resets_status() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();
        PromptsRepo::set_status(&conn, id, PromptStatus::Approved).unwrap();

        assert!(PromptsRepo::update(&conn, id, &PromptUpdate::default()).unwrap());

        let prompt = PromptsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(prompt.status, PromptStatus::Pending);
    }

    #[test]
    fn test_update_missing_returns_false() {
        let conn = setup_db();
        assert!(!PromptsRepo::update(&conn, 42, &PromptUpdate::default()).unwrap());
    }

    #[test]
    fn test_delete() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");
        let id = PromptsRepo::insert(&conn, &new_prompt(&user, "X", Department::Sales)).unwrap();

        assert!(PromptsRepo::delete(&conn, id).unwrap());
        assert!(PromptsRepo::get_by_id(&conn, id).unwrap().is_none());
        assert!(!PromptsRepo::delete(&conn, id).unwrap());
    }

    #[test]
    fn test_count_approved_by_department() {
        let conn = setup_db();
        let user = add_user(&conn, "ada@example.com");

        let a = PromptsRepo::insert(&conn, &new_prompt(&user, "a", Department::Sales)).unwrap();
        let b = PromptsRepo::insert(&conn, &new_prompt(&user, "b", Department::Sales)).unwrap();
        let c = PromptsRepo::insert(&conn, &new_prompt(&user, "c", Department::Design)).unwrap();
        PromptsRepo::insert(&conn, &new_prompt(&user, "d", Department::Finance)).unwrap();

        PromptsRepo::set_status(&conn, a, PromptStatus::Approved).unwrap();
        PromptsRepo::set_status(&conn, b, PromptStatus::Approved).unwrap();
        PromptsRepo::set_status(&conn, c, PromptStatus::Rejected).unwrap();

        let counts = PromptsRepo::count_approved_by_department(&conn).unwrap();
        assert_eq!(counts.get(&Department::Sales), Some(&2));
        assert_eq!(counts.get(&Department::Design), None);
        assert_eq!(counts.get(&Department::Finance), None);
    }
}
