//! Data models for storage.

use chrono::{DateTime, Utc};
use promptlib_core::{Category, Department, PromptStatus};
use serde::{Deserialize, Serialize};

/// A locally known user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable id derived from the email.
    pub id: String,
    pub email: String,
    pub name: String,
    /// Avatar URL from the identity provider.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique identifier.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub department: Department,
    pub category: Category,
    /// The prompt text itself.
    pub prompt: String,
    /// Id of the user who submitted the prompt.
    pub creator_id: String,
    /// Moderation status.
    pub status: PromptStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a new prompt.
///
/// There is no status field: new prompts always start out pending.
#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub title: String,
    pub description: String,
    pub department: Department,
    pub category: Category,
    pub prompt: String,
    pub creator_id: String,
}

/// A partial edit of a prompt. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<Department>,
    pub category: Option<Category>,
    pub prompt: Option<String>,
}

impl PromptUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.department.is_none()
            && self.category.is_none()
            && self.prompt.is_none()
    }
}

/// Filters for listing prompts. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct PromptFilter {
    pub department: Option<Department>,
    pub category: Option<Category>,
    pub status: Option<PromptStatus>,
}

impl PromptFilter {
    /// Filter for the public listing: approved prompts only.
    pub fn approved() -> Self {
        Self {
            status: Some(PromptStatus::Approved),
            ..Default::default()
        }
    }
}

/// A saved prompt as seen by the user who saved it.
#[derive(Debug, Clone, Serialize)]
pub struct SavedPromptEntry {
    #[serde(flatten)]
    pub prompt: Prompt,
    /// When the user saved it.
    pub saved_at: DateTime<Utc>,
}

/// Outcome of saving a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new bookmark was written.
    Saved,
    /// The user had already saved this prompt.
    AlreadySaved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update() {
        assert!(PromptUpdate::default().is_empty());

        let update = PromptUpdate {
            category: Some(Category::Planning),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn approved_filter() {
        let filter = PromptFilter::approved();
        assert_eq!(filter.status, Some(PromptStatus::Approved));
        assert!(filter.department.is_none());
        assert!(filter.category.is_none());
    }
}
