//! API request and response models.

use chrono::{DateTime, Utc};
use promptlib_storage::Prompt;
use serde::{Deserialize, Serialize};

/// Query parameters for GET /api/prompts.
#[derive(Debug, Default, Deserialize)]
pub struct ListPromptsQuery {
    pub department: Option<String>,
    pub category: Option<String>,
    /// Moderation status (default: approved).
    pub status: Option<String>,
}

/// Request body for POST /api/prompts.
///
/// Every field is checked by the handler so a missing field is a 400 with
/// a field name rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePromptRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub prompt: Option<String>,
}

/// Request body for PUT /api/prompts/{id}. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePromptRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub prompt: Option<String>,
}

/// Response body for POST /api/prompts.
#[derive(Debug, Serialize)]
pub struct CreatePromptResponse {
    pub message: String,
    pub id: i64,
    pub prompt: Prompt,
}

/// Response body for PUT /api/prompts/{id}.
#[derive(Debug, Serialize)]
pub struct UpdatePromptResponse {
    pub message: String,
    pub prompt: Prompt,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for POST /api/auth/signin.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub session_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite_version: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Response body for POST /api/seed.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub created: usize,
}
