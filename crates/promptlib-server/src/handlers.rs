//! API route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use tracing::{debug, error, info};

use promptlib_core::validation::{
    optional_text, parse_category, parse_department, parse_prompt_id, parse_status, required_text,
};
use promptlib_core::{
    department_summaries, AuthError, DepartmentSummary, ExternalIdentity, PromptStatus, Session,
    ValidationError,
};
use promptlib_storage::{
    seed, NewPrompt, Prompt, PromptFilter, PromptUpdate, SaveOutcome, SavedPromptEntry,
};

use crate::auth::{BearerToken, CurrentUser};
use crate::error::{ApiError, Result};
use crate::models::{
    CreatePromptRequest, CreatePromptResponse, HealthResponse, ListPromptsQuery, MessageResponse,
    SeedResponse, SignInResponse, UpdatePromptRequest, UpdatePromptResponse,
};
use crate::state::AppState;

/// Treat an empty query value the same as an absent one.
fn query_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Load a prompt and make sure `user_id` created it.
fn owned_prompt(state: &AppState, id: i64, user_id: &str) -> Result<Prompt> {
    let prompt = state
        .db
        .get_prompt(id)?
        .ok_or_else(|| ApiError::NotFound(format!("prompt {}", id)))?;

    if prompt.creator_id != user_id {
        return Err(ApiError::Forbidden(
            "only the creator can modify this prompt".to_string(),
        ));
    }

    Ok(prompt)
}

/// GET /api/prompts - List prompts, approved only unless `status` says otherwise.
pub async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<ListPromptsQuery>,
) -> Result<Json<Vec<Prompt>>> {
    let filter = PromptFilter {
        department: query_value(&query.department)
            .map(parse_department)
            .transpose()?,
        category: query_value(&query.category)
            .map(parse_category)
            .transpose()?,
        status: Some(
            query_value(&query.status)
                .map(parse_status)
                .transpose()?
                .unwrap_or(PromptStatus::Approved),
        ),
    };

    debug!(?filter, "Listing prompts");
    let prompts = state.db.list_prompts(&filter)?;
    Ok(Json(prompts))
}

/// POST /api/prompts - Submit a new prompt for moderation.
pub async fn create_prompt(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: std::result::Result<Json<CreatePromptRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePromptResponse>)> {
    let Json(req) = payload?;

    let department = required_text("department", req.department.as_deref())?;
    let category = required_text("category", req.category.as_deref())?;

    let new_prompt = NewPrompt {
        title: required_text("title", req.title.as_deref())?,
        description: required_text("description", req.description.as_deref())?,
        department: parse_department(&department)?,
        category: parse_category(&category)?,
        prompt: required_text("prompt", req.prompt.as_deref())?,
        creator_id: user.user_id,
    };

    let prompt = state.db.create_prompt(new_prompt)?;
    info!(
        id = prompt.id,
        email = ?user.session.email,
        department = %prompt.department,
        "Prompt submitted for moderation"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatePromptResponse {
            message: "Prompt created successfully".to_string(),
            id: prompt.id,
            prompt,
        }),
    ))
}

/// GET /api/prompts/{id} - Get a single prompt.
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Prompt>> {
    let id = parse_prompt_id(&id)?;

    let prompt = state
        .db
        .get_prompt(id)?
        .ok_or_else(|| ApiError::NotFound(format!("prompt {}", id)))?;

    Ok(Json(prompt))
}

/// PUT /api/prompts/{id} - Edit a prompt. Only the creator may edit, and
/// the prompt goes back to pending.
pub async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    payload: std::result::Result<Json<UpdatePromptRequest>, JsonRejection>,
) -> Result<Json<UpdatePromptResponse>> {
    let id = parse_prompt_id(&id)?;
    let Json(req) = payload?;

    owned_prompt(&state, id, &user.user_id)?;

    let update = PromptUpdate {
        title: optional_text("title", req.title.as_deref())?,
        description: optional_text("description", req.description.as_deref())?,
        department: optional_text("department", req.department.as_deref())?
            .map(|d| parse_department(&d))
            .transpose()?,
        category: optional_text("category", req.category.as_deref())?
            .map(|c| parse_category(&c))
            .transpose()?,
        prompt: optional_text("prompt", req.prompt.as_deref())?,
    };

    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate.into());
    }

    let prompt = state
        .db
        .update_prompt(id, &update)?
        .ok_or_else(|| ApiError::NotFound(format!("prompt {}", id)))?;

    info!(id, "Prompt edited, back to pending");

    Ok(Json(UpdatePromptResponse {
        message: "Prompt updated successfully".to_string(),
        prompt,
    }))
}

/// DELETE /api/prompts/{id} - Delete a prompt. Only the creator may delete.
pub async fn delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Json<MessageResponse>> {
    let id = parse_prompt_id(&id)?;

    owned_prompt(&state, id, &user.user_id)?;

    if !state.db.delete_prompt(id)? {
        return Err(ApiError::NotFound(format!("prompt {}", id)));
    }

    info!(id, "Prompt deleted");
    Ok(Json(MessageResponse::new("Prompt deleted successfully")))
}

/// GET /api/prompts/my - The signed-in user's prompts, any status.
pub async fn my_prompts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Prompt>>> {
    let prompts = state.db.get_prompts_by_creator(&user.user_id)?;
    Ok(Json(prompts))
}

/// GET /api/prompts/saved - The signed-in user's saved prompts.
pub async fn saved_prompts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<SavedPromptEntry>>> {
    let saved = state.db.get_saved_prompts(&user.user_id)?;
    Ok(Json(saved))
}

/// POST /api/prompts/{id}/save - Save a prompt.
pub async fn save_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Json<MessageResponse>> {
    let id = parse_prompt_id(&id)?;

    match state.db.save_prompt(&user.user_id, id)? {
        SaveOutcome::Saved => {
            debug!(id, user_id = %user.user_id, "Prompt saved");
            Ok(Json(MessageResponse::new("Prompt saved successfully")))
        }
        SaveOutcome::AlreadySaved => Err(ApiError::AlreadySaved),
    }
}

/// DELETE /api/prompts/{id}/save - Unsave a prompt. Succeeds even if it was not saved.
pub async fn unsave_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Json<MessageResponse>> {
    let id = parse_prompt_id(&id)?;

    let removed = state.db.unsave_prompt(&user.user_id, id)?;
    debug!(id, removed, "Prompt unsaved");

    Ok(Json(MessageResponse::new("Prompt unsaved successfully")))
}

/// GET /api/departments - Every department with its approved prompt count.
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentSummary>>> {
    let counts = state.db.count_approved_by_department()?;
    Ok(Json(department_summaries(&counts)))
}

/// POST /api/auth/signin - Exchange a verified external identity for a session.
pub async fn sign_in(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExternalIdentity>, JsonRejection>,
) -> Result<Json<SignInResponse>> {
    let Json(identity) = payload?;

    let signed_in = state.identity.sign_in(identity)?;

    Ok(Json(SignInResponse {
        session_token: signed_in.token.as_str().to_string(),
        user_id: signed_in.user_id,
    }))
}

/// GET /api/auth/session - The session behind the bearer token.
pub async fn get_session(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Session>> {
    let session = state
        .identity
        .session(&token)
        .ok_or(AuthError::SessionInvalid)?;

    Ok(Json(session))
}

/// POST /api/auth/signout - End the session behind the bearer token.
pub async fn sign_out(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Json<MessageResponse> {
    state.identity.sign_out(&token);
    Json(MessageResponse::new("Signed out"))
}

/// GET /api/health - Database liveness.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.db.sqlite_version() {
        Ok(version) => Json(HealthResponse {
            success: true,
            message: "Database connection successful".to_string(),
            sqlite_version: Some(version),
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    success: false,
                    message: "Database connection failed".to_string(),
                    sqlite_version: None,
                    timestamp: Utc::now(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/seed - Load the sample prompts (development only).
pub async fn seed_database(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    if !state.enable_seed {
        return Err(ApiError::Forbidden("seeding is disabled".to_string()));
    }

    let created = seed::seed_samples(&state.db)?;

    Ok(Json(SeedResponse {
        message: format!("Successfully seeded database with {} prompts", created),
        created,
    }))
}
