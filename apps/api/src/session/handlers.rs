//! Axum route handlers for the Session API.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::recommendation::models::RecommendationRecord;
use crate::session::assembler::{normalize_answers, AnswerValue};
use crate::session::models::SessionId;
use crate::session::service::{fetch_result, start_session, submit_answers};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: BTreeMap<String, AnswerValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub success: bool,
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub struct SessionResultResponse {
    pub success: bool,
    pub result: RecommendationRecord,
    pub profile: Profile,
}

/// Malformed and unknown session tokens are indistinguishable to the caller.
pub fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    raw.parse()
        .map_err(|_| AppError::SessionNotFound(raw.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /session
pub async fn handle_start_session(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<SessionCreatedResponse>, AppError> {
    let Json(profile) = payload?;
    let session_id = start_session(&state.sessions, profile);
    Ok(Json(SessionCreatedResponse {
        success: true,
        session_id,
    }))
}

/// POST /session/:id/answers
///
/// Blocks until the recommendation completes, fails, or times out.
pub async fn handle_submit_answers(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<SubmitAnswersRequest>, JsonRejection>,
) -> Result<Json<SessionCreatedResponse>, AppError> {
    let id = parse_session_id(&raw_id)?;
    let Json(request) = payload?;

    let session_id = submit_answers(
        &state.sessions,
        state.recommender.as_ref(),
        state.config.recommendation_timeout,
        &id,
        normalize_answers(&request.answers),
    )
    .await?;

    Ok(Json(SessionCreatedResponse {
        success: true,
        session_id,
    }))
}

/// GET /session/:id/result
pub async fn handle_fetch_result(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SessionResultResponse>, AppError> {
    let id = parse_session_id(&raw_id)?;
    let stored = fetch_result(&state.sessions, &id)?;
    Ok(Json(SessionResultResponse {
        success: true,
        result: stored.result,
        profile: stored.profile,
    }))
}
