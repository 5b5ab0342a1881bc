//! Route aliases for the original browser pages, which address the session as
//! `studentId` and expect the profile back as `studentInfo`.

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
use crate::session::handlers::parse_session_id;
use crate::session::models::SessionId;
use crate::session::service::{fetch_result, start_session, submit_answers};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyQuestionsRequest {
    pub student_id: Option<String>,
    pub answers: BTreeMap<String, AnswerValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySessionResponse {
    pub success: bool,
    pub student_id: SessionId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyResultResponse {
    pub success: bool,
    pub result: RecommendationRecord,
    pub student_info: Profile,
}

/// POST /api/student-info
pub async fn handle_student_info(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<LegacySessionResponse>, AppError> {
    let Json(profile) = payload?;
    Ok(Json(LegacySessionResponse {
        success: true,
        student_id: start_session(&state.sessions, profile),
    }))
}

/// POST /api/questions
pub async fn handle_questions(
    State(state): State<AppState>,
    payload: Result<Json<LegacyQuestionsRequest>, JsonRejection>,
) -> Result<Json<LegacySessionResponse>, AppError> {
    let Json(request) = payload?;
    let raw_id = request.student_id.unwrap_or_default();
    let id = parse_session_id(&raw_id)?;

    let student_id = submit_answers(
        &state.sessions,
        state.recommender.as_ref(),
        state.config.recommendation_timeout,
        &id,
        normalize_answers(&request.answers),
    )
    .await?;

    Ok(Json(LegacySessionResponse {
        success: true,
        student_id,
    }))
}

/// GET /api/results/:student_id
pub async fn handle_results(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<LegacyResultResponse>, AppError> {
    let id = parse_session_id(&raw_id)?;
    let stored = fetch_result(&state.sessions, &id)?;
    Ok(Json(LegacyResultResponse {
        success: true,
        result: stored.result,
        student_info: stored.profile,
    }))
}
