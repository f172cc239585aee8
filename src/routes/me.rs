//! Routes scoped to the signed-in user named by the session header.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::SessionContext,
    models::{
        CandidateItem, ContentRef, ExplicitPreferencesRequest, InteractionKind,
        InteractionRecord, ListQuery, PreferenceProfile,
    },
    services::interactions::{validate_content, validate_rating},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<u32>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        params.limit.map(ListQuery::limited).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(flatten)]
    pub content: ContentRef,
    pub rating: u8,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub queued: bool,
}

/// Personalized recommendations; never fails, degrades to an empty list
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Json<Vec<CandidateItem>> {
    Json(state.engine.recommend(session.user_id).await)
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Json<PreferenceProfile> {
    Json(state.engine.profile(session.user_id).await)
}

/// Replaces the user's explicit preferences and returns the resulting profile
pub async fn set_preferences(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(request): Json<ExplicitPreferencesRequest>,
) -> AppResult<Json<PreferenceProfile>> {
    state
        .store
        .set_explicit_preferences(session.user_id, request.into())
        .await?;
    Ok(Json(state.engine.profile(session.user_id).await))
}

pub async fn watchlist(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<InteractionRecord>>> {
    list(&state, session.user_id, InteractionKind::Queued, params.into()).await
}

pub async fn toggle_watchlist(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(content): Json<ContentRef>,
) -> AppResult<Json<ToggleResponse>> {
    validate_content(&content)?;
    let queued = state.store.toggle_queued(session.user_id, content).await?;
    Ok(Json(ToggleResponse { queued }))
}

pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Path(entry_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.store.remove_queued(session.user_id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<InteractionRecord>>> {
    list(&state, session.user_id, InteractionKind::Watched, params.into()).await
}

pub async fn record_watched(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(content): Json<ContentRef>,
) -> AppResult<(StatusCode, Json<InteractionRecord>)> {
    validate_content(&content)?;
    let record = state.store.record_watched(session.user_id, content).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn ratings(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<InteractionRecord>>> {
    list(&state, session.user_id, InteractionKind::Rated, params.into()).await
}

pub async fn rate(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(request): Json<RateRequest>,
) -> AppResult<(StatusCode, Json<InteractionRecord>)> {
    validate_content(&request.content)?;
    validate_rating(request.rating)?;
    let record = state
        .store
        .rate(session.user_id, request.content, request.rating)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list(
    state: &AppState,
    user_id: Uuid,
    kind: InteractionKind,
    query: ListQuery,
) -> AppResult<Json<Vec<InteractionRecord>>> {
    Ok(Json(state.store.list(user_id, kind, query).await?))
}
