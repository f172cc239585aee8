use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{CandidateItem, ContentType, Genre, GenreId, TrendingWindow},
    services::browse::SearchRequest,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(default)]
    window: TrendingWindow,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    content_type: Option<ContentType>,
    genre: Option<GenreId>,
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        Self {
            query: params.q,
            content_type: params.content_type,
            genre: params.genre,
        }
    }
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingParams>,
) -> AppResult<Json<Vec<CandidateItem>>> {
    Ok(Json(state.browser.trending(params.window).await?))
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    Path(content_type): Path<ContentType>,
) -> AppResult<Json<Vec<CandidateItem>>> {
    Ok(Json(state.browser.popular(content_type).await?))
}

pub async fn anime(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<CandidateItem>>> {
    Ok(Json(state.browser.anime().await?))
}

/// Movie and TV genres merged by id
pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.browser.genres().await?))
}

/// Free-text search, or genre browsing when `q` is absent
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<CandidateItem>>> {
    let request = SearchRequest::from(params);
    Ok(Json(state.browser.search(&request).await?))
}
