/// TMDB (The Movie Database) catalog gateway
///
/// Every endpoint goes through [`TmdbGateway::fetch_json`], which attaches the
/// API key, checks the status and decodes into a typed response. Responses
/// shared by all users (genre lists, trending, popular) are cached in Redis.
///
/// Endpoints:
/// - `/genre/{movie,tv}/list`
/// - `/discover/{movie,tv}`
/// - `/trending/all/{day,week}`
/// - `/{movie,tv}/popular`
/// - `/search/{movie,tv}`
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CandidateItem, ContentType, Genre, TmdbGenreList, TmdbPage, TrendingWindow},
    services::catalog::{CatalogGateway, DiscoverQuery},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const GENRE_CACHE_TTL: u64 = 604800; // 1 week
const TRENDING_CACHE_TTL: u64 = 3600; // 1 hour
const POPULAR_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct TmdbGateway {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbGateway {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// GETs `path` with `params` and decodes the body as `T`
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "TMDB API key is not configured".to_string(),
            ));
        }

        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(path = %path, error = %e, "Failed to decode TMDB response");
            AppError::MalformedResponse(format!("{}: {}", path, e))
        })
    }

    async fn fetch_page(
        &self,
        path: &str,
        params: &[(&str, String)],
        requested: Option<ContentType>,
    ) -> AppResult<Vec<CandidateItem>> {
        let page: TmdbPage = self.fetch_json(path, params).await?;
        Ok(page.into_candidates(requested))
    }
}

#[async_trait::async_trait]
impl CatalogGateway for TmdbGateway {
    async fn genres(&self, content_type: ContentType) -> AppResult<Vec<Genre>> {
        cached!(
            self.cache,
            CacheKey::GenreList(content_type),
            GENRE_CACHE_TTL,
            async move {
                let path = format!("/genre/{}/list", content_type);
                let list: TmdbGenreList = self.fetch_json(&path, &[]).await?;

                tracing::debug!(
                    content_type = %content_type,
                    genres = list.genres.len(),
                    "Genre list fetched"
                );

                Ok::<_, AppError>(list.genres)
            }
        )
    }

    async fn discover(
        &self,
        content_type: ContentType,
        query: &DiscoverQuery,
    ) -> AppResult<Vec<CandidateItem>> {
        let path = format!("/discover/{}", content_type);
        let items = self
            .fetch_page(&path, &query.to_params(), Some(content_type))
            .await?;

        tracing::debug!(
            content_type = %content_type,
            genres = ?query.with_genres,
            results = items.len(),
            "Discovery query completed"
        );

        Ok(items)
    }

    async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<CandidateItem>> {
        cached!(
            self.cache,
            CacheKey::Trending(window),
            TRENDING_CACHE_TTL,
            async move {
                let path = format!("/trending/all/{}", window.as_str());
                self.fetch_page(&path, &[], None).await
            }
        )
    }

    async fn popular(&self, content_type: ContentType) -> AppResult<Vec<CandidateItem>> {
        cached!(
            self.cache,
            CacheKey::Popular(content_type),
            POPULAR_CACHE_TTL,
            async move {
                let path = format!("/{}/popular", content_type);
                self.fetch_page(&path, &[], Some(content_type)).await
            }
        )
    }

    async fn search(
        &self,
        content_type: ContentType,
        query: &str,
    ) -> AppResult<Vec<CandidateItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let path = format!("/search/{}", content_type);
        let items = self
            .fetch_page(&path, &[("query", query.to_string())], Some(content_type))
            .await?;

        tracing::info!(
            query = %query,
            content_type = %content_type,
            results = items.len(),
            "Title search completed"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
