//! Catalog browsing for the home, movies, TV, anime and search screens.
//!
//! Unlike the recommender, failures here are returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{CandidateItem, ContentType, Genre, GenreId, TrendingWindow},
    services::{
        catalog::{CatalogGateway, DiscoverQuery},
        genres::merge_unique_by_id,
        within,
    },
};

/// Items shown in one catalog grid
pub const GRID_SIZE: usize = 12;

/// Search or filter request from the search screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: Option<String>,
    /// Both types when absent
    pub content_type: Option<ContentType>,
    pub genre: Option<GenreId>,
}

#[derive(Clone)]
pub struct CatalogBrowser {
    catalog: Arc<dyn CatalogGateway>,
    timeout: Duration,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<dyn CatalogGateway>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    pub async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<CandidateItem>> {
        let mut items = within(self.timeout, self.catalog.trending(window)).await?;
        items.truncate(GRID_SIZE);
        Ok(items)
    }

    pub async fn popular(&self, content_type: ContentType) -> AppResult<Vec<CandidateItem>> {
        let mut items = within(self.timeout, self.catalog.popular(content_type)).await?;
        items.truncate(GRID_SIZE);
        Ok(items)
    }

    pub async fn anime(&self) -> AppResult<Vec<CandidateItem>> {
        within(
            self.timeout,
            self.catalog.discover(ContentType::Tv, &DiscoverQuery::anime()),
        )
        .await
    }

    /// Movie and TV genres for filter menus
    pub async fn genres(&self) -> AppResult<Vec<Genre>> {
        let (movie, tv) = tokio::join!(
            within(self.timeout, self.catalog.genres(ContentType::Movie)),
            within(self.timeout, self.catalog.genres(ContentType::Tv)),
        );
        Ok(merge_unique_by_id(movie?, tv?))
    }

    /// Title search when a query is given, genre discovery otherwise
    ///
    /// With no content type both are queried concurrently; movies come first.
    pub async fn search(&self, request: &SearchRequest) -> AppResult<Vec<CandidateItem>> {
        let query = request
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let discover_query = &DiscoverQuery::by_genres(request.genre.into_iter().collect());

        let lookup = |content_type: ContentType| async move {
            match query {
                Some(q) => within(self.timeout, self.catalog.search(content_type, q)).await,
                None => {
                    within(
                        self.timeout,
                        self.catalog.discover(content_type, discover_query),
                    )
                    .await
                }
            }
        };

        let results = match request.content_type {
            Some(content_type) => lookup(content_type).await?,
            None => {
                let (movies, shows) =
                    tokio::join!(lookup(ContentType::Movie), lookup(ContentType::Tv));
                let mut results = movies?;
                results.extend(shows?);
                results
            }
        };

        tracing::info!(
            query = ?query,
            content_type = ?request.content_type,
            genre = ?request.genre,
            results = results.len(),
            "Catalog search completed"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::catalog::MockCatalogGateway;

    fn item(id: u64, content_type: ContentType) -> CandidateItem {
        CandidateItem {
            id,
            content_type,
            title: format!("Title {}", id),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            popularity: 1.0,
            vote_average: 7.0,
            vote_count: 100,
            genre_ids: Vec::new(),
        }
    }

    fn browser(catalog: MockCatalogGateway) -> CatalogBrowser {
        CatalogBrowser::new(Arc::new(catalog), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_trending_truncated_to_grid() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_trending()
            .returning(|_| Ok((0..20).map(|id| item(id, ContentType::Movie)).collect()));

        let items = browser(catalog).trending(TrendingWindow::Week).await.unwrap();
        assert_eq!(items.len(), GRID_SIZE);
    }

    #[tokio::test]
    async fn test_search_all_types_movies_first() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_search()
            .withf(|_, q| q == "office")
            .times(2)
            .returning(|content_type, _| {
                Ok(match content_type {
                    ContentType::Movie => vec![item(1, ContentType::Movie)],
                    ContentType::Tv => vec![item(2, ContentType::Tv), item(3, ContentType::Tv)],
                })
            });

        let request = SearchRequest {
            query: Some("  office ".to_string()),
            ..SearchRequest::default()
        };
        let items = browser(catalog).search(&request).await.unwrap();

        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_blank_query_with_genre_discovers() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_search().never();
        catalog
            .expect_discover()
            .withf(|content_type, query| {
                *content_type == ContentType::Tv && query.with_genres == vec![16]
            })
            .times(1)
            .returning(|_, _| Ok(vec![item(9, ContentType::Tv)]));

        let request = SearchRequest {
            query: Some("   ".to_string()),
            content_type: Some(ContentType::Tv),
            genre: Some(16),
        };
        let items = browser(catalog).search(&request).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_search_failure_is_returned() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_search()
            .returning(|_, _| Err(AppError::ExternalApi("429".to_string())));

        let request = SearchRequest {
            query: Some("matrix".to_string()),
            content_type: Some(ContentType::Movie),
            genre: None,
        };
        assert!(browser(catalog).search(&request).await.is_err());
    }

    #[tokio::test]
    async fn test_genres_merged() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_genres().returning(|content_type| {
            Ok(match content_type {
                ContentType::Movie => vec![Genre { id: 18, name: "Drama".to_string() }],
                ContentType::Tv => vec![
                    Genre { id: 18, name: "Drama".to_string() },
                    Genre { id: 10765, name: "Sci-Fi & Fantasy".to_string() },
                ],
            })
        });

        let genres = browser(catalog).genres().await.unwrap();
        assert_eq!(genres.len(), 2);
    }

    #[tokio::test]
    async fn test_anime_uses_keyword_filter() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_discover()
            .withf(|content_type, query| {
                *content_type == ContentType::Tv && query.with_keywords == vec![210024]
            })
            .returning(|_, _| Ok(vec![item(31910, ContentType::Tv)]));

        let items = browser(catalog).anime().await.unwrap();
        assert_eq!(items[0].id, 31910);
    }
}
