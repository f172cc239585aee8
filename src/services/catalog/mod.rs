/// Media catalog abstraction
///
/// The recommender and the browsing routes only talk to the catalog through
/// [`CatalogGateway`]. Each method maps to one catalog endpoint and returns
/// validated, fully-defaulted domain values; callers decide how to degrade
/// on failure.
use crate::{
    error::AppResult,
    models::{CandidateItem, ContentType, Genre, GenreId, TrendingWindow},
};

pub mod tmdb;

pub use tmdb::TmdbGateway;

/// TMDB keyword id for anime
pub const ANIME_KEYWORD_ID: u64 = 210024;
/// TMDB genre id for animation
pub const ANIMATION_GENRE_ID: GenreId = 16;

/// A title in any one preferred genre qualifies; TMDB reads `|` as "any of"
/// where `,` would mean "all of"
const GENRE_ANY_OF_SEPARATOR: &str = "|";

/// Filters for a discovery listing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoverQuery {
    pub sort_by: Option<&'static str>,
    pub min_vote_average: Option<f64>,
    pub min_vote_count: Option<u32>,
    /// Any one match qualifies
    pub with_genres: Vec<GenreId>,
    pub with_keywords: Vec<u64>,
    pub page: u32,
}

impl DiscoverQuery {
    /// Popular, well-rated titles in any of `genre_ids` (unfiltered when empty)
    pub fn well_rated(genre_ids: Vec<GenreId>) -> Self {
        Self {
            sort_by: Some("popularity.desc"),
            min_vote_average: Some(6.5),
            min_vote_count: Some(100),
            with_genres: genre_ids,
            with_keywords: Vec::new(),
            page: 1,
        }
    }

    /// Titles in any of `genre_ids`, catalog default ordering
    pub fn by_genres(genre_ids: Vec<GenreId>) -> Self {
        Self {
            with_genres: genre_ids,
            page: 1,
            ..Self::default()
        }
    }

    pub fn anime() -> Self {
        Self {
            with_genres: vec![ANIMATION_GENRE_ID],
            with_keywords: vec![ANIME_KEYWORD_ID],
            page: 1,
            ..Self::default()
        }
    }

    /// Query-string pairs in catalog parameter names
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.to_string()));
        }
        if let Some(min_vote_average) = self.min_vote_average {
            params.push(("vote_average.gte", min_vote_average.to_string()));
        }
        if let Some(min_vote_count) = self.min_vote_count {
            params.push(("vote_count.gte", min_vote_count.to_string()));
        }
        if !self.with_genres.is_empty() {
            params.push(("with_genres", join_ids(&self.with_genres)));
        }
        if !self.with_keywords.is_empty() {
            params.push(("with_keywords", join_ids(&self.with_keywords)));
        }
        params.push(("page", self.page.max(1).to_string()));

        params
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(GENRE_ANY_OF_SEPARATOR)
}

/// Read-only access to the remote media catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Full genre taxonomy for one content type
    async fn genres(&self, content_type: ContentType) -> AppResult<Vec<Genre>>;

    /// First page of a filtered discovery listing
    async fn discover(
        &self,
        content_type: ContentType,
        query: &DiscoverQuery,
    ) -> AppResult<Vec<CandidateItem>>;

    /// Trending movies and shows combined, people excluded
    async fn trending(&self, window: TrendingWindow) -> AppResult<Vec<CandidateItem>>;

    async fn popular(&self, content_type: ContentType) -> AppResult<Vec<CandidateItem>>;

    /// Full-text title search within one content type
    async fn search(&self, content_type: ContentType, query: &str)
        -> AppResult<Vec<CandidateItem>>;

    /// Gateway name for logging
    fn name(&self) -> &'static str;
}
