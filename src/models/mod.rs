use serde::Deserialize;

mod content;
mod interaction;
mod preferences;

pub use content::{CandidateItem, ContentType, Genre, GenreId, TrendingWindow};
pub use interaction::{
    ContentRef, InteractionKind, InteractionRecord, ListQuery, MAX_RATING, MIN_RATING,
};
pub use preferences::{ExplicitPreferencesRequest, PreferenceProfile, PreferenceSource};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from /genre/{movie,tv}/list
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    pub genres: Vec<Genre>,
}

/// Paged listing response from /discover, /trending, /search and /{type}/popular
///
/// Items are kept as raw values so one malformed entry does not reject the page.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    pub results: Vec<serde_json::Value>,
}

/// One raw listing entry; movies carry `title`/`release_date`, shows carry
/// `name`/`first_air_date`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListItem {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub genre_ids: Option<Vec<GenreId>>,
}

impl TmdbListItem {
    /// Converts to a candidate, defaulting missing numeric fields
    ///
    /// `requested` is the content type of a typed endpoint; mixed endpoints
    /// (trending, multi search) rely on `media_type` and drop people.
    pub fn into_candidate(self, requested: Option<ContentType>) -> Option<CandidateItem> {
        let content_type = match requested {
            Some(content_type) => content_type,
            None => self.media_type.as_deref()?.parse().ok()?,
        };

        Some(CandidateItem {
            id: self.id,
            content_type,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date: self.release_date.or(self.first_air_date),
            popularity: self.popularity.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
            genre_ids: self.genre_ids.unwrap_or_default(),
        })
    }
}

impl TmdbPage {
    /// Converts every well-formed entry, skipping the rest
    pub fn into_candidates(self, requested: Option<ContentType>) -> Vec<CandidateItem> {
        self.results
            .into_iter()
            .filter_map(|value| serde_json::from_value::<TmdbListItem>(value).ok())
            .filter_map(|item| item.into_candidate(requested))
            .collect()
    }
}
