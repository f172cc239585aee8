//! Genre name to catalog id resolution.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    models::{ContentType, Genre, GenreId},
    services::{catalog::CatalogGateway, within},
};

/// Genre names mapped to catalog ids across movie and TV taxonomies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreMap {
    by_name: HashMap<String, GenreId>,
}

impl GenreMap {
    /// Unions the lists by name; a later list wins on a name collision
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = Vec<Genre>>,
    {
        let mut by_name = HashMap::new();
        for genre in lists.into_iter().flatten() {
            by_name.insert(genre.name, genre.id);
        }
        Self { by_name }
    }

    /// Ids for the known names, in input order; unknown names are dropped
    pub fn resolve(&self, names: &[String]) -> Vec<GenreId> {
        let mut seen = HashSet::new();
        names
            .iter()
            .filter_map(|name| self.by_name.get(name).copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Fetches the movie and TV genre lists concurrently and merges them
///
/// A failed list is logged and left out; never fails.
pub async fn build_genre_map(catalog: &Arc<dyn CatalogGateway>, timeout: Duration) -> GenreMap {
    let (movie, tv) = tokio::join!(
        within(timeout, catalog.genres(ContentType::Movie)),
        within(timeout, catalog.genres(ContentType::Tv)),
    );

    let lists = [(ContentType::Movie, movie), (ContentType::Tv, tv)]
        .into_iter()
        .map(|(content_type, result)| {
            result.unwrap_or_else(|e| {
                tracing::warn!(
                    content_type = %content_type,
                    provider = catalog.name(),
                    error = %e,
                    "Genre list unavailable, excluding it from the genre map"
                );
                Vec::new()
            })
        });

    let map = GenreMap::from_lists(lists);
    tracing::debug!(genres = map.len(), "Genre map built");
    map
}

/// Movie and TV genres combined, first occurrence of each id kept
pub fn merge_unique_by_id(movie: Vec<Genre>, tv: Vec<Genre>) -> Vec<Genre> {
    let mut seen = HashSet::new();
    movie
        .into_iter()
        .chain(tv)
        .filter(|genre| seen.insert(genre.id))
        .collect()
}
