//! Recommendation engine.
//!
//! Pipeline for one request:
//! 1. Analyze fresh watch history (last 50) and ratings of 4+ (last 50),
//!    overlaid with the user's explicit preferences.
//! 2. Build the seen set from watched, rated and queued items.
//! 3. Resolve the top three preferred genres to catalog ids.
//! 4. Run one well-rated discovery query per preferred content type (first
//!    two), keeping up to six unseen items from each, in query order.
//! 5. Below eight items, top up from weekly trending.
//! 6. Cap at twelve.
//!
//! Every catalog or store failure shrinks the result instead of failing it.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::{
        CandidateItem, ContentType, InteractionKind, ListQuery, PreferenceProfile, TrendingWindow,
    },
    services::{
        catalog::{CatalogGateway, DiscoverQuery},
        genres::build_genre_map,
        interactions::InteractionStore,
        preferences::{analyze, POSITIVE_RATING_THRESHOLD},
        seen::{build_seen_set, SeenSet},
        within,
    },
};

/// Upper bound on returned recommendations
pub const MAX_RECOMMENDATIONS: usize = 12;
/// Below this many discovery results, trending fills the gap
pub const TOP_UP_THRESHOLD: usize = 8;
/// Unseen items kept from each discovery query
pub const PER_CONTENT_TYPE_LIMIT: usize = 6;
/// Preferred genres used as discovery filters
pub const GENRES_PER_QUERY: usize = 3;
/// Preferred content types queried
pub const CONTENT_TYPES_QUERIED: usize = 2;
/// Records read per collection for preference analysis
pub const ANALYSIS_HISTORY_LIMIT: u32 = 50;

/// Turns a user's interactions into a ranked list of unseen titles
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogGateway>,
    store: Arc<dyn InteractionStore>,
    timeout: Duration,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        store: Arc<dyn InteractionStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            timeout,
        }
    }

    /// Preference profile from freshly read interactions
    ///
    /// Unreadable collections count as empty.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn profile(&self, user_id: Uuid) -> PreferenceProfile {
        let (history, ratings, explicit) = tokio::join!(
            within(
                self.timeout,
                self.store.list(
                    user_id,
                    InteractionKind::Watched,
                    ListQuery::limited(ANALYSIS_HISTORY_LIMIT),
                ),
            ),
            within(
                self.timeout,
                self.store.list(
                    user_id,
                    InteractionKind::Rated,
                    ListQuery::limited(ANALYSIS_HISTORY_LIMIT)
                        .with_min_rating(POSITIVE_RATING_THRESHOLD),
                ),
            ),
            within(self.timeout, self.store.explicit_preferences(user_id)),
        );

        let history = history.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Watch history unavailable for analysis");
            Vec::new()
        });

        let mut ratings = ratings.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ratings unavailable for analysis");
            Vec::new()
        });
        ratings.retain(|record| {
            record
                .rating
                .is_some_and(|rating| rating >= POSITIVE_RATING_THRESHOLD)
        });

        let explicit = explicit.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Explicit preferences unavailable");
            None
        });

        analyze(&history, &ratings, explicit.as_ref())
    }

    /// Ranked, de-duplicated recommendations; never fails
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn recommend(&self, user_id: Uuid) -> Vec<CandidateItem> {
        let (profile, seen) = tokio::join!(
            self.profile(user_id),
            build_seen_set(&self.store, user_id, self.timeout),
        );

        let genre_ids = if profile.preferred_genres.is_empty() {
            Vec::new()
        } else {
            let top: Vec<String> = profile
                .preferred_genres
                .iter()
                .take(GENRES_PER_QUERY)
                .cloned()
                .collect();
            build_genre_map(&self.catalog, self.timeout)
                .await
                .resolve(&top)
        };

        let content_types: Vec<ContentType> = profile
            .preferred_content_types
            .iter()
            .take(CONTENT_TYPES_QUERIED)
            .copied()
            .collect();

        let discovered = self.discover(&content_types, genre_ids.clone()).await;
        let mut recommendations = select_unseen(discovered, &seen);
        let from_discovery = recommendations.len();

        if recommendations.len() < TOP_UP_THRESHOLD {
            let trending = within(self.timeout, self.catalog.trending(TrendingWindow::Week))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        provider = self.catalog.name(),
                        transient = e.is_transient(),
                        error = %e,
                        "Trending unavailable for top-up"
                    );
                    Vec::new()
                });
            top_up(&mut recommendations, trending, &seen);
        }

        recommendations.truncate(MAX_RECOMMENDATIONS);

        tracing::info!(
            genres = ?profile.preferred_genres,
            genre_ids = ?genre_ids,
            confidence = profile.confidence,
            seen = seen.len(),
            from_discovery,
            total = recommendations.len(),
            "Recommendations generated"
        );

        recommendations
    }

    /// Runs the discovery queries concurrently; results come back in
    /// `content_types` order, with failed queries as empty lists
    async fn discover(
        &self,
        content_types: &[ContentType],
        genre_ids: Vec<u64>,
    ) -> Vec<Vec<CandidateItem>> {
        let query = DiscoverQuery::well_rated(genre_ids);

        let tasks: Vec<_> = content_types
            .iter()
            .map(|&content_type| {
                let catalog = Arc::clone(&self.catalog);
                let query = query.clone();
                let timeout = self.timeout;
                let task = tokio::spawn(async move {
                    within(timeout, catalog.discover(content_type, &query)).await
                });
                (content_type, task)
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for (content_type, task) in tasks {
            let items = match task.await {
                Ok(Ok(items)) => items,
                Ok(Err(e)) => {
                    tracing::warn!(
                        content_type = %content_type,
                        provider = self.catalog.name(),
                        transient = e.is_transient(),
                        error = %e,
                        "Discovery query failed"
                    );
                    Vec::new()
                }
                Err(e) => {
                    tracing::error!(content_type = %content_type, error = %e, "Discovery task join error");
                    Vec::new()
                }
            };
            results.push(items);
        }

        results
    }
}

fn already_listed(list: &[CandidateItem], item: &CandidateItem) -> bool {
    list.iter().any(|existing| existing.id == item.id)
}

/// Concatenates per-query results, keeping at most
/// [`PER_CONTENT_TYPE_LIMIT`] unseen, not-yet-listed items from each
fn select_unseen(per_query: Vec<Vec<CandidateItem>>, seen: &SeenSet) -> Vec<CandidateItem> {
    let mut selected = Vec::new();

    for items in per_query {
        let mut kept = 0;
        for item in items {
            if kept == PER_CONTENT_TYPE_LIMIT {
                break;
            }
            if seen.excludes(&item) || already_listed(&selected, &item) {
                continue;
            }
            selected.push(item);
            kept += 1;
        }
    }

    selected
}

/// Appends unseen, unlisted trending items until [`TOP_UP_THRESHOLD`] is reached
fn top_up(list: &mut Vec<CandidateItem>, trending: Vec<CandidateItem>, seen: &SeenSet) {
    for item in trending {
        if list.len() >= TOP_UP_THRESHOLD {
            break;
        }
        if seen.excludes(&item) || already_listed(list, &item) {
            continue;
        }
        list.push(item);
    }
}
