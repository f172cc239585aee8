//! Everything a user has already watched, rated or queued.
//!
//! Used only to exclude items from recommendations, never to rank them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::{
    models::{CandidateItem, ContentType, InteractionKind, ListQuery},
    services::{interactions::InteractionStore, within},
};

/// Set of `(content_id, content_type)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeenSet {
    pairs: HashSet<(String, ContentType)>,
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, content_id: String, content_type: ContentType) {
        self.ids.insert(content_id.clone());
        self.pairs.insert((content_id, content_type));
    }

    pub fn contains(&self, content_id: &str, content_type: ContentType) -> bool {
        self.pairs.contains(&(content_id.to_string(), content_type))
    }

    /// True when the id was seen as any content type
    pub fn contains_id(&self, content_id: &str) -> bool {
        self.ids.contains(content_id)
    }

    /// Exclusion test for a catalog item, matched on id alone
    pub fn excludes(&self, item: &CandidateItem) -> bool {
        self.contains_id(&item.content_id())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Reads the three collections concurrently and unions their identifiers
///
/// A failed read contributes nothing; the partial set is still returned.
pub async fn build_seen_set(
    store: &Arc<dyn InteractionStore>,
    user_id: Uuid,
    timeout: Duration,
) -> SeenSet {
    let (watched, rated, queued) = tokio::join!(
        within(timeout, store.list(user_id, InteractionKind::Watched, ListQuery::all())),
        within(timeout, store.list(user_id, InteractionKind::Rated, ListQuery::all())),
        within(timeout, store.list(user_id, InteractionKind::Queued, ListQuery::all())),
    );

    let mut seen = SeenSet::new();
    for (kind, result) in [
        (InteractionKind::Watched, watched),
        (InteractionKind::Rated, rated),
        (InteractionKind::Queued, queued),
    ] {
        match result {
            Ok(records) => {
                for record in records {
                    seen.insert(record.content_id, record.content_type);
                }
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    collection = kind.as_str(),
                    error = %e,
                    "Seen-set source unavailable, continuing without it"
                );
            }
        }
    }

    seen
}
