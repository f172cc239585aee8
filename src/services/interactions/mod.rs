/// Per-user interaction collections
///
/// Three collections (watched, rated, queued) plus the user's explicit
/// preferences. Within one collection a `(user, content_id, content_type)`
/// triple is unique: watching or rating again replaces the earlier record,
/// queueing twice is ignored.
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        ContentRef, InteractionKind, InteractionRecord, ListQuery, PreferenceProfile, MAX_RATING,
        MIN_RATING,
    },
};

pub mod postgres;

pub use postgres::PostgresInteractionStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// Lists one collection, newest first
    async fn list(
        &self,
        user_id: Uuid,
        kind: InteractionKind,
        query: ListQuery,
    ) -> AppResult<Vec<InteractionRecord>>;

    /// The user's declared preferences, if any were saved
    async fn explicit_preferences(&self, user_id: Uuid) -> AppResult<Option<PreferenceProfile>>;

    async fn set_explicit_preferences(
        &self,
        user_id: Uuid,
        profile: PreferenceProfile,
    ) -> AppResult<()>;

    /// Upserts a watch-history entry
    async fn record_watched(&self, user_id: Uuid, content: ContentRef)
        -> AppResult<InteractionRecord>;

    /// Upserts a rating; callers validate the range with [`validate_rating`]
    async fn rate(
        &self,
        user_id: Uuid,
        content: ContentRef,
        rating: u8,
    ) -> AppResult<InteractionRecord>;

    /// Adds the item to the watchlist, or removes it if already queued.
    /// Returns whether the item is queued afterwards.
    async fn toggle_queued(&self, user_id: Uuid, content: ContentRef) -> AppResult<bool>;

    async fn remove_queued(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<()>;
}

pub fn validate_rating(rating: u8) -> AppResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )))
    }
}

pub fn validate_content(content: &ContentRef) -> AppResult<()> {
    if content.content_id.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "content_id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
