//! In-memory stand-ins for the catalog and the interaction store.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use moviez_api::{
    error::{AppError, AppResult},
    models::{
        CandidateItem, ContentRef, ContentType, Genre, InteractionKind, InteractionRecord,
        ListQuery, PreferenceProfile, TrendingWindow,
    },
    services::{
        catalog::{CatalogGateway, DiscoverQuery},
        interactions::InteractionStore,
    },
};

pub fn item(id: u64, content_type: ContentType) -> CandidateItem {
    CandidateItem {
        id,
        content_type,
        title: format!("Title {}", id),
        overview: None,
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        popularity: 0.0,
        vote_average: 0.0,
        vote_count: 0,
        genre_ids: Vec::new(),
    }
}

pub fn items(ids: impl IntoIterator<Item = u64>, content_type: ContentType) -> Vec<CandidateItem> {
    ids.into_iter().map(|id| item(id, content_type)).collect()
}

pub fn content(id: &str, content_type: ContentType, genres: &[&str]) -> ContentRef {
    ContentRef {
        content_id: id.to_string(),
        content_type,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        title: None,
        poster_path: None,
    }
}

/// Catalog with canned responses; a `None` list makes that call fail
#[derive(Default)]
pub struct FakeCatalog {
    pub movie_genres: Option<Vec<Genre>>,
    pub tv_genres: Option<Vec<Genre>>,
    pub movie_discover: Option<Vec<CandidateItem>>,
    pub tv_discover: Option<Vec<CandidateItem>>,
    pub trending: Option<Vec<CandidateItem>>,
    /// Discovery answers only after this long
    pub discover_delay: Option<Duration>,
    pub discover_calls: Mutex<Vec<(ContentType, DiscoverQuery)>>,
    pub trending_calls: Mutex<u32>,
}

impl FakeCatalog {
    pub fn discover_calls(&self) -> Vec<(ContentType, DiscoverQuery)> {
        self.discover_calls.lock().unwrap().clone()
    }

    pub fn trending_calls(&self) -> u32 {
        *self.trending_calls.lock().unwrap()
    }
}

fn canned<T: Clone>(value: &Option<T>, what: &str) -> AppResult<T> {
    value
        .clone()
        .ok_or_else(|| AppError::ExternalApi(format!("{} unavailable", what)))
}

#[async_trait::async_trait]
impl CatalogGateway for FakeCatalog {
    async fn genres(&self, content_type: ContentType) -> AppResult<Vec<Genre>> {
        match content_type {
            ContentType::Movie => canned(&self.movie_genres, "movie genres"),
            ContentType::Tv => canned(&self.tv_genres, "tv genres"),
        }
    }

    async fn discover(
        &self,
        content_type: ContentType,
        query: &DiscoverQuery,
    ) -> AppResult<Vec<CandidateItem>> {
        self.discover_calls
            .lock()
            .unwrap()
            .push((content_type, query.clone()));
        if let Some(delay) = self.discover_delay {
            tokio::time::sleep(delay).await;
        }
        match content_type {
            ContentType::Movie => canned(&self.movie_discover, "movie discover"),
            ContentType::Tv => canned(&self.tv_discover, "tv discover"),
        }
    }

    async fn trending(&self, _window: TrendingWindow) -> AppResult<Vec<CandidateItem>> {
        *self.trending_calls.lock().unwrap() += 1;
        canned(&self.trending, "trending")
    }

    async fn popular(&self, content_type: ContentType) -> AppResult<Vec<CandidateItem>> {
        match content_type {
            ContentType::Movie => canned(&self.movie_discover, "popular movies"),
            ContentType::Tv => canned(&self.tv_discover, "popular tv"),
        }
    }

    async fn search(
        &self,
        content_type: ContentType,
        _query: &str,
    ) -> AppResult<Vec<CandidateItem>> {
        self.popular(content_type).await
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Interaction store backed by a vector, newest records last
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<InteractionRecord>>,
    explicit: Mutex<HashMap<Uuid, PreferenceProfile>>,
    /// Every call fails when set
    pub unavailable: bool,
}

impl InMemoryStore {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn check(&self) -> AppResult<()> {
        if self.unavailable {
            Err(AppError::Internal("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn upsert(
        &self,
        user_id: Uuid,
        kind: InteractionKind,
        content: ContentRef,
        rating: Option<u8>,
    ) -> InteractionRecord {
        let mut records = self.records.lock().unwrap();
        records.retain(|r| {
            !(r.user_id == user_id
                && r.kind == kind
                && r.content_id == content.content_id
                && r.content_type == content.content_type)
        });
        let record = InteractionRecord {
            entry_id: Uuid::new_v4(),
            user_id,
            content_id: content.content_id,
            content_type: content.content_type,
            genres: content.genres,
            kind,
            rating,
            title: content.title,
            poster_path: content.poster_path,
            timestamp: Utc::now(),
        };
        records.push(record.clone());
        record
    }
}

#[async_trait::async_trait]
impl InteractionStore for InMemoryStore {
    async fn list(
        &self,
        user_id: Uuid,
        kind: InteractionKind,
        query: ListQuery,
    ) -> AppResult<Vec<InteractionRecord>> {
        self.check()?;
        let records = self.records.lock().unwrap();
        let matching = records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id && r.kind == kind)
            .filter(|r| match (kind, query.min_rating) {
                (InteractionKind::Rated, Some(min)) => r.rating.is_some_and(|rating| rating >= min),
                _ => true,
            })
            .take(query.limit.map_or(usize::MAX, |limit| limit as usize))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn explicit_preferences(&self, user_id: Uuid) -> AppResult<Option<PreferenceProfile>> {
        self.check()?;
        Ok(self.explicit.lock().unwrap().get(&user_id).cloned())
    }

    async fn set_explicit_preferences(
        &self,
        user_id: Uuid,
        profile: PreferenceProfile,
    ) -> AppResult<()> {
        self.check()?;
        self.explicit.lock().unwrap().insert(user_id, profile);
        Ok(())
    }

    async fn record_watched(
        &self,
        user_id: Uuid,
        content: ContentRef,
    ) -> AppResult<InteractionRecord> {
        self.check()?;
        Ok(self.upsert(user_id, InteractionKind::Watched, content, None))
    }

    async fn rate(
        &self,
        user_id: Uuid,
        content: ContentRef,
        rating: u8,
    ) -> AppResult<InteractionRecord> {
        self.check()?;
        Ok(self.upsert(user_id, InteractionKind::Rated, content, Some(rating)))
    }

    async fn toggle_queued(&self, user_id: Uuid, content: ContentRef) -> AppResult<bool> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| {
            !(r.user_id == user_id
                && r.kind == InteractionKind::Queued
                && r.content_id == content.content_id
                && r.content_type == content.content_type)
        });
        if records.len() < before {
            return Ok(false);
        }
        drop(records);
        self.upsert(user_id, InteractionKind::Queued, content, None);
        Ok(true)
    }

    async fn remove_queued(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<()> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| {
            !(r.user_id == user_id && r.kind == InteractionKind::Queued && r.entry_id == entry_id)
        });
        if records.len() == before {
            return Err(AppError::NotFound(format!("Watchlist entry {}", entry_id)));
        }
        Ok(())
    }
}
