//! Preference inference from watch history and ratings.
//!
//! Weights: each watched record adds 1 to its content type and every genre;
//! a rating of 5 adds 3 and a rating of 4 adds 2. Ratings below 4 are ignored
//! entirely (they are not negative signal). Explicit preferences replace the
//! inferred genre list and content type list independently when non-empty.

use std::hash::Hash;

use crate::models::{ContentType, InteractionRecord, PreferenceProfile, PreferenceSource};

/// Most genres a profile carries
pub const MAX_PREFERRED_GENRES: usize = 5;
/// Combined interaction count at which confidence saturates
pub const CONFIDENCE_SATURATION: usize = 10;
/// Ratings below this carry no weight
pub const POSITIVE_RATING_THRESHOLD: u8 = 4;

const WATCH_WEIGHT: u32 = 1;
const FOUR_STAR_WEIGHT: u32 = 2;
const FIVE_STAR_WEIGHT: u32 = 3;

/// Accumulated weights keyed in first-seen order
///
/// Ranking is a stable sort on descending weight, so ties keep the order in
/// which keys were first added.
#[derive(Debug, Clone)]
pub struct WeightMap<K> {
    entries: Vec<(K, u32)>,
}

impl<K> Default for WeightMap<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> WeightMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to `key`, inserting it at the end if unseen
    pub fn add(&mut self, key: &K, weight: u32) {
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, total)) => *total += weight,
            None => self.entries.push((key.clone(), weight)),
        }
    }

    pub fn weight(&self, key: &K) -> u32 {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, weight)| *weight)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys by descending weight
    pub fn ranked(&self) -> Vec<K> {
        let mut ranked: Vec<&(K, u32)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().map(|(key, _)| key.clone()).collect()
    }
}

fn rating_weight(rating: Option<u8>) -> Option<u32> {
    match rating {
        Some(5) => Some(FIVE_STAR_WEIGHT),
        Some(r) if r >= POSITIVE_RATING_THRESHOLD => Some(FOUR_STAR_WEIGHT),
        _ => None,
    }
}

/// Builds a preference profile from interaction records
///
/// Pure and deterministic: the same inputs always give the same profile.
pub fn analyze(
    watch_history: &[InteractionRecord],
    ratings: &[InteractionRecord],
    explicit: Option<&PreferenceProfile>,
) -> PreferenceProfile {
    let mut genres: WeightMap<String> = WeightMap::new();
    let mut content_types: WeightMap<ContentType> = WeightMap::new();

    let weighted = watch_history
        .iter()
        .map(|record| (record, Some(WATCH_WEIGHT)))
        .chain(ratings.iter().map(|record| (record, rating_weight(record.rating))));

    for (record, weight) in weighted {
        let Some(weight) = weight else { continue };
        content_types.add(&record.content_type, weight);
        for genre in &record.genres {
            genres.add(genre, weight);
        }
    }

    // Types without signal trail in default order
    let mut ranked_types = content_types.ranked();
    for content_type in ContentType::ALL {
        if !ranked_types.contains(&content_type) {
            ranked_types.push(content_type);
        }
    }

    let interactions = (watch_history.len() + ratings.len()).min(CONFIDENCE_SATURATION);
    let confidence = interactions as f64 / CONFIDENCE_SATURATION as f64;

    let mut profile = PreferenceProfile {
        preferred_genres: genres
            .ranked()
            .into_iter()
            .take(MAX_PREFERRED_GENRES)
            .collect(),
        preferred_content_types: ranked_types,
        confidence,
        source: PreferenceSource::Inferred,
    };

    if let Some(explicit) = explicit {
        if !explicit.preferred_genres.is_empty() {
            profile.preferred_genres =
                first_unique(&explicit.preferred_genres, MAX_PREFERRED_GENRES);
            profile.source = PreferenceSource::Explicit;
        }
        if !explicit.preferred_content_types.is_empty() {
            profile.preferred_content_types =
                first_unique(&explicit.preferred_content_types, ContentType::ALL.len());
            profile.source = PreferenceSource::Explicit;
        }
    }

    profile
}

/// First `limit` distinct values, in input order
fn first_unique<T: PartialEq + Clone>(values: &[T], limit: usize) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(limit.min(values.len()));
    for value in values {
        if unique.len() == limit {
            break;
        }
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    unique
}
