use serde::{Deserialize, Serialize};

use super::ContentType;

/// Whether a profile was inferred from behavior or declared by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceSource {
    Inferred,
    Explicit,
}

/// Weighted preference profile derived from a user's interactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    /// Most-weighted first, at most five
    pub preferred_genres: Vec<String>,
    /// Most-weighted first, never empty
    pub preferred_content_types: Vec<ContentType>,
    /// In [0, 1]
    pub confidence: f64,
    pub source: PreferenceSource,
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self {
            preferred_genres: Vec::new(),
            preferred_content_types: ContentType::ALL.to_vec(),
            confidence: 0.0,
            source: PreferenceSource::Inferred,
        }
    }
}

impl PreferenceProfile {
    /// Creates a user-declared profile
    pub fn explicit(genres: Vec<String>, content_types: Vec<ContentType>) -> Self {
        Self {
            preferred_genres: genres,
            preferred_content_types: content_types,
            confidence: 1.0,
            source: PreferenceSource::Explicit,
        }
    }
}

/// Request body for replacing a user's explicit preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplicitPreferencesRequest {
    #[serde(default)]
    pub preferred_genres: Vec<String>,
    #[serde(default)]
    pub preferred_content_types: Vec<ContentType>,
}

impl From<ExplicitPreferencesRequest> for PreferenceProfile {
    fn from(request: ExplicitPreferencesRequest) -> Self {
        PreferenceProfile::explicit(request.preferred_genres, request.preferred_content_types)
    }
}
