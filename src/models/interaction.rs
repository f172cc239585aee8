use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentType;

/// Which per-user collection a record came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Watched,
    Rated,
    Queued,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Watched => "watched",
            InteractionKind::Rated => "rated",
            InteractionKind::Queued => "queued",
        }
    }
}

/// One user's observed relationship to one content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// Row id of the stored entry; used to remove watchlist entries
    pub entry_id: Uuid,
    pub user_id: Uuid,
    pub content_id: String,
    pub content_type: ContentType,
    pub genres: Vec<String>,
    pub kind: InteractionKind,
    /// 1..=5, present only for rated records
    pub rating: Option<u8>,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A content item as submitted by the client when recording an interaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRef {
    pub content_id: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Filters for listing one interaction collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum number of records, newest first
    pub limit: Option<u32>,
    /// Only meaningful for the rated collection
    pub min_rating: Option<u8>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn limited(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            min_rating: None,
        }
    }

    pub fn with_min_rating(mut self, min_rating: u8) -> Self {
        self.min_rating = Some(min_rating);
        self
    }
}

/// Ratings must fall in 1..=5
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&InteractionKind::Queued).unwrap(),
            "\"queued\""
        );
    }

    #[test]
    fn test_list_query_builders() {
        let query = ListQuery::limited(50).with_min_rating(4);
        assert_eq!(query.limit, Some(50));
        assert_eq!(query.min_rating, Some(4));
        assert_eq!(ListQuery::all(), ListQuery::default());
    }

    #[test]
    fn test_content_ref_defaults_optional_fields() {
        let json = r#"{"content_id": "603", "content_type": "movie"}"#;
        let content: ContentRef = serde_json::from_str(json).unwrap();
        assert_eq!(content.content_id, "603");
        assert!(content.genres.is_empty());
        assert_eq!(content.title, None);
    }
}
