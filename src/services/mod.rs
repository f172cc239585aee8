use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub mod browse;
pub mod catalog;
pub mod genres;
pub mod interactions;
pub mod preferences;
pub mod recommendations;
pub mod seen;

pub use browse::CatalogBrowser;
pub use recommendations::RecommendationEngine;

/// Awaits `fut`, turning an overrun of `limit` into [`AppError::Timeout`]
pub(crate) async fn within<T, F>(limit: Duration, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AppError::Timeout(limit))?
}
