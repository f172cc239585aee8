use std::sync::Arc;
use std::time::Duration;

use crate::services::{
    catalog::CatalogGateway, interactions::InteractionStore, CatalogBrowser,
    RecommendationEngine,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
    pub browser: CatalogBrowser,
    pub store: Arc<dyn InteractionStore>,
}

impl AppState {
    /// Wires the engine and browser around one gateway and one store
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        store: Arc<dyn InteractionStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            engine: RecommendationEngine::new(catalog.clone(), store.clone(), timeout),
            browser: CatalogBrowser::new(catalog, timeout),
            store,
        }
    }
}
