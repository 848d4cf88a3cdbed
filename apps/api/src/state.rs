use std::sync::Arc;

use crate::advisor::wiki::DefinitionLookup;
use crate::listings::cache::DatasetCache;
use crate::listings::regions::RegionWhitelist;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<DatasetCache>,
    /// Official region names. Empty when neither cached nor fetched.
    pub regions: Arc<RegionWhitelist>,
    /// Pluggable chat model. Default: OpenRouter `LlmClient`.
    pub llm: Arc<dyn ChatModel>,
    pub definitions: Arc<dyn DefinitionLookup>,
    /// Procedure block of the CV evaluation prompt.
    pub cv_procedure: Arc<str>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(
        listings_path: &std::path::Path,
        llm: Arc<dyn ChatModel>,
        definitions: Arc<dyn DefinitionLookup>,
    ) -> Self {
        Self {
            datasets: Arc::new(DatasetCache::new(listings_path)),
            regions: Arc::new(RegionWhitelist::default()),
            llm,
            definitions,
            cv_procedure: Arc::from(crate::advisor::prompts::DEFAULT_CV_PROCEDURE),
        }
    }
}
