//! Short encyclopedia definitions for position titles, used to ground the CV
//! evaluation prompt.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

pub const WIKI_SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const USER_AGENT: &str = "mbkm-dashboard/1.0";
const LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Source of one-paragraph definitions. Failures yield `None`, never an error.
#[async_trait]
pub trait DefinitionLookup: Send + Sync {
    async fn summary(&self, title: &str) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    extract: Option<String>,
}

/// Wikipedia REST summary client. Answers, including misses, are cached per title
/// for the life of the process; transport failures are not cached.
pub struct WikiClient {
    client: Client,
    base_url: String,
    cache: Mutex<HashMap<String, Option<String>>>,
}

impl WikiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn summary_url(&self, title: &str) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(title);
        Some(url)
    }

    fn cached(&self, title: &str) -> Option<Option<String>> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(title).cloned()
    }

    fn remember(&self, title: &str, answer: Option<String>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(title.to_string(), answer);
    }

    async fn fetch(&self, url: Url) -> Result<Option<String>, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "No summary page");
            return Ok(None);
        }
        let page: PageSummary = response.json().await?;
        Ok(page.extract.filter(|e| !e.trim().is_empty()))
    }
}

#[async_trait]
impl DefinitionLookup for WikiClient {
    async fn summary(&self, title: &str) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        if let Some(answer) = self.cached(title) {
            return answer;
        }

        let url = self.summary_url(title)?;
        match self.fetch(url).await {
            Ok(answer) => {
                self.remember(title, answer.clone());
                answer
            }
            Err(e) => {
                warn!(title, "Definition lookup failed: {e}");
                None
            }
        }
    }
}

/// Fixed definitions for handler tests.
#[cfg(test)]
pub struct StaticDefinitions(pub HashMap<String, String>);

#[cfg(test)]
impl StaticDefinitions {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn with(title: &str, definition: &str) -> Self {
        Self(HashMap::from([(title.to_string(), definition.to_string())]))
    }
}

#[cfg(test)]
#[async_trait]
impl DefinitionLookup for StaticDefinitions {
    async fn summary(&self, title: &str) -> Option<String> {
        self.0.get(title).cloned()
    }
}
