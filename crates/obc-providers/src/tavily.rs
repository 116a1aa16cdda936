//! Tavily web search backend

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    SearchProvider,
    error::{Error, Result},
    types::SearchResponse,
};

const BASE_URL: &str = "https://api.tavily.com";
const MAX_RESULTS: u32 = 5;
const SEARCH_DEPTH: &str = "advanced";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tavily API client
pub struct TavilyProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyProvider {
    /// Create a new Tavily provider with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TAVILY_API_KEY").map_err(|_| Error::InvalidApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Override the base URL (test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: MAX_RESULTS,
            search_depth: SEARCH_DEPTH,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_str(), text));
        }

        let payload: SearchResponse = response.json().await?;
        Ok(payload)
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = SearchRequest {
            api_key: "key",
            query: "owner-builder rights Austin, TX",
            max_results: MAX_RESULTS,
            search_depth: SEARCH_DEPTH,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "owner-builder rights Austin, TX");
        assert_eq!(json["max_results"], 5);
        assert_eq!(json["search_depth"], "advanced");
    }
}
