use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::endpoints::{MealRecord, MealSummary, MealsEnvelope};

/// Per-request budget; an expired request degrades to "no data".
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(6);

/// Read-only client for the TheMealDB lookup API.
///
/// Every operation resolves to `Option`: `None` covers timeout, network
/// error, non-2xx status and undecodable bodies alike. Expected network
/// failure is never surfaced as an error; callers treat absence uniformly.
pub struct MealApiClient {
    client: Client,
    base_url: String,
}

impl MealApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full-record search by name. `None` = fetch failure; `Some(vec![])` =
    /// the API reported no matches.
    pub async fn search_by_name(&self, term: &str) -> Option<Vec<MealRecord>> {
        self.fetch_list("search.php", "s", term).await
    }

    /// Partial-record search by ingredient.
    pub async fn filter_by_ingredient(&self, ingredient: &str) -> Option<Vec<MealSummary>> {
        self.fetch_list("filter.php", "i", ingredient).await
    }

    /// Full-record lookup; `None` on fetch failure or an unknown id.
    pub async fn lookup_by_id(&self, id: &str) -> Option<MealRecord> {
        self.fetch_list::<MealRecord>("lookup.php", "i", id)
            .await
            .and_then(|meals| meals.into_iter().next())
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        param: &str,
        value: &str,
    ) -> Option<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = match self
            .client
            .get(&url)
            .query(&[(param, value)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                eprintln!("warning: request to {endpoint}?{param}={value} failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            eprintln!(
                "warning: HTTP {} from {endpoint}?{param}={value}",
                response.status()
            );
            return None;
        }

        match response.json::<MealsEnvelope<T>>().await {
            Ok(envelope) => Some(envelope.meals.unwrap_or_default()),
            Err(e) => {
                eprintln!("warning: bad response body from {endpoint}?{param}={value}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = MealApiClient::new("https://example.test/api/").unwrap();
        assert_eq!(client.base_url, "https://example.test/api");
    }
}
