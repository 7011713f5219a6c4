//! HTTP client for the recipe site

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    error::RecipeError,
    parse::{parse_recipe_detail, parse_recipe_page, parse_search_results},
    types::{RecipeDetail, RecipePage, RecipeSummary},
};

pub const DEFAULT_RECIPE_BASE_URL: &str = "https://www.10000recipe.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Recipe site connection settings
#[derive(Debug, Clone)]
pub struct RecipeClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RecipeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RECIPE_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl RecipeClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `RECIPE_BASE_URL` and `RECIPE_TIMEOUT_SECS`, keeping defaults for unset values
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("RECIPE_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var("RECIPE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid RECIPE_TIMEOUT_SECS={:?}", raw),
            }
        }

        config
    }
}

/// Client for search listings and recipe pages
#[derive(Debug, Clone)]
pub struct RecipeSearchClient {
    client: Client,
    base_url: Url,
}

impl RecipeSearchClient {
    pub fn new(config: RecipeClientConfig) -> Result<Self, RecipeError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RecipeError::InvalidConfig(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RecipeError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build the listing URL for a set of ingredient keywords
    pub fn search_url(&self, ingredients: &[String]) -> Result<Url, RecipeError> {
        let mut url = self
            .base_url
            .join("/recipe/list.html")
            .map_err(|e| RecipeError::InvalidUrl(e.to_string()))?;

        let query = ingredients
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        url.query_pairs_mut().append_pair("q", &query);

        Ok(url)
    }

    /// Search recipes containing the given ingredients
    ///
    /// Returns at most `limit` cards, most reviewed first. Only the first
    /// `limit * 2` listing entries are considered.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        ingredients: &[String],
        limit: usize,
    ) -> Result<Vec<RecipeSummary>, RecipeError> {
        let url = self.search_url(ingredients)?;
        let html = self.get_html(url.as_str()).await?;

        let mut results = parse_search_results(&html, self.base_url());
        results.truncate(limit.saturating_mul(2));
        results.sort_by(|a, b| b.reviews.cmp(&a.reviews));
        results.truncate(limit);

        debug!("Found {} recipes for {:?}", results.len(), ingredients);
        Ok(results)
    }

    /// Fetch the ingredient list and image of a recipe page
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<RecipePage, RecipeError> {
        let html = self.get_html(url).await?;
        Ok(parse_recipe_page(&html, url))
    }

    /// Fetch the full detail of a recipe page
    #[instrument(skip(self))]
    pub async fn fetch_detail(&self, url: &str) -> Result<RecipeDetail, RecipeError> {
        let html = self.get_html(url).await?;
        Ok(parse_recipe_detail(&html, url))
    }

    async fn get_html(&self, url: &str) -> Result<String, RecipeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RecipeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RecipeError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| RecipeError::RequestFailed(e.to_string()))
    }
}
