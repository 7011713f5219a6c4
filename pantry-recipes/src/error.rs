//! Error types for the recipe crawler

use thiserror::Error;

/// Errors that can occur while crawling the recipe site
#[derive(Debug, Error)]
pub enum RecipeError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Site returned an error response
    #[error("Site error (status {status}): {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Invalid URL or query
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
