//! Error types for the branch name generator

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("API key not configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    #[error("Provider '{provider}' requires a base endpoint")]
    MissingEndpoint { provider: String },

    #[error("Invalid temperature: {temp}. Must be between 0.0 and 1.0")]
    InvalidTemperature { temp: f32 },

    #[error("Ticket summary is empty")]
    EmptySummary,

    #[error("No commit messages found for PR title generation")]
    NoCommitMessages,

    #[error("Provider request failed: {message}")]
    Provider { message: String },

    #[error("AI branch generation failed: {message}")]
    BranchGeneration { message: String },

    #[error("AI PR generation failed: {message}")]
    PrTitleGeneration { message: String },
}

impl Error {
    /// Whether this error belongs to the provider tier and may be absorbed
    /// by the deterministic fallback during branch-name generation.
    ///
    /// A missing API key means the model tier is simply unavailable, so it
    /// qualifies. A missing endpoint for an endpoint-mandatory backend is a
    /// configuration error and stays fatal.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Json(_)
                | Error::Provider { .. }
                | Error::MissingApiKey { .. }
        )
    }
}
