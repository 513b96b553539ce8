use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Page fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("No recipe markup found in page")]
    NoRecipe,

    #[error("Invalid structured data: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors from the language-model fallback strategy.
///
/// Fetch errors terminate the strategy the same way a model failure does:
/// there is no further fallback behind this one.
#[derive(Error, Debug)]
pub enum LlmExtractError {
    #[error("Page fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Llm(#[from] crate::llm::LlmError),
}
