//! The extraction orchestrator.
//!
//! Two strategies, each attempted exactly once per request: structured
//! markup first, language-model fallback second. The fallback is announced
//! by a single intermediate progress message emitted before the model is
//! consulted. The terminal value is an explicit [`ExtractionOutcome`].

use std::sync::Arc;

use crate::error::ExtractError;
use crate::extract;
use crate::http::HttpClient;
use crate::image;
use crate::llm::{self, LlmProvider};
use crate::types::{
    parse_digits, ExtractionSource, NormalizedRecipe, UNTITLED_RECIPE,
};

pub const STATUS_FALLBACK: &str = "Recipe-Scraper Failed - Searching with OpenAI...";
pub const STATUS_STRUCTURED: &str = "Successfully extracted recipe using recipe-scraper!";
pub const STATUS_LANGUAGE_MODEL: &str = "Successfully extracted recipe using OpenAI!";
pub const STATUS_FAILED: &str = "Failed to extract recipe";

/// Terminal result of one extraction run.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Structured(NormalizedRecipe),
    LanguageModel(NormalizedRecipe),
    Failed(ExtractionFailure),
}

impl ExtractionOutcome {
    pub fn recipe(&self) -> Option<&NormalizedRecipe> {
        match self {
            ExtractionOutcome::Structured(r) | ExtractionOutcome::LanguageModel(r) => Some(r),
            ExtractionOutcome::Failed(_) => None,
        }
    }
}

/// Terminal failure payload: the last error plus a human-readable status.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub error: String,
    pub status: String,
}

/// The URL-to-recipe pipeline, with both collaborators injected.
pub struct ExtractionPipeline {
    client: Arc<dyn HttpClient>,
    llm: Arc<dyn LlmProvider>,
}

impl ExtractionPipeline {
    pub fn new(client: Arc<dyn HttpClient>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { client, llm }
    }

    /// Run the pipeline without observing progress.
    pub async fn run(&self, url: &str) -> ExtractionOutcome {
        self.run_with_progress(url, |_| {}).await
    }

    /// Run the pipeline, emitting intermediate status messages into
    /// `progress`. Emission is sequential: the fallback announcement always
    /// precedes the fallback work it names.
    pub async fn run_with_progress(
        &self,
        url: &str,
        mut progress: impl FnMut(&str),
    ) -> ExtractionOutcome {
        tracing::info!(url, "starting recipe extraction");

        match self.try_structured(url).await {
            Ok(mut recipe) => {
                tracing::info!(url, "extracted recipe with structured scraper");
                recipe.status = STATUS_STRUCTURED.to_string();
                return ExtractionOutcome::Structured(recipe);
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "structured scraper failed, trying language model");
            }
        }

        progress(STATUS_FALLBACK);

        match llm::extract_with_llm(self.client.as_ref(), self.llm.as_ref(), url).await {
            Ok(mut recipe) => {
                tracing::info!(url, "extracted recipe with language model");
                recipe.status = STATUS_LANGUAGE_MODEL.to_string();
                ExtractionOutcome::LanguageModel(recipe)
            }
            Err(e) => {
                tracing::error!(url, error = %e, "both extraction strategies failed");
                ExtractionOutcome::Failed(ExtractionFailure {
                    error: e.to_string(),
                    status: STATUS_FAILED.to_string(),
                })
            }
        }
    }

    /// The structured strategy: one fetch, one parse, image taken from the
    /// markup itself and HEAD-validated.
    async fn try_structured(&self, url: &str) -> Result<NormalizedRecipe, ExtractError> {
        let html = self.client.fetch_html(url).await?;
        let scraped = extract::extract_structured(&html, url)?;

        let candidate = scraped.image_urls.first().cloned();
        let image_url = match candidate {
            Some(candidate) => {
                image::validate_candidate(self.client.as_ref(), &candidate, url).await
            }
            None => None,
        };

        Ok(normalize_scraped(scraped, image_url))
    }
}

/// Finish a structured-scraper result: apply defaults and numeric floors.
fn normalize_scraped(
    scraped: extract::ScrapedRecipe,
    image_url: Option<String>,
) -> NormalizedRecipe {
    let title = if scraped.title.trim().is_empty() {
        UNTITLED_RECIPE.to_string()
    } else {
        scraped.title
    };

    let servings = scraped
        .servings
        .as_deref()
        .and_then(parse_digits)
        .map(|n| n.max(1))
        .unwrap_or(1);

    NormalizedRecipe {
        title,
        description: scraped.description.unwrap_or_default(),
        ingredients: scraped.ingredients,
        instructions: scraped.instructions,
        prep_time: scraped.prep_time.unwrap_or(0).max(0),
        cook_time: scraped.cook_time.unwrap_or(0).max(0),
        total_time: scraped.total_time.unwrap_or(0).max(0),
        servings,
        image_url,
        source: ExtractionSource::StructuredScraper,
        status: String::new(),
    }
}
