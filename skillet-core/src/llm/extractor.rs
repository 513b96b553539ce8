//! Language-model fallback extraction.
//!
//! Fetches the page, strips it down to readable text within a fixed
//! character budget, asks the model for a strict-JSON recipe, and clamps
//! every numeric field to its floor regardless of what the model returned.
//! Image selection runs independently against the fetched HTML.

use std::sync::LazyLock;

use regex::Regex;

use super::{LlmError, LlmProvider};
use crate::error::LlmExtractError;
use crate::http::HttpClient;
use crate::image;
use crate::types::{
    coerce_minutes, coerce_servings, ExtractionSource, NormalizedRecipe, UNTITLED_RECIPE,
};

/// Character budget for page text sent to the model.
const MAX_CONTENT_CHARS: usize = 4000;

/// Fixed extraction prompt. The reply must be a single JSON object with
/// every field present; numeric fields default to 0/1 when unknown.
pub const SYSTEM_PROMPT: &str = r#"You are a helpful assistant that extracts recipe information from web pages.
Extract the following information and return it in JSON format. For all time values, return integers only (no text).
If you can't determine a specific time value, use 0. All fields are required.

{
    "title": "Recipe title (required)",
    "description": "Brief description of the recipe",
    "ingredients": ["list", "of", "ingredients"],
    "instructions": "Step by step cooking instructions",
    "prep_time": integer (minutes, required, use 0 if unknown),
    "cook_time": integer (minutes, required, use 0 if unknown),
    "total_time": integer (minutes, optional),
    "servings": integer (required, use 1 if unknown)
}

Example response:
{
    "title": "Spaghetti Carbonara",
    "description": "Classic Italian pasta dish",
    "ingredients": ["400g spaghetti", "200g pancetta", "4 large eggs"],
    "instructions": "1. Cook pasta...\n2. Fry pancetta...",
    "prep_time": 10,
    "cook_time": 20,
    "total_time": 30,
    "servings": 4
}

Always return numeric values for times and servings, never text. Use 0 for unknown times."#;

static SCRIPT_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>|<style[^>]*>.*?</style>")
        .expect("Invalid script/style regex")
});

static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

/// Extract a recipe from a URL using the language model.
///
/// One fetch, one completion. Any failure here is terminal for the
/// pipeline; there is no strategy behind this one.
pub async fn extract_with_llm(
    client: &dyn HttpClient,
    llm: &dyn LlmProvider,
    url: &str,
) -> Result<NormalizedRecipe, LlmExtractError> {
    let html = client.fetch_html(url).await?;

    let image_url = image::select_image(client, &html, url).await;

    let text = clean_page_text(&html);
    let truncated: String = text.chars().take(MAX_CONTENT_CHARS).collect();
    let user_content = format!("Extract recipe information from this webpage: {}", truncated);

    tracing::debug!(
        url,
        provider = llm.provider_name(),
        model = llm.model_name(),
        "sending page content to language model"
    );
    let reply = llm.complete(SYSTEM_PROMPT, &user_content).await?;

    let mut recipe = parse_reply(&reply)?;
    recipe.image_url = image_url;
    Ok(recipe)
}

/// Reduce raw HTML to readable text: scripts and styles removed, tags
/// stripped, whitespace collapsed.
pub fn clean_page_text(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE_REGEX.replace_all(html, " ");
    let text = HTML_TAG_REGEX.replace_all(&without_scripts, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the model's JSON reply into a normalized recipe.
///
/// Missing fields take their documented defaults; numeric fields are
/// clamped to their floors. A reply that is not a JSON object (or whose
/// ingredients are not an array) is a ParseError.
fn parse_reply(reply: &str) -> Result<NormalizedRecipe, LlmError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(reply))
        .map_err(|e| LlmError::ParseError(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| LlmError::ParseError("reply is not a JSON object".to_string()))?;

    let ingredients = match obj.get("ingredients") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(_) => {
            return Err(LlmError::ParseError(
                "ingredients is not an array".to_string(),
            ))
        }
    };

    let title = obj
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNTITLED_RECIPE)
        .to_string();

    Ok(NormalizedRecipe {
        title,
        description: obj
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        ingredients,
        instructions: obj
            .get("instructions")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        prep_time: coerce_minutes(obj.get("prep_time")),
        cook_time: coerce_minutes(obj.get("cook_time")),
        total_time: coerce_minutes(obj.get("total_time")),
        servings: coerce_servings(obj.get("servings")),
        image_url: None,
        source: ExtractionSource::LanguageModel,
        status: String::new(),
    })
}

/// Models sometimes wrap JSON in a markdown code fence despite the prompt.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_text_strips_scripts_and_tags() {
        let html = r#"
            <html><head>
                <script>var tracking = true;</script>
                <style>.hero { color: red; }</style>
            </head><body>
                <h1>Pancakes</h1>
                <p>Mix   and
                cook.</p>
            </body></html>
        "#;
        assert_eq!(clean_page_text(html), "Pancakes Mix and cook.");
    }

    #[test]
    fn test_parse_reply_complete() {
        let reply = r#"{
            "title": "Pancakes",
            "description": "Fluffy",
            "ingredients": ["1 cup flour", "2 eggs"],
            "instructions": "Mix. Cook.",
            "prep_time": 5,
            "cook_time": 10,
            "total_time": 15,
            "servings": 4
        }"#;
        let recipe = parse_reply(reply).unwrap();
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.source, ExtractionSource::LanguageModel);
    }

    #[test]
    fn test_parse_reply_clamps_numeric_fields() {
        let reply = r#"{
            "title": "Odd Numbers",
            "ingredients": [],
            "instructions": "",
            "prep_time": -10,
            "cook_time": "20",
            "servings": "four"
        }"#;
        let recipe = parse_reply(reply).unwrap();
        assert_eq!(recipe.prep_time, 0);
        assert_eq!(recipe.cook_time, 20);
        assert_eq!(recipe.total_time, 0);
        assert_eq!(recipe.servings, 1);
    }

    #[test]
    fn test_parse_reply_defaults_title() {
        let recipe = parse_reply(r#"{"ingredients": [], "instructions": ""}"#).unwrap();
        assert_eq!(recipe.title, "Untitled Recipe");
    }

    #[test]
    fn test_parse_reply_rejects_non_json() {
        assert!(parse_reply("Sorry, I could not find a recipe.").is_err());
    }

    #[test]
    fn test_parse_reply_rejects_non_object() {
        assert!(parse_reply("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_parse_reply_strips_code_fences() {
        let reply = "```json\n{\"title\": \"Fenced\", \"ingredients\": [], \"instructions\": \"\"}\n```";
        assert_eq!(parse_reply(reply).unwrap().title, "Fenced");
    }
}
