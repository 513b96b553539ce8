use serde::{Deserialize, Serialize};

/// Identifies which extraction strategy produced a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionSource {
    StructuredScraper,
    LanguageModel,
}

/// The strategy-agnostic recipe shape all extraction paths converge to.
///
/// Numeric fields are always coerced to integers at or above their floor
/// (times >= 0, servings >= 1) before a record leaves the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub servings: i32,
    pub image_url: Option<String>,
    pub source: ExtractionSource,
    pub status: String,
}

/// Title used when a page yields a recipe with no usable name.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Coerce a JSON value into integer minutes, floored at 0.
///
/// Accepts numbers (floats truncate) and strings containing digits.
/// Anything else, including a missing value, becomes 0.
pub fn coerce_minutes(value: Option<&serde_json::Value>) -> i32 {
    value.and_then(coerce_integer).map(|n| n.max(0)).unwrap_or(0)
}

/// Coerce a JSON value into a serving count, floored at 1.
pub fn coerce_servings(value: Option<&serde_json::Value>) -> i32 {
    value.and_then(coerce_integer).map(|n| n.max(1)).unwrap_or(1)
}

fn coerce_integer(value: &serde_json::Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    if let Some(f) = value.as_f64() {
        return Some(f as i32);
    }
    value.as_str().and_then(parse_digits)
}

/// Extract the digits from free text and parse them as an integer.
///
/// "4 servings" parses to 4; "four" has no digits and parses to nothing.
pub fn parse_digits(text: &str) -> Option<i32> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_minutes_from_number() {
        assert_eq!(coerce_minutes(Some(&json!(25))), 25);
        assert_eq!(coerce_minutes(Some(&json!(-5))), 0);
        assert_eq!(coerce_minutes(Some(&json!(12.7))), 12);
    }

    #[test]
    fn test_coerce_minutes_from_string() {
        assert_eq!(coerce_minutes(Some(&json!("30"))), 30);
        assert_eq!(coerce_minutes(Some(&json!("about an hour"))), 0);
        assert_eq!(coerce_minutes(None), 0);
    }

    #[test]
    fn test_coerce_servings_floor() {
        assert_eq!(coerce_servings(Some(&json!(4))), 4);
        assert_eq!(coerce_servings(Some(&json!(0))), 1);
        assert_eq!(coerce_servings(Some(&json!("four"))), 1);
        assert_eq!(coerce_servings(Some(&json!("8 slices"))), 8);
        assert_eq!(coerce_servings(None), 1);
    }

    #[test]
    fn test_source_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ExtractionSource::StructuredScraper).unwrap(),
            "\"structured-scraper\""
        );
        assert_eq!(
            serde_json::to_string(&ExtractionSource::LanguageModel).unwrap(),
            "\"language-model\""
        );
    }
}
