//! Structured-data recipe extraction.
//!
//! Pulls a recipe out of schema.org markup: JSON-LD `application/ld+json`
//! blocks first (a regex fast path avoids DOM parsing for well-formed
//! pages), then microdata attributes. Pages without recipe markup fail with
//! [`ExtractError::NoRecipe`], which is the fallback trigger, not a fatal
//! error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::types::parse_digits;

/// Regex to find JSON-LD script tags (case-insensitive for type attribute)
static JSONLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("Invalid JSON-LD regex")
});

/// ISO-8601 duration, the format schema.org uses for recipe times.
static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?\s*$")
        .expect("Invalid duration regex")
});

/// Recipe fields as found in page markup, before normalization.
///
/// Optional fields the markup does not expose stay `None`; only a missing
/// title, ingredient list, or instructions fail the extraction.
#[derive(Debug, Clone)]
pub struct ScrapedRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    /// Raw yield text, e.g. "4 servings" or "Serves 6".
    pub servings: Option<String>,
    /// Image URLs declared by the markup, best candidate first.
    pub image_urls: Vec<String>,
}

/// Extract a recipe from structured markup in the page.
///
/// Tries JSON-LD via regex, JSON-LD via DOM (catches script tags the regex
/// misses in malformed HTML), then schema.org microdata.
pub fn extract_structured(html: &str, source_url: &str) -> Result<ScrapedRecipe, ExtractError> {
    if let Some(recipe) = extract_jsonld_fast(html) {
        return Ok(recipe);
    }

    let document = Html::parse_document(html);

    if let Ok(recipe) = extract_from_jsonld_dom(&document) {
        return Ok(recipe);
    }

    extract_from_microdata(&document).map_err(|e| {
        tracing::debug!(url = source_url, error = %e, "no structured recipe data found");
        e
    })
}

/// Fast JSON-LD extraction using regex to avoid DOM parsing.
fn extract_jsonld_fast(html: &str) -> Option<ScrapedRecipe> {
    for cap in JSONLD_REGEX.captures_iter(html) {
        let json_text = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        let sanitized = sanitize_json(json_text);
        let json: serde_json::Value = match serde_json::from_str(&sanitized) {
            Ok(v) => v,
            Err(_) => continue, // Try next script tag
        };

        if let Some(recipe) = find_recipe_in_json(&json) {
            if let Ok(mut scraped) = scrape_recipe_fields(recipe) {
                if scraped.image_urls.is_empty() {
                    if let Some(og_image) = extract_og_image(&Html::parse_document(html)) {
                        scraped.image_urls.push(og_image);
                    }
                }
                return Some(scraped);
            }
        }
    }
    None
}

/// Extract from JSON-LD script tags found by walking the DOM.
fn extract_from_jsonld_dom(document: &Html) -> Result<ScrapedRecipe, ExtractError> {
    let selector = Selector::parse("script[type='application/ld+json']").expect("Invalid selector");

    for element in document.select(&selector) {
        let sanitized = sanitize_json(&element.inner_html());
        let json: serde_json::Value = match serde_json::from_str(&sanitized) {
            Ok(v) => v,
            Err(_) => continue,
        };

        if let Some(recipe) = find_recipe_in_json(&json) {
            let mut scraped = scrape_recipe_fields(recipe)?;
            if scraped.image_urls.is_empty() {
                if let Some(og_image) = extract_og_image(document) {
                    scraped.image_urls.push(og_image);
                }
            }
            return Ok(scraped);
        }
    }

    Err(ExtractError::NoRecipe)
}

/// Sanitize JSON-LD content to handle common malformed patterns.
/// Some sites include literal newlines/tabs inside JSON strings instead of
/// escaped versions.
fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut prev_char = '\0';

    for c in json.chars() {
        if c == '"' && prev_char != '\\' {
            in_string = !in_string;
            result.push(c);
        } else if in_string {
            match c {
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                c if c.is_control() => {}
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
        prev_char = c;
    }

    result
}

/// Recursively search for a Recipe object in JSON-LD.
/// Handles @graph arrays and nested structures.
fn find_recipe_in_json(json: &serde_json::Value) -> Option<&serde_json::Value> {
    match json {
        serde_json::Value::Object(obj) => {
            if let Some(type_val) = obj.get("@type") {
                let is_recipe = match type_val {
                    serde_json::Value::String(s) => s == "Recipe",
                    serde_json::Value::Array(arr) => arr.iter().any(|v| v == "Recipe"),
                    _ => false,
                };
                if is_recipe {
                    return Some(json);
                }
            }

            for (_, value) in obj {
                if let Some(recipe) = find_recipe_in_json(value) {
                    return Some(recipe);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr {
                if let Some(recipe) = find_recipe_in_json(item) {
                    return Some(recipe);
                }
            }
        }
        _ => {}
    }
    None
}

/// Pull recipe fields out of a JSON-LD Recipe object.
fn scrape_recipe_fields(recipe: &serde_json::Value) -> Result<ScrapedRecipe, ExtractError> {
    let title = recipe
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExtractError::MissingField("name".to_string()))?
        .to_string();

    let description = recipe
        .get("description")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let ingredients = scrape_ingredients(recipe)?;
    let instructions = scrape_instructions(recipe)?;
    let image_urls = scrape_image_urls(recipe);

    let servings = recipe.get("recipeYield").and_then(|v| match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Array(arr) => {
            arr.first().and_then(|v| v.as_str()).map(|s| s.to_string())
        }
        _ => None,
    });

    Ok(ScrapedRecipe {
        title,
        description,
        ingredients,
        instructions,
        prep_time: recipe.get("prepTime").and_then(parse_minutes_value),
        cook_time: recipe.get("cookTime").and_then(parse_minutes_value),
        total_time: recipe.get("totalTime").and_then(parse_minutes_value),
        servings,
        image_urls,
    })
}

fn scrape_ingredients(recipe: &serde_json::Value) -> Result<Vec<String>, ExtractError> {
    let raw = recipe
        .get("recipeIngredient")
        .ok_or_else(|| ExtractError::MissingField("recipeIngredient".to_string()))?;

    let array = raw
        .as_array()
        .ok_or_else(|| ExtractError::InvalidJson("recipeIngredient is not an array".to_string()))?;

    let ingredients: Vec<String> = array
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if ingredients.is_empty() {
        return Err(ExtractError::MissingField(
            "recipeIngredient (empty)".to_string(),
        ));
    }

    Ok(ingredients)
}

/// Extract instructions from recipeInstructions.
/// Handles plain strings, arrays of strings, HowToStep objects, and
/// HowToSection containers.
fn scrape_instructions(recipe: &serde_json::Value) -> Result<String, ExtractError> {
    let raw = recipe
        .get("recipeInstructions")
        .ok_or_else(|| ExtractError::MissingField("recipeInstructions".to_string()))?;

    match raw {
        serde_json::Value::String(s) => Ok(s.trim().to_string()),
        serde_json::Value::Array(arr) => {
            let steps: Vec<String> = arr
                .iter()
                .filter_map(|item| {
                    if let Some(text) = item.get("text").and_then(|v| v.as_str()) {
                        return Some(text.trim().to_string());
                    }
                    if let Some(s) = item.as_str() {
                        return Some(s.trim().to_string());
                    }
                    if let Some(items) = item.get("itemListElement").and_then(|v| v.as_array()) {
                        let section_steps: Vec<String> = items
                            .iter()
                            .filter_map(|step| step.get("text").and_then(|v| v.as_str()))
                            .map(|s| s.trim().to_string())
                            .collect();
                        if !section_steps.is_empty() {
                            return Some(section_steps.join("\n"));
                        }
                    }
                    None
                })
                .collect();

            if steps.is_empty() {
                return Err(ExtractError::MissingField(
                    "recipeInstructions (empty)".to_string(),
                ));
            }

            Ok(steps.join("\n\n"))
        }
        _ => Err(ExtractError::InvalidJson(
            "recipeInstructions is not a string or array".to_string(),
        )),
    }
}

/// Extract image URLs from the recipe's image field.
fn scrape_image_urls(recipe: &serde_json::Value) -> Vec<String> {
    let mut urls = Vec::new();

    if let Some(image) = recipe.get("image") {
        match image {
            serde_json::Value::String(s) => {
                urls.push(s.clone());
            }
            serde_json::Value::Array(arr) => {
                for item in arr {
                    if let Some(s) = item.as_str() {
                        urls.push(s.to_string());
                    } else if let Some(url) =
                        item.get("url").and_then(|v| v.as_str())
                    {
                        urls.push(url.to_string());
                    }
                }
            }
            serde_json::Value::Object(obj) => {
                if let Some(url) = obj.get("url").and_then(|v| v.as_str()) {
                    urls.push(url.to_string());
                }
            }
            _ => {}
        }
    }

    urls
}

/// Coerce a schema.org time value to integer minutes.
///
/// Accepts ISO-8601 durations ("PT1H30M"), bare numbers, and text with an
/// embedded number ("30 mins").
fn parse_minutes_value(value: &serde_json::Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n.max(0)).ok();
    }
    value.as_str().and_then(parse_minutes_text)
}

fn parse_minutes_text(text: &str) -> Option<i32> {
    if let Some(cap) = ISO_DURATION_REGEX.captures(text) {
        let group = |i: usize| {
            cap.get(i)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(0)
        };
        let minutes = group(1) * 24 * 60 + group(2) * 60 + group(3) + i32::from(group(4) > 0);
        return Some(minutes);
    }
    parse_digits(text)
}

/// Extract recipe from schema.org microdata markup, for sites that don't
/// use JSON-LD.
fn extract_from_microdata(document: &Html) -> Result<ScrapedRecipe, ExtractError> {
    let recipe_selector = Selector::parse(
        r#"[itemtype="http://schema.org/Recipe"], [itemtype="https://schema.org/Recipe"]"#,
    )
    .expect("Invalid selector");

    let recipe_element = document
        .select(&recipe_selector)
        .next()
        .ok_or(ExtractError::NoRecipe)?;

    let title = microdata_text(&recipe_element, "name")
        .ok_or_else(|| ExtractError::MissingField("name".to_string()))?;

    let description = microdata_text(&recipe_element, "description");

    let ingredient_selector =
        Selector::parse(r#"[itemprop="recipeIngredient"], [itemprop="ingredients"]"#)
            .expect("Invalid selector");
    let ingredients: Vec<String> = recipe_element
        .select(&ingredient_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if ingredients.is_empty() {
        return Err(ExtractError::MissingField(
            "recipeIngredient (empty)".to_string(),
        ));
    }

    let instructions = microdata_instructions(&recipe_element)?;

    let mut image_urls = microdata_images(&recipe_element);
    if image_urls.is_empty() {
        if let Some(og_image) = extract_og_image(document) {
            image_urls.push(og_image);
        }
    }

    Ok(ScrapedRecipe {
        title,
        description,
        ingredients,
        instructions,
        prep_time: microdata_minutes(&recipe_element, "prepTime"),
        cook_time: microdata_minutes(&recipe_element, "cookTime"),
        total_time: microdata_minutes(&recipe_element, "totalTime"),
        servings: microdata_text(&recipe_element, "recipeYield"),
        image_urls,
    })
}

/// Extract text content from an element with the given itemprop.
fn microdata_text(element: &ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"[itemprop="{}"]"#, prop)).ok()?;
    element
        .select(&selector)
        .next()
        .map(|el| {
            // Meta tags carry the value in a content attribute
            if let Some(content) = el.value().attr("content") {
                content.trim().to_string()
            } else {
                el.text().collect::<String>().trim().to_string()
            }
        })
        .filter(|s| !s.is_empty())
}

fn microdata_minutes(element: &ElementRef, prop: &str) -> Option<i32> {
    let selector = Selector::parse(&format!(r#"[itemprop="{}"]"#, prop)).ok()?;
    let el = element.select(&selector).next()?;
    let raw = el
        .value()
        .attr("datetime")
        .or_else(|| el.value().attr("content"))
        .map(|s| s.to_string())
        .unwrap_or_else(|| el.text().collect::<String>());
    parse_minutes_text(raw.trim())
}

fn microdata_instructions(recipe_element: &ElementRef) -> Result<String, ExtractError> {
    let step_selector = Selector::parse(
        r#"[itemprop="recipeInstructions"], [itemprop="instructions"], [itemtype*="HowToStep"]"#,
    )
    .expect("Invalid selector");

    let steps: Vec<String> = recipe_element
        .select(&step_selector)
        .map(|el| {
            // HowToStep containers keep the step text in a nested itemprop
            if let Ok(text_selector) = Selector::parse(r#"[itemprop="text"]"#) {
                if let Some(text_el) = el.select(&text_selector).next() {
                    return text_el.text().collect::<String>().trim().to_string();
                }
            }
            el.text().collect::<String>().trim().to_string()
        })
        .filter(|s| !s.is_empty())
        .collect();

    if steps.is_empty() {
        return Err(ExtractError::MissingField(
            "recipeInstructions (empty)".to_string(),
        ));
    }

    Ok(steps.join("\n\n"))
}

fn microdata_images(recipe_element: &ElementRef) -> Vec<String> {
    let image_selector = Selector::parse(r#"[itemprop="image"]"#).expect("Invalid selector");

    recipe_element
        .select(&image_selector)
        .filter_map(|el| {
            el.value()
                .attr("src")
                .or_else(|| el.value().attr("href"))
                .or_else(|| el.value().attr("content"))
                .map(|s| s.to_string())
        })
        .collect()
}

/// Extract image URL from the og:image meta tag, a fallback for recipes
/// whose structured data omits the image.
fn extract_og_image(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_jsonld_recipe() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                {
                    "@type": "Recipe",
                    "name": "Spaghetti Carbonara",
                    "description": "Classic Italian pasta dish",
                    "recipeIngredient": ["400g spaghetti", "200g pancetta"],
                    "recipeInstructions": "Cook pasta. Fry pancetta.",
                    "prepTime": "PT10M",
                    "cookTime": "PT20M",
                    "totalTime": "PT30M",
                    "recipeYield": "4 servings",
                    "image": "https://example.com/carbonara.jpg"
                }
                </script>
            </head>
            <body></body>
            </html>
        "#;

        let result = extract_structured(html, "https://example.com/recipe").unwrap();
        assert_eq!(result.title, "Spaghetti Carbonara");
        assert_eq!(result.ingredients.len(), 2);
        assert_eq!(result.prep_time, Some(10));
        assert_eq!(result.cook_time, Some(20));
        assert_eq!(result.total_time, Some(30));
        assert_eq!(result.servings, Some("4 servings".to_string()));
        assert_eq!(result.image_urls, vec!["https://example.com/carbonara.jpg"]);
    }

    #[test]
    fn test_extract_jsonld_in_graph() {
        let html = r#"
            <script type="application/ld+json">
            {
                "@graph": [
                    {"@type": "WebPage", "name": "Some page"},
                    {
                        "@type": "Recipe",
                        "name": "Graph Recipe",
                        "recipeIngredient": ["1 cup flour"],
                        "recipeInstructions": [{"@type": "HowToStep", "text": "Mix."}]
                    }
                ]
            }
            </script>
        "#;

        let result = extract_structured(html, "https://example.com/recipe").unwrap();
        assert_eq!(result.title, "Graph Recipe");
        assert_eq!(result.instructions, "Mix.");
    }

    #[test]
    fn test_missing_ingredients_fails() {
        let html = r#"
            <script type="application/ld+json">
            {
                "@type": "Recipe",
                "name": "No Ingredients",
                "recipeIngredient": [],
                "recipeInstructions": "Do nothing."
            }
            </script>
        "#;

        let result = extract_structured(html, "https://example.com/recipe");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_recipe_markup() {
        let html = "<html><body><p>Just a blog post about dinner.</p></body></html>";
        assert!(matches!(
            extract_structured(html, "https://example.com/post"),
            Err(ExtractError::NoRecipe)
        ));
    }

    #[test]
    fn test_extract_microdata_recipe() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <body>
                <div itemscope itemtype="https://schema.org/Recipe">
                    <h1 itemprop="name">Microdata Muffins</h1>
                    <meta itemprop="prepTime" content="PT15M">
                    <span itemprop="recipeYield">Serves 6</span>
                    <ul>
                        <li itemprop="recipeIngredient">1 cup flour</li>
                        <li itemprop="recipeIngredient">2 eggs</li>
                    </ul>
                    <div itemprop="recipeInstructions">Mix and bake.</div>
                </div>
            </body>
            </html>
        "#;

        let result = extract_structured(html, "https://example.com/recipe").unwrap();
        assert_eq!(result.title, "Microdata Muffins");
        assert_eq!(result.prep_time, Some(15));
        assert_eq!(result.servings, Some("Serves 6".to_string()));
        assert_eq!(result.ingredients.len(), 2);
    }

    #[test]
    fn test_og_image_fallback_when_markup_has_no_image() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta property="og:image" content="https://example.com/photo.jpg">
                <script type="application/ld+json">
                {
                    "@type": "Recipe",
                    "name": "Test Recipe",
                    "recipeIngredient": ["1 cup flour"],
                    "recipeInstructions": "Mix and bake."
                }
                </script>
            </head>
            <body></body>
            </html>
        "#;

        let result = extract_structured(html, "https://example.com/recipe").unwrap();
        assert_eq!(result.image_urls, vec!["https://example.com/photo.jpg"]);
    }

    #[test]
    fn test_parse_minutes_text() {
        assert_eq!(parse_minutes_text("PT1H30M"), Some(90));
        assert_eq!(parse_minutes_text("PT45M"), Some(45));
        assert_eq!(parse_minutes_text("P1D"), Some(1440));
        assert_eq!(parse_minutes_text("30 minutes"), Some(30));
        assert_eq!(parse_minutes_text("a while"), None);
    }

    #[test]
    fn test_sanitize_json_escapes_control_chars() {
        let input = "{\"name\": \"Line\none\"}";
        let parsed: serde_json::Value = serde_json::from_str(&sanitize_json(input)).unwrap();
        assert_eq!(parsed["name"], "Line\none");
    }
}
