//! Heuristic recipe-image selection.
//!
//! Given a fetched page, pick at most one image URL: probe known hero-image
//! containers and social metadata, score every `<img>` on the page, then
//! normalize and HEAD-validate the winner. Absence of an image is a normal
//! outcome and never fails an extraction.

use scraper::{Html, Selector};
use url::Url;

use crate::http::HttpClient;

/// CSS hints for containers that commonly hold the hero/recipe image.
const HINT_SELECTORS: &[&str] = &[
    "img.recipe-image",
    "img.hero-image",
    "img.featured-image",
    ".recipe-header img",
    ".hero img",
    ".featured img",
    r#"[itemprop="image"]"#,
    r#"[property="og:image"]"#,
    ".post-image img",
    ".entry-image img",
];

/// Meta tags that declare a page thumbnail: (selector, value attribute).
const META_SELECTORS: &[&str] = &[
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
    r#"meta[name="thumbnail"]"#,
];

const URL_KEYWORDS: &[&str] = &["recipe", "food", "dish", "meal", "hero", "featured", "main"];

const ALT_KEYWORDS: &[&str] = &["recipe", "food", "dish"];

const PHOTO_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

const DISQUALIFYING_KEYWORDS: &[&str] = &["avatar", "logo", "icon", "ad", "banner"];

/// Select, normalize, and validate a recipe image from raw HTML.
pub async fn select_image(
    client: &dyn HttpClient,
    html: &str,
    source_url: &str,
) -> Option<String> {
    let candidate = select_candidate(html)?;
    validate_candidate(client, &candidate, source_url).await
}

/// Normalize a candidate URL and confirm it points at an image.
///
/// Returns the normalized URL, or nothing when normalization rejects the
/// candidate or the HEAD probe does not come back as an image.
pub async fn validate_candidate(
    client: &dyn HttpClient,
    candidate: &str,
    source_url: &str,
) -> Option<String> {
    let normalized = normalize_image_url(candidate, source_url)?;

    match client.head(&normalized).await {
        Ok(head) => {
            let is_image = head
                .content_type
                .as_deref()
                .map(|ct| ct.contains("image"))
                .unwrap_or(false);
            if head.success && is_image {
                Some(normalized)
            } else {
                tracing::debug!(url = %normalized, "image candidate rejected by HEAD probe");
                None
            }
        }
        Err(e) => {
            tracing::debug!(url = %normalized, error = %e, "image validation failed");
            None
        }
    }
}

/// Pick the best image candidate from the page, without network access.
///
/// Priority: highest-scored `<img>` (first wins ties), then the first
/// unscored `<img>`, then the first hint- or metadata-derived candidate.
pub fn select_candidate(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut hinted: Vec<String> = Vec::new();

    for hint in HINT_SELECTORS {
        let Ok(selector) = Selector::parse(hint) else {
            continue;
        };
        if let Some(el) = document.select(&selector).next() {
            let src = el
                .value()
                .attr("src")
                .or_else(|| el.value().attr("data-src"))
                .or_else(|| el.value().attr("content"));
            if let Some(src) = src {
                hinted.push(src.to_string());
            }
        }
    }

    for meta in META_SELECTORS {
        let Ok(selector) = Selector::parse(meta) else {
            continue;
        };
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            hinted.push(content.to_string());
        }
    }

    let img_selector = Selector::parse("img").expect("Invalid selector");
    let mut best_scored: Option<(String, i32)> = None;
    let mut first_regular: Option<String> = None;

    for img in document.select(&img_selector) {
        let Some(src) = img
            .value()
            .attr("src")
            .or_else(|| img.value().attr("data-src"))
        else {
            continue;
        };

        let width = parse_dimension(img.value().attr("width"));
        let height = parse_dimension(img.value().attr("height"));
        let alt = img.value().attr("alt").unwrap_or("");

        let score = score_image(src, width, height, alt);

        if score > 0 {
            // Strictly greater keeps the first image on ties
            if best_scored.as_ref().map(|(_, s)| score > *s).unwrap_or(true) {
                best_scored = Some((src.to_string(), score));
            }
        } else if first_regular.is_none() {
            first_regular = Some(src.to_string());
        }
    }

    best_scored
        .map(|(src, _)| src)
        .or(first_regular)
        .or_else(|| hinted.into_iter().next())
}

/// Score an image by heuristic recipe-photo signals.
pub fn score_image(src: &str, width: u32, height: u32, alt: &str) -> i32 {
    let url = src.to_lowercase();
    let alt = alt.to_lowercase();
    let mut score = 0;

    score += URL_KEYWORDS
        .iter()
        .filter(|keyword| url.contains(**keyword))
        .count() as i32
        * 2;

    if width > 300 && height > 300 {
        score += 3;
    }
    if width > 500 && height > 500 {
        score += 2;
    }

    if ALT_KEYWORDS.iter().any(|keyword| alt.contains(keyword)) {
        score += 2;
    }

    if PHOTO_EXTENSIONS.iter().any(|ext| url.contains(ext)) {
        score += 1;
    }

    if DISQUALIFYING_KEYWORDS
        .iter()
        .any(|keyword| url.contains(keyword))
    {
        score -= 3;
    }

    score
}

fn parse_dimension(attr: Option<&str>) -> u32 {
    attr.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Normalize a candidate image URL against the page it came from.
///
/// Rejects `data:` URLs outright; upgrades protocol-relative URLs to https;
/// resolves root-relative paths against the source URL's scheme and host.
pub fn normalize_image_url(candidate: &str, source_url: &str) -> Option<String> {
    let candidate = candidate.trim();

    if candidate.starts_with("data:") {
        return None;
    }
    if let Some(rest) = candidate.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }
    if candidate.starts_with('/') {
        let base = Url::parse(source_url).ok()?;
        return base.join(candidate).ok().map(String::from);
    }

    Some(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    #[test]
    fn test_score_rewards_recipe_keywords() {
        assert_eq!(score_image("https://x.com/recipe-food.jpg", 0, 0, ""), 5);
        assert_eq!(score_image("https://x.com/photo.webp", 0, 0, ""), 0);
    }

    #[test]
    fn test_score_rewards_dimensions() {
        assert_eq!(score_image("https://x.com/a.webp", 400, 400, ""), 3);
        assert_eq!(score_image("https://x.com/a.webp", 600, 600, ""), 5);
        // One small dimension earns nothing
        assert_eq!(score_image("https://x.com/a.webp", 600, 200, ""), 0);
    }

    #[test]
    fn test_score_penalizes_disqualifying_keywords() {
        assert!(score_image("https://x.com/logo.png", 0, 0, "") < 0);
    }

    #[test]
    fn test_select_prefers_highest_scored() {
        let html = r#"
            <html><body>
                <img src="https://x.com/sidebar.gif">
                <img src="https://x.com/recipe-hero.jpg" width="600" height="600" alt="food photo">
                <img src="https://x.com/food.jpg">
            </body></html>
        "#;
        assert_eq!(
            select_candidate(html),
            Some("https://x.com/recipe-hero.jpg".to_string())
        );
    }

    #[test]
    fn test_select_falls_back_to_first_regular() {
        let html = r#"
            <html><body>
                <img src="https://x.com/first.webp">
                <img src="https://x.com/second.webp">
            </body></html>
        "#;
        assert_eq!(
            select_candidate(html),
            Some("https://x.com/first.webp".to_string())
        );
    }

    #[test]
    fn test_select_falls_back_to_metadata() {
        let html = r#"
            <html><head>
                <meta property="og:image" content="https://x.com/og.jpg">
            </head><body><p>no images</p></body></html>
        "#;
        assert_eq!(select_candidate(html), Some("https://x.com/og.jpg".to_string()));
    }

    #[test]
    fn test_normalize_rejects_data_urls() {
        assert_eq!(
            normalize_image_url("data:image/png;base64,AAAA", "https://x.com/r"),
            None
        );
    }

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(
            normalize_image_url("//cdn.x.com/a.jpg", "https://x.com/r"),
            Some("https://cdn.x.com/a.jpg".to_string())
        );
    }

    #[test]
    fn test_normalize_root_relative() {
        assert_eq!(
            normalize_image_url("/images/a.jpg", "https://x.com/recipes/pie"),
            Some("https://x.com/images/a.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_validation_rejects_non_image_content_type() {
        let client = MockClient::new().with_head("https://x.com/a.jpg", "text/html");
        assert_eq!(
            validate_candidate(&client, "https://x.com/a.jpg", "https://x.com/r").await,
            None
        );
    }

    #[tokio::test]
    async fn test_validation_accepts_image_content_type() {
        let client = MockClient::new().with_head("https://x.com/a.jpg", "image/jpeg");
        assert_eq!(
            validate_candidate(&client, "https://x.com/a.jpg", "https://x.com/r").await,
            Some("https://x.com/a.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_validation_failure_yields_no_image() {
        let client = MockClient::new().with_head_failure("https://x.com/a.jpg");
        assert_eq!(
            validate_candidate(&client, "https://x.com/a.jpg", "https://x.com/r").await,
            None
        );
    }
}
