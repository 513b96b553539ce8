//! End-to-end pipeline tests: mock HTTP client, fake language model, no
//! network.

use std::sync::Arc;

use skillet_core::llm::FakeProvider;
use skillet_core::pipeline::{
    STATUS_FALLBACK, STATUS_FAILED, STATUS_LANGUAGE_MODEL, STATUS_STRUCTURED,
};
use skillet_core::{ExtractionOutcome, ExtractionPipeline, ExtractionSource, MockClient};

const RECIPE_URL: &str = "https://example.com/recipes/carbonara";

const STRUCTURED_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <script type="application/ld+json">
    {
        "@type": "Recipe",
        "name": "Spaghetti Carbonara",
        "description": "Classic Italian pasta dish",
        "recipeIngredient": ["400g spaghetti", "200g pancetta", "4 large eggs"],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Cook the pasta."},
            {"@type": "HowToStep", "text": "Fry the pancetta."}
        ],
        "prepTime": "PT10M",
        "cookTime": "PT20M",
        "totalTime": "PT30M",
        "recipeYield": "4 servings",
        "image": "https://example.com/images/carbonara.jpg"
    }
    </script>
</head>
<body></body>
</html>
"#;

const PROSE_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Dinner last night</title></head>
<body>
    <img src="https://example.com/images/blog-dish.jpg" width="640" height="480" alt="the finished dish">
    <p>I made carbonara: boil spaghetti, fry pancetta, toss with eggs.</p>
</body>
</html>
"#;

const LLM_REPLY: &str = r#"{
    "title": "Carbonara",
    "description": "From a blog post",
    "ingredients": ["1 pound spaghetti", "8 oz pancetta", "4 eggs"],
    "instructions": "Boil spaghetti. Fry pancetta. Toss with eggs.",
    "prep_time": 10,
    "cook_time": 15,
    "total_time": 25,
    "servings": 4
}"#;

fn pipeline_with(
    client: MockClient,
    llm: Arc<FakeProvider>,
) -> ExtractionPipeline {
    ExtractionPipeline::new(Arc::new(client), llm)
}

#[tokio::test]
async fn structured_page_never_consults_the_language_model() {
    let client = MockClient::new()
        .with_html(RECIPE_URL, STRUCTURED_PAGE)
        .with_head("https://example.com/images/carbonara.jpg", "image/jpeg");
    let llm = Arc::new(FakeProvider::new());
    let pipeline = pipeline_with(client, llm.clone());

    let mut statuses = Vec::new();
    let outcome = pipeline
        .run_with_progress(RECIPE_URL, |s| statuses.push(s.to_string()))
        .await;

    let ExtractionOutcome::Structured(recipe) = outcome else {
        panic!("expected structured outcome");
    };
    assert!(statuses.is_empty(), "no intermediate status expected");
    assert_eq!(llm.call_count(), 0);
    assert_eq!(recipe.title, "Spaghetti Carbonara");
    assert_eq!(recipe.source, ExtractionSource::StructuredScraper);
    assert_eq!(recipe.status, STATUS_STRUCTURED);
    assert_eq!(recipe.prep_time, 10);
    assert_eq!(recipe.cook_time, 20);
    assert_eq!(recipe.servings, 4);
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/images/carbonara.jpg")
    );
}

#[tokio::test]
async fn prose_page_falls_back_with_one_intermediate_status() {
    let client = MockClient::new()
        .with_html(RECIPE_URL, PROSE_PAGE)
        .with_head("https://example.com/images/blog-dish.jpg", "image/jpeg");
    let llm = Arc::new(FakeProvider::with_response("carbonara", LLM_REPLY));
    let pipeline = pipeline_with(client, llm.clone());

    let mut statuses = Vec::new();
    let outcome = pipeline
        .run_with_progress(RECIPE_URL, |s| statuses.push(s.to_string()))
        .await;

    let ExtractionOutcome::LanguageModel(recipe) = outcome else {
        panic!("expected language-model outcome");
    };
    assert_eq!(statuses, vec![STATUS_FALLBACK.to_string()]);
    assert_eq!(llm.call_count(), 1);
    assert_eq!(recipe.title, "Carbonara");
    assert_eq!(recipe.source, ExtractionSource::LanguageModel);
    assert_eq!(recipe.status, STATUS_LANGUAGE_MODEL);
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/images/blog-dish.jpg")
    );
}

#[tokio::test]
async fn malformed_numeric_fields_are_clamped() {
    let reply = r#"{
        "title": "Sloppy Reply",
        "ingredients": ["1 cup flour"],
        "instructions": "Mix.",
        "prep_time": -5,
        "cook_time": "twenty",
        "servings": "four"
    }"#;
    let client = MockClient::new().with_html(RECIPE_URL, PROSE_PAGE);
    let llm = Arc::new(FakeProvider::new().with_default_response(reply));
    let pipeline = pipeline_with(client, llm);

    let outcome = pipeline.run(RECIPE_URL).await;
    let recipe = outcome.recipe().expect("expected a recipe");
    assert_eq!(recipe.prep_time, 0);
    assert_eq!(recipe.cook_time, 0);
    assert_eq!(recipe.servings, 1);
}

#[tokio::test]
async fn data_urls_are_never_selected_as_images() {
    let page = r#"
        <html><body>
            <img src="data:image/png;base64,AAAA" width="600" height="600" alt="recipe food dish">
            <p>Carbonara notes.</p>
        </body></html>
    "#;
    let client = MockClient::new().with_html(RECIPE_URL, page);
    let llm = Arc::new(FakeProvider::new().with_default_response(LLM_REPLY));
    let pipeline = pipeline_with(client, llm);

    let outcome = pipeline.run(RECIPE_URL).await;
    let recipe = outcome.recipe().expect("expected a recipe");
    assert_eq!(recipe.image_url, None);
}

#[tokio::test]
async fn failed_image_validation_does_not_abort_extraction() {
    let client = MockClient::new()
        .with_html(RECIPE_URL, STRUCTURED_PAGE)
        .with_head_failure("https://example.com/images/carbonara.jpg");
    let llm = Arc::new(FakeProvider::new());
    let pipeline = pipeline_with(client, llm);

    let outcome = pipeline.run(RECIPE_URL).await;
    let recipe = outcome.recipe().expect("expected a recipe");
    assert_eq!(recipe.image_url, None);
    assert_eq!(recipe.title, "Spaghetti Carbonara");
}

#[tokio::test]
async fn unreachable_page_fails_both_strategies() {
    let client = MockClient::new().with_error(RECIPE_URL, "connection refused");
    let llm = Arc::new(FakeProvider::new().with_default_response(LLM_REPLY));
    let pipeline = pipeline_with(client, llm.clone());

    let mut statuses = Vec::new();
    let outcome = pipeline
        .run_with_progress(RECIPE_URL, |s| statuses.push(s.to_string()))
        .await;

    let ExtractionOutcome::Failed(failure) = outcome else {
        panic!("expected failure outcome");
    };
    assert_eq!(statuses.len(), 1);
    assert_eq!(failure.status, STATUS_FAILED);
    assert!(!failure.error.is_empty());
    // Fallback never got usable page content, so no completion was made
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn malformed_model_reply_is_a_terminal_failure() {
    let client = MockClient::new().with_html(RECIPE_URL, PROSE_PAGE);
    let llm = Arc::new(
        FakeProvider::new().with_default_response("Sorry, I could not find a recipe here."),
    );
    let pipeline = pipeline_with(client, llm);

    let outcome = pipeline.run(RECIPE_URL).await;
    let ExtractionOutcome::Failed(failure) = outcome else {
        panic!("expected failure outcome");
    };
    assert_eq!(failure.status, STATUS_FAILED);
}
