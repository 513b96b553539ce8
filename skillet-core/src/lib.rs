pub mod error;
pub mod extract;
pub mod http;
pub mod image;
pub mod llm;
pub mod pipeline;
pub mod quantity;
pub mod types;

pub use error::{ExtractError, FetchError, LlmExtractError};
pub use http::{HeadResponse, HttpClient, MockClient, PageClient};
pub use pipeline::{ExtractionFailure, ExtractionOutcome, ExtractionPipeline};
pub use quantity::{split_ingredient, ParsedIngredient};
pub use types::{ExtractionSource, NormalizedRecipe};
