pub mod extractor;
pub mod model;
pub mod pipeline;

pub use extractor::{IssueKeyExtractor, DEFAULT_KEY_PATTERN};
pub use model::{CorrelationResult, SkippedRepository};
pub use pipeline::CorrelationPipeline;
