pub mod analysis;
pub mod config;
pub mod document;
pub mod risk;
pub mod text;

pub use analysis::{AnalysisResult, ClauseList, EntityMap, RiskList, SUMMARY_UNAVAILABLE};
pub use config::{PipelineConfig, RetryPolicy, SummaryParams};
pub use document::{DocumentFormat, RawDocument, UnsupportedFormat};
pub use risk::scan;
pub use text::{NormalizedText, normalize, sentences};
