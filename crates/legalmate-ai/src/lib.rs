//! Analysis stages backed by external services: entity extraction,
//! summarisation, and structured clause extraction.
//!
//! Every stage here degrades instead of failing: the public entry points
//! return plain values, and the `try_*` variants expose the underlying
//! [`ServiceError`] for callers that want it.

mod clauses;
mod entities;
mod error;
pub mod retry;
mod service;
mod summarizer;

#[cfg(feature = "gcp")]
pub mod gcp;

pub use clauses::ClauseExtractor;
pub use entities::{EntityAnalyzer, category_for, detect_clauses};
pub use error::ServiceError;
pub use service::{DocumentAiService, DocumentEntity, EntityMention, EntityService, SummaryService};
pub use summarizer::Summarizer;

#[cfg(test)]
pub(crate) mod stubs;
