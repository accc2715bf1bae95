//! Narrow interfaces to the external analysis providers.
//!
//! Implementations are created once at startup and shared as
//! `Arc<dyn …>` handles; they must be safe to call concurrently.

use async_trait::async_trait;

use crate::ServiceError;

/// A named entity as reported by the entity-extraction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMention {
    pub text: String,
    /// Coarse type name, e.g. `ORGANIZATION` or `PERSON`.
    pub kind: String,
}

impl EntityMention {
    pub fn new(text: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: kind.into(),
        }
    }
}

/// A structural entity from the document-analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntity {
    pub entity_type: String,
    pub mention_text: String,
}

impl DocumentEntity {
    pub fn new(entity_type: impl Into<String>, mention_text: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mention_text: mention_text.into(),
        }
    }
}

/// Generic named-entity extraction.
#[async_trait]
pub trait EntityService: Send + Sync {
    async fn analyze_entities(&self, text: &str) -> Result<Vec<EntityMention>, ServiceError>;
}

/// Generative summarisation.
#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn summarize(
        &self,
        text: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, ServiceError>;
}

/// Structured document analysis over the original file bytes.
#[async_trait]
pub trait DocumentAiService: Send + Sync {
    async fn process_document(
        &self,
        content: &[u8],
        mime_type: &str,
    ) -> Result<Vec<DocumentEntity>, ServiceError>;
}
