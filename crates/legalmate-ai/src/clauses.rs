use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use legalmate_core::{ClauseList, DocumentFormat, RawDocument};
use tracing::{debug, warn};

use crate::retry::with_timeout;
use crate::{DocumentAiService, ServiceError};

/// Entity type tag the service uses for contract clauses.
const CLAUSE_TYPE: &str = "clause";

/// Pulls explicit clause segments out of the original document file.
///
/// Used by the diagnostic pipeline only.
pub struct ClauseExtractor {
    service: Arc<dyn DocumentAiService>,
    call_timeout: Duration,
}

impl ClauseExtractor {
    pub fn new(service: Arc<dyn DocumentAiService>) -> Self {
        Self {
            service,
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Clauses from a file on disk, format taken from its extension.
    /// Any failure yields an empty list.
    pub async fn extract_clauses(&self, path: &Path) -> ClauseList {
        let result = async {
            let format = DocumentFormat::from_path(path)
                .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
            let bytes = tokio::fs::read(path).await?;
            self.try_extract(&bytes, format).await
        }
        .await;
        self.or_empty(result)
    }

    /// Clauses from an in-memory document. Any failure yields an empty list.
    pub async fn extract_clauses_from(&self, doc: &RawDocument) -> ClauseList {
        let result = self.try_extract(&doc.bytes, doc.format).await;
        self.or_empty(result)
    }

    pub async fn try_extract(
        &self,
        content: &[u8],
        format: DocumentFormat,
    ) -> Result<ClauseList, ServiceError> {
        let entities = with_timeout(
            self.call_timeout,
            self.service.process_document(content, format.mime_type()),
        )
        .await?;
        let clauses: ClauseList = entities
            .into_iter()
            .filter(|e| e.entity_type.eq_ignore_ascii_case(CLAUSE_TYPE))
            .map(|e| e.mention_text)
            .collect();
        debug!(count = clauses.len(), "clause extraction complete");
        Ok(clauses)
    }

    fn or_empty(&self, result: Result<ClauseList, ServiceError>) -> ClauseList {
        result.unwrap_or_else(|e| {
            warn!(error = %e, "clause extraction failed, returning no clauses");
            ClauseList::new()
        })
    }
}
