use std::sync::Arc;
use std::time::Duration;

use legalmate_core::{EntityMap, NormalizedText, sentences};
use tracing::{debug, warn};

use crate::retry::with_timeout;
use crate::{EntityService, ServiceError};

/// Clause phrases detected locally: sentence must contain the trigger
/// (lower-case) to record the label under `CLAUSES`.
const CLAUSE_PATTERNS: &[(&str, &str)] = &[
    ("governing law", "Governing Law"),
    ("force majeure", "Force Majeure"),
];

/// Map a coarse entity type to a category of interest.
///
/// Only organisations, people, dates and legal references are kept.
pub fn category_for(kind: &str) -> Option<&'static str> {
    [
        EntityMap::ORGANIZATION,
        EntityMap::PERSON,
        EntityMap::DATE,
        EntityMap::LAW,
    ]
    .into_iter()
    .find(|category| category.eq_ignore_ascii_case(kind))
}

/// Local clause pass: one `CLAUSES` entry per matching sentence and pattern.
pub fn detect_clauses(text: &NormalizedText) -> EntityMap {
    let mut map = EntityMap::new();
    for sentence in sentences(text.as_str()) {
        let lowered = sentence.to_lowercase();
        for (trigger, label) in CLAUSE_PATTERNS {
            if lowered.contains(trigger) {
                map.push(EntityMap::CLAUSES, *label);
            }
        }
    }
    map
}

/// Merges remote named entities with locally detected clauses.
pub struct EntityAnalyzer {
    service: Arc<dyn EntityService>,
    call_timeout: Duration,
}

impl EntityAnalyzer {
    pub fn new(service: Arc<dyn EntityService>) -> Self {
        Self {
            service,
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Build the entity map. Never fails.
    ///
    /// If the remote service errors, only the local clause pass contributes.
    pub async fn analyze(&self, text: &NormalizedText) -> EntityMap {
        let mut map = match self.remote_entities(text).await {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "entity extraction failed, using local clause detection only");
                EntityMap::new()
            }
        };
        map.merge(detect_clauses(text));
        debug!(
            categories = map.len(),
            mentions = map.mention_count(),
            "entity analysis complete"
        );
        map
    }

    /// Remote pass only, filtered to the categories of interest.
    pub async fn remote_entities(&self, text: &NormalizedText) -> Result<EntityMap, ServiceError> {
        if text.is_empty() {
            return Ok(EntityMap::new());
        }
        let mentions =
            with_timeout(self.call_timeout, self.service.analyze_entities(text.as_str())).await?;
        Ok(mentions
            .into_iter()
            .filter_map(|m| category_for(&m.kind).map(|category| (category, m.text)))
            .collect())
    }
}
