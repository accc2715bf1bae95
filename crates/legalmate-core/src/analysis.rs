//! Analysis output types handed from the pipeline to the persistence layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::text::NormalizedText;

/// Placeholder summary returned when the summarisation service is unavailable.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable – API error";

/// Ordered, human-readable risk indicators.
pub type RiskList = Vec<String>;

/// Clause text spans in the order the structured-document service returned them.
pub type ClauseList = Vec<String>;

/// Entity category → mentions in discovery order.
///
/// Duplicates are kept. Categories iterate in lexicographic order; mentions
/// within a category keep the order they were detected in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityMap(BTreeMap<String, Vec<String>>);

impl EntityMap {
    pub const ORGANIZATION: &'static str = "ORGANIZATION";
    pub const PERSON: &'static str = "PERSON";
    pub const DATE: &'static str = "DATE";
    pub const LAW: &'static str = "LAW";
    pub const CLAUSES: &'static str = "CLAUSES";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mention to a category, creating the category on first use.
    pub fn push(&mut self, category: impl Into<String>, mention: impl Into<String>) {
        self.0.entry(category.into()).or_default().push(mention.into());
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of categories with at least one mention.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total mentions across all categories.
    pub fn mention_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append every mention of `other` after this map's own mentions.
    pub fn merge(&mut self, other: EntityMap) {
        for (category, mentions) in other.0 {
            self.0.entry(category).or_default().extend(mentions);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (category, mention) in iter {
            map.push(category, mention);
        }
        map
    }
}

/// Complete analysis of one document.
///
/// Built once per pipeline run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    text: NormalizedText,
    entities: EntityMap,
    summary: String,
    risks: RiskList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clauses: Option<ClauseList>,
}

impl AnalysisResult {
    /// Assemble a result. A blank summary is replaced by [`SUMMARY_UNAVAILABLE`].
    pub fn new(
        text: NormalizedText,
        entities: EntityMap,
        summary: String,
        risks: RiskList,
        clauses: Option<ClauseList>,
    ) -> Self {
        let summary = if summary.trim().is_empty() {
            SUMMARY_UNAVAILABLE.to_string()
        } else {
            summary
        };
        Self {
            text,
            entities,
            summary,
            risks,
            clauses,
        }
    }

    pub fn text(&self) -> &NormalizedText {
        &self.text
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Whether the summary is the unavailability placeholder.
    pub fn summary_unavailable(&self) -> bool {
        self.summary == SUMMARY_UNAVAILABLE
    }

    pub fn risks(&self) -> &[String] {
        &self.risks
    }

    /// Clauses from the diagnostic pipeline; `None` when it was not enabled.
    pub fn clauses(&self) -> Option<&[String]> {
        self.clauses.as_deref()
    }
}
