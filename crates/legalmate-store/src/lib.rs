//! Storage of analysed documents, kept outside the analysis core.

mod error;
mod json;

pub use error::StoreError;
pub use json::JsonStore;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use legalmate_core::AnalysisResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_PROCESSED: &str = "processed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

/// A document about to be stored.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub result: AnalysisResult,
    /// Original file bytes, kept beside the record when present.
    pub source: Option<Vec<u8>>,
}

impl NewDocument {
    /// Stamped with the current time.
    pub fn now(filename: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            filename: filename.into(),
            upload_time: Utc::now(),
            result,
            source: None,
        }
    }

    pub fn with_source(mut self, bytes: Vec<u8>) -> Self {
        self.source = Some(bytes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub status: String,
    /// Stored copy of the uploaded file, if one was kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    pub analysis: AnalysisResult,
}

/// One page of stored documents, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPage {
    pub documents: Vec<DocumentRecord>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    /// `page * limit < total`.
    pub has_next: bool,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, doc: NewDocument) -> Result<DocumentId, StoreError>;

    async fn get(&self, id: DocumentId) -> Result<DocumentRecord, StoreError>;

    /// Pages are numbered from 1; page 0 is treated as 1.
    async fn list(&self, page: usize, limit: usize) -> Result<DocumentPage, StoreError>;

    /// Bytes of the uploaded file kept with the record.
    async fn source(&self, id: DocumentId) -> Result<Vec<u8>, StoreError>;

    /// Removes the record and its source file.
    async fn delete(&self, id: DocumentId) -> Result<(), StoreError>;
}
