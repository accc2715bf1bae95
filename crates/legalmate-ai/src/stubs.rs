//! Scripted collaborators for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{DocumentAiService, DocumentEntity, EntityMention, EntityService, ServiceError, SummaryService};

/// Entity service returning a fixed list, or failing on every call.
pub struct StubEntities {
    pub mentions: Option<Vec<EntityMention>>,
    delay: Duration,
}

impl StubEntities {
    pub fn returning(mentions: Vec<EntityMention>) -> Self {
        Self {
            mentions: Some(mentions),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            mentions: None,
            delay: Duration::ZERO,
        }
    }

    /// Answers `mentions` only after `delay`.
    pub fn slow(delay: Duration, mentions: Vec<EntityMention>) -> Self {
        Self {
            delay,
            ..Self::returning(mentions)
        }
    }
}

#[async_trait]
impl EntityService for StubEntities {
    async fn analyze_entities(&self, _text: &str) -> Result<Vec<EntityMention>, ServiceError> {
        tokio::time::sleep(self.delay).await;
        self.mentions.clone().ok_or(ServiceError::Server {
            status: 503,
            body: "unavailable".into(),
        })
    }
}

/// Summary service that fails `failures` times, then answers `reply`.
/// Records the (paused-clock) instant of every call.
pub struct StubSummary {
    failures: u32,
    reply: String,
    delay: Duration,
    pub calls: Mutex<Vec<Instant>>,
}

impl StubSummary {
    pub fn new(failures: u32, reply: &str) -> Self {
        Self {
            failures,
            reply: reply.to_string(),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(u32::MAX, "")
    }

    /// Every call takes `delay` before answering.
    pub fn slow(delay: Duration, reply: &str) -> Self {
        Self {
            delay,
            ..Self::new(0, reply)
        }
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryService for StubSummary {
    async fn summarize(
        &self,
        _text: &str,
        _max_output_tokens: u32,
        _temperature: f32,
    ) -> Result<String, ServiceError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            calls.len() as u32
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if n <= self.failures {
            Err(ServiceError::Quota)
        } else {
            Ok(self.reply.clone())
        }
    }
}

/// Document service returning fixed entities or failing.
pub struct StubDocumentAi {
    pub entities: Option<Vec<DocumentEntity>>,
    pub seen_mime: Mutex<Option<String>>,
    delay: Duration,
}

impl StubDocumentAi {
    pub fn returning(entities: Vec<DocumentEntity>) -> Self {
        Self {
            entities: Some(entities),
            seen_mime: Mutex::new(None),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            entities: None,
            ..Self::returning(Vec::new())
        }
    }

    pub fn slow(delay: Duration, entities: Vec<DocumentEntity>) -> Self {
        Self {
            delay,
            ..Self::returning(entities)
        }
    }
}

#[async_trait]
impl DocumentAiService for StubDocumentAi {
    async fn process_document(
        &self,
        _content: &[u8],
        mime_type: &str,
    ) -> Result<Vec<DocumentEntity>, ServiceError> {
        *self.seen_mime.lock().unwrap() = Some(mime_type.to_string());
        tokio::time::sleep(self.delay).await;
        self.entities
            .clone()
            .ok_or_else(|| ServiceError::Malformed("no document".into()))
    }
}
