use std::sync::Arc;
use std::time::Duration;

use legalmate_core::{NormalizedText, RetryPolicy, SUMMARY_UNAVAILABLE, SummaryParams};
use tracing::{debug, warn};

use crate::retry::{with_backoff, with_timeout};
use crate::{ServiceError, SummaryService};

/// Generative summary with bounded retries and a fixed fallback.
pub struct Summarizer {
    service: Arc<dyn SummaryService>,
    params: SummaryParams,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl Summarizer {
    pub fn new(service: Arc<dyn SummaryService>) -> Self {
        Self {
            service,
            params: SummaryParams::default(),
            retry: RetryPolicy::default(),
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_params(mut self, params: SummaryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Summarise the text, or return [`SUMMARY_UNAVAILABLE`] once every
    /// attempt has failed. Never empty.
    pub async fn summarize(&self, text: &NormalizedText) -> String {
        match self.try_summarize(text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "summarisation unavailable, using placeholder");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }

    /// Summarise under the retry policy; each attempt is bounded by the
    /// call timeout. A blank reply counts as a failed attempt.
    pub async fn try_summarize(&self, text: &NormalizedText) -> Result<String, ServiceError> {
        if text.is_empty() {
            return Err(ServiceError::InvalidInput("nothing to summarise".into()));
        }
        let summary = with_backoff(&self.retry, "summarize", move || async move {
            let reply = with_timeout(
                self.call_timeout,
                self.service.summarize(
                    text.as_str(),
                    self.params.max_output_tokens,
                    self.params.temperature,
                ),
            )
            .await?;
            let reply = reply.trim();
            if reply.is_empty() {
                Err(ServiceError::Malformed("empty summary".into()))
            } else {
                Ok(reply.to_string())
            }
        })
        .await?;
        debug!(chars = summary.len(), "summary generated");
        Ok(summary)
    }
}
