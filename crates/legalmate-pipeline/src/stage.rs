//! Pipeline run states.
//!
//! ```text
//! Received → Extracted → Normalized → Analyzed → Complete
//!     └──────────┴──→ Failed
//! ```

use std::fmt;

use legalmate_core::DocumentFormat;
use tracing::{debug, error};

use crate::ExtractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    Extracted,
    Normalized,
    Analyzed,
    Complete,
    /// Extraction failed; terminal.
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Extracted => "extracted",
            Self::Normalized => "normalized",
            Self::Analyzed => "analyzed",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_advance_to(&self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Received, Extracted)
                | (Extracted, Normalized)
                | (Normalized, Analyzed)
                | (Analyzed, Complete)
                | (Received, Failed)
                | (Extracted, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks and logs the stage of one run.
pub(crate) struct Progress {
    stage: PipelineStage,
    format: DocumentFormat,
}

impl Progress {
    pub(crate) fn new(format: DocumentFormat) -> Self {
        debug!(%format, stage = %PipelineStage::Received, "pipeline stage");
        Self {
            stage: PipelineStage::Received,
            format,
        }
    }

    pub(crate) fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal pipeline transition {} -> {}",
            self.stage,
            next
        );
        self.stage = next;
        debug!(format = %self.format, stage = %next, "pipeline stage");
    }

    pub(crate) fn fail(&mut self, e: &ExtractionError) {
        let from = self.stage;
        self.advance(PipelineStage::Failed);
        error!(format = %self.format, from = %from, error = %e, "document extraction failed");
    }

    #[cfg(test)]
    pub(crate) fn stage(&self) -> PipelineStage {
        self.stage
    }
}
