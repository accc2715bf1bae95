//! Document analysis pipeline: extraction → normalisation → risk, entity and
//! summary analysis → one immutable [`AnalysisResult`].
//!
//! Only extraction can fail a run. Once text is normalised every analysis
//! stage degrades on its own and the run always completes.

mod stage;

pub use legalmate_extract::ExtractionError;
pub use stage::PipelineStage;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use legalmate_ai::{
    ClauseExtractor, DocumentAiService, EntityAnalyzer, EntityService, Summarizer, SummaryService,
};
use legalmate_core::{
    AnalysisResult, DocumentFormat, NormalizedText, PipelineConfig, RawDocument, normalize, scan,
};
use tracing::{debug, error, info};

use stage::Progress;

/// Single entry point for analysing one document.
///
/// Holds shared collaborator handles only; concurrent calls to
/// [`analyze`](Self::analyze) share no mutable state.
pub struct AnalysisPipeline {
    entity_service: Arc<dyn EntityService>,
    summary_service: Arc<dyn SummaryService>,
    document_service: Option<Arc<dyn DocumentAiService>>,
    config: PipelineConfig,
    entities: EntityAnalyzer,
    summarizer: Summarizer,
    clauses: Option<ClauseExtractor>,
}

impl AnalysisPipeline {
    pub fn new(
        entity_service: Arc<dyn EntityService>,
        summary_service: Arc<dyn SummaryService>,
    ) -> Self {
        let config = PipelineConfig::default();
        Self {
            entities: build_entities(&entity_service, &config),
            summarizer: build_summarizer(&summary_service, &config),
            entity_service,
            summary_service,
            document_service: None,
            clauses: None,
            config,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.entities = build_entities(&self.entity_service, &config);
        self.summarizer = build_summarizer(&self.summary_service, &config);
        self.clauses = self
            .document_service
            .as_ref()
            .map(|service| build_clauses(service, &config));
        self.config = config;
        self
    }

    /// Enable the diagnostic variant, which also runs structured clause
    /// extraction over the original file.
    pub fn with_clause_extractor(mut self, service: Arc<dyn DocumentAiService>) -> Self {
        self.clauses = Some(build_clauses(&service, &self.config));
        self.document_service = Some(service);
        self
    }

    pub fn is_diagnostic(&self) -> bool {
        self.clauses.is_some()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyse a file on disk; the format comes from its extension.
    pub async fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, ExtractionError> {
        let format = DocumentFormat::from_path(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "rejecting document");
        })?;
        let mut progress = Progress::new(format);
        match self.read_checked(path).await {
            Ok(bytes) => self.run(RawDocument::new(bytes, format), progress).await,
            Err(e) => {
                progress.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn analyze_bytes(
        &self,
        bytes: Vec<u8>,
        format: DocumentFormat,
    ) -> Result<AnalysisResult, ExtractionError> {
        self.analyze(RawDocument::new(bytes, format)).await
    }

    /// Run the whole pipeline over one document.
    pub async fn analyze(&self, doc: RawDocument) -> Result<AnalysisResult, ExtractionError> {
        let progress = Progress::new(doc.format);
        self.run(doc, progress).await
    }

    async fn run(
        &self,
        doc: RawDocument,
        mut progress: Progress,
    ) -> Result<AnalysisResult, ExtractionError> {
        let started = Instant::now();
        let format = doc.format;

        if let Err(e) = self.check_size(doc.len() as u64) {
            progress.fail(&e);
            return Err(e);
        }

        let doc = Arc::new(doc);
        let raw = match extract_blocking(Arc::clone(&doc)).await {
            Ok(raw) => raw,
            Err(e) => {
                progress.fail(&e);
                return Err(e);
            }
        };
        progress.advance(PipelineStage::Extracted);

        let text = normalize(&raw);
        drop(raw);
        progress.advance(PipelineStage::Normalized);

        let result = self.analyze_text(text, Some(doc.as_ref())).await;
        progress.advance(PipelineStage::Analyzed);

        progress.advance(PipelineStage::Complete);
        info!(
            %format,
            chars = result.text().len(),
            entities = result.entities().mention_count(),
            risks = result.risks().len(),
            clauses = result.clauses().map(<[String]>::len),
            summary_unavailable = result.summary_unavailable(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "document analysed"
        );
        Ok(result)
    }

    /// Analysis stages over already-normalised text. Never fails.
    ///
    /// Risk scan, entity analysis and summarisation run concurrently; clause
    /// extraction joins them when the pipeline is diagnostic and the
    /// original document is available.
    pub async fn analyze_text(
        &self,
        text: NormalizedText,
        doc: Option<&RawDocument>,
    ) -> AnalysisResult {
        let clauses = async {
            match (&self.clauses, doc) {
                (Some(extractor), Some(doc)) => Some(extractor.extract_clauses_from(doc).await),
                (Some(_), None) => {
                    debug!("diagnostic pipeline without source document, skipping clauses");
                    Some(Vec::new())
                }
                (None, _) => None,
            }
        };

        let (risks, entities, summary, clauses) = tokio::join!(
            async { scan(&text) },
            self.entities.analyze(&text),
            self.summarizer.summarize(&text),
            clauses,
        );

        AnalysisResult::new(text, entities, summary, risks, clauses)
    }

    /// Read a file after checking its size on disk against the limit.
    async fn read_checked(&self, path: &Path) -> Result<Vec<u8>, ExtractionError> {
        let size = tokio::fs::metadata(path).await?.len();
        self.check_size(size)?;
        Ok(tokio::fs::read(path).await?)
    }

    fn check_size(&self, size: u64) -> Result<(), ExtractionError> {
        let limit = self.config.max_document_bytes;
        if size > limit {
            return Err(ExtractionError::TooLarge { size, limit });
        }
        Ok(())
    }
}

async fn extract_blocking(doc: Arc<RawDocument>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || legalmate_extract::extract_document(&doc))
        .await
        .map_err(|e| ExtractionError::Worker(e.to_string()))?
}

fn build_entities(service: &Arc<dyn EntityService>, config: &PipelineConfig) -> EntityAnalyzer {
    EntityAnalyzer::new(Arc::clone(service)).with_timeout(config.call_timeout)
}

fn build_summarizer(service: &Arc<dyn SummaryService>, config: &PipelineConfig) -> Summarizer {
    Summarizer::new(Arc::clone(service))
        .with_params(config.summary.clone())
        .with_retry(config.retry.clone())
        .with_timeout(config.call_timeout)
}

fn build_clauses(service: &Arc<dyn DocumentAiService>, config: &PipelineConfig) -> ClauseExtractor {
    ClauseExtractor::new(Arc::clone(service)).with_timeout(config.call_timeout)
}
