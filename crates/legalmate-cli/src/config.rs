//! Turning command-line settings into configured collaborators.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use legalmate_ai::gcp::{
    DEFAULT_LOCATION, DocumentAiClient, GcpConfig, NaturalLanguageClient, VertexTextClient,
};
use legalmate_core::PipelineConfig;
use legalmate_pipeline::AnalysisPipeline;
use legalmate_store::JsonStore;

/// Settings shared by every subcommand.
#[derive(Debug, Args)]
pub struct Settings {
    /// Google Cloud project id.
    #[arg(long, env = "GCP_PROJECT_ID", global = true)]
    pub project: Option<String>,

    /// Region for Vertex AI and Document AI.
    #[arg(long, env = "GCP_LOCATION", default_value = DEFAULT_LOCATION, global = true)]
    pub location: String,

    /// Document AI processor used for clause extraction.
    #[arg(long, env = "DOC_AI_PROCESSOR_ID", global = true)]
    pub processor: Option<String>,

    /// OAuth bearer token for the Google Cloud APIs.
    #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Directory holding stored analyses.
    #[arg(long, env = "LEGALMATE_STORE", default_value = "uploads", global = true)]
    pub store: PathBuf,

    /// Per-call timeout for external services, in seconds.
    #[arg(long, env = "LEGALMATE_CALL_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,
}

impl Settings {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            call_timeout: Duration::from_secs(self.timeout_secs),
            ..PipelineConfig::default()
        }
    }

    pub fn gcp_config(&self) -> anyhow::Result<GcpConfig> {
        let project = self
            .project
            .clone()
            .context("no project id: pass --project or set GCP_PROJECT_ID")?;
        let token = self
            .token
            .clone()
            .context("no access token: pass --token or set GCP_ACCESS_TOKEN")?;
        let mut config = GcpConfig::new(project, token);
        config.location = self.location.clone();
        config.processor_id = self.processor.clone();
        Ok(config)
    }

    /// Remote-backed collaborators, built once and shared.
    pub fn services(&self) -> anyhow::Result<Services> {
        let gcp = self.gcp_config()?;
        let http = reqwest::Client::new();
        Ok(Services {
            entities: Arc::new(NaturalLanguageClient::new(
                http.clone(),
                gcp.access_token.clone(),
            )),
            summary: Arc::new(VertexTextClient::new(http.clone(), &gcp)),
            http,
            gcp,
        })
    }

    pub async fn open_store(&self) -> anyhow::Result<JsonStore> {
        JsonStore::open(&self.store)
            .await
            .with_context(|| format!("opening store at {}", self.store.display()))
    }
}

pub struct Services {
    pub entities: Arc<NaturalLanguageClient>,
    pub summary: Arc<VertexTextClient>,
    http: reqwest::Client,
    gcp: GcpConfig,
}

impl Services {
    pub fn pipeline(&self, config: PipelineConfig, clauses: bool) -> anyhow::Result<AnalysisPipeline> {
        let pipeline = AnalysisPipeline::new(self.entities.clone(), self.summary.clone());
        let pipeline = if clauses {
            let documents = DocumentAiClient::new(self.http.clone(), &self.gcp)
                .context("clause extraction needs --processor or DOC_AI_PROCESSOR_ID")?;
            pipeline.with_clause_extractor(Arc::new(documents))
        } else {
            pipeline
        };
        Ok(pipeline.with_config(config))
    }
}
