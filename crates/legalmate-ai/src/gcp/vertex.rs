use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GcpConfig, post_json, trim_base};
use crate::{ServiceError, SummaryService};

/// Vertex AI text model `:predict` (PaLM-style text generation).
pub struct VertexTextClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    location: String,
    model: String,
    access_token: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters,
}

#[derive(Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(default)]
    content: String,
}

impl VertexTextClient {
    pub fn new(client: reqwest::Client, config: &GcpConfig) -> Self {
        Self {
            client,
            base_url: config.regional_base("aiplatform"),
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            model: config.model.clone(),
            access_token: config.access_token.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = trim_base(base_url);
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.base_url, self.project_id, self.location, self.model
        )
    }
}

fn first_prediction(resp: PredictResponse) -> Result<String, ServiceError> {
    resp.predictions
        .into_iter()
        .next()
        .map(|p| p.content)
        .ok_or_else(|| ServiceError::Malformed("no predictions in response".into()))
}

#[async_trait]
impl SummaryService for VertexTextClient {
    async fn summarize(
        &self,
        text: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, ServiceError> {
        let body = PredictRequest {
            instances: [Instance { prompt: text }],
            parameters: Parameters {
                max_output_tokens,
                temperature,
            },
        };
        let resp: PredictResponse =
            post_json(&self.client, &self.url(), &self.access_token, &body).await?;
        first_prediction(resp)
    }
}
