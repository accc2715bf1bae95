//! Google Cloud REST adapters for the analysis collaborators.
//!
//! One [`reqwest::Client`] is shared by all three adapters. Requests carry a
//! caller-supplied OAuth bearer token; obtaining or refreshing it is the
//! caller's job.

mod document_ai;
mod language;
mod vertex;

pub use document_ai::DocumentAiClient;
pub use language::NaturalLanguageClient;
pub use vertex::VertexTextClient;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ServiceError;

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "text-bison@001";

/// Project-level settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct GcpConfig {
    pub project_id: String,
    pub location: String,
    /// Document AI processor; only the clause extractor needs it.
    pub processor_id: Option<String>,
    pub access_token: String,
    /// Vertex AI text model used for summaries.
    pub model: String,
}

impl GcpConfig {
    pub fn new(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: DEFAULT_LOCATION.to_string(),
            processor_id: None,
            access_token: access_token.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Regional endpoint root, e.g. `https://us-central1-aiplatform.googleapis.com`.
    fn regional_base(&self, service: &str) -> String {
        format!("https://{}-{service}.googleapis.com", self.location)
    }
}

/// POST a JSON body with bearer auth and decode the JSON reply.
///
/// 429 maps to [`ServiceError::Quota`]; any other non-2xx status to
/// [`ServiceError::Server`].
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    token: &str,
    body: &B,
) -> Result<R, ServiceError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    debug!(url = %url, "calling Google Cloud API");
    let resp = client.post(url).bearer_auth(token).json(body).send().await?;
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceError::Quota);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ServiceError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
