use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::{GcpConfig, post_json, trim_base};
use crate::{DocumentAiService, DocumentEntity, ServiceError};

/// Document AI processor `:process` over raw document bytes.
pub struct DocumentAiClient {
    client: reqwest::Client,
    base_url: String,
    processor_name: String,
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct ProcessResponse {
    document: ProcessedDocument,
}

#[derive(Deserialize)]
struct ProcessedDocument {
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entity {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    mention_text: String,
}

impl DocumentAiClient {
    /// Fails with [`ServiceError::InvalidInput`] when no processor is configured.
    pub fn new(client: reqwest::Client, config: &GcpConfig) -> Result<Self, ServiceError> {
        let processor = config
            .processor_id
            .as_deref()
            .ok_or_else(|| ServiceError::InvalidInput("Document AI processor id not set".into()))?;
        Ok(Self {
            client,
            base_url: config.regional_base("documentai"),
            processor_name: format!(
                "projects/{}/locations/{}/processors/{processor}",
                config.project_id, config.location
            ),
            access_token: config.access_token.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = trim_base(base_url);
        self
    }

    fn url(&self) -> String {
        format!("{}/v1/{}:process", self.base_url, self.processor_name)
    }
}

fn into_entities(resp: ProcessResponse) -> Vec<DocumentEntity> {
    resp.document
        .entities
        .into_iter()
        .map(|e| DocumentEntity::new(e.kind, e.mention_text))
        .collect()
}

#[async_trait]
impl DocumentAiService for DocumentAiClient {
    async fn process_document(
        &self,
        content: &[u8],
        mime_type: &str,
    ) -> Result<Vec<DocumentEntity>, ServiceError> {
        let body = ProcessRequest {
            raw_document: RawDocument {
                content: STANDARD.encode(content),
                mime_type,
            },
        };
        let resp: ProcessResponse =
            post_json(&self.client, &self.url(), &self.access_token, &body).await?;
        Ok(into_entities(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GcpConfig {
        let mut config = GcpConfig::new("demo-project", "t");
        config.processor_id = Some("77c5".into());
        config
    }

    #[test]
    fn requires_processor_id() {
        let result = DocumentAiClient::new(reqwest::Client::new(), &GcpConfig::new("p", "t"));
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn process_url() {
        let client = DocumentAiClient::new(reqwest::Client::new(), &config()).unwrap();
        assert_eq!(
            client.url(),
            "https://us-central1-documentai.googleapis.com/v1/projects/demo-project/\
             locations/us-central1/processors/77c5:process"
        );
    }

    #[test]
    fn request_is_base64_encoded() {
        let body = ProcessRequest {
            raw_document: RawDocument {
                content: STANDARD.encode(b"%PDF"),
                mime_type: "application/pdf",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["rawDocument"]["content"], "JVBERg==");
        assert_eq!(json["rawDocument"]["mimeType"], "application/pdf");
    }

    #[test]
    fn response_parsing() {
        let json = r#"{
            "document": {
                "text": "full text",
                "entities": [
                    {"type": "clause", "mentionText": "Termination on notice.", "confidence": 0.9},
                    {"type": "party", "mentionText": "Acme Corp"},
                    {"type": "clause"}
                ]
            }
        }"#;
        let resp: ProcessResponse = serde_json::from_str(json).unwrap();
        let entities = into_entities(resp);
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0], DocumentEntity::new("clause", "Termination on notice."));
        assert_eq!(entities[2].mention_text, "");
    }
}
