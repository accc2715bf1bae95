use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{post_json, trim_base};
use crate::{EntityMention, EntityService, ServiceError};

const DEFAULT_BASE_URL: &str = "https://language.googleapis.com";

/// Cloud Natural Language `documents:analyzeEntities`.
pub struct NaturalLanguageClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeEntitiesRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
    language: &'static str,
}

#[derive(Deserialize)]
struct AnalyzeEntitiesResponse {
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
struct Entity {
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl NaturalLanguageClient {
    pub fn new(client: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Point at a different endpoint root (no trailing slash needed).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = trim_base(base_url);
        self
    }

    fn url(&self) -> String {
        format!("{}/v1/documents:analyzeEntities", self.base_url)
    }
}

fn into_mentions(resp: AnalyzeEntitiesResponse) -> Vec<EntityMention> {
    resp.entities
        .into_iter()
        .map(|e| EntityMention::new(e.name, e.kind))
        .collect()
}

#[async_trait]
impl EntityService for NaturalLanguageClient {
    async fn analyze_entities(&self, text: &str) -> Result<Vec<EntityMention>, ServiceError> {
        let body = AnalyzeEntitiesRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
                language: "en",
            },
            encoding_type: "UTF8",
        };
        let resp: AnalyzeEntitiesResponse =
            post_json(&self.client, &self.url(), &self.access_token, &body).await?;
        Ok(into_mentions(resp))
    }
}
