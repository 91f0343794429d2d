//! Parser Client - HTTP client for the language parser sidecar
//!
//! The sidecar tokenizes, tags and dependency-parses messages, splits text
//! into sentences and scores sentence similarity. Documents come back in the
//! serialized arena form understood by [`intake::Document`].

use std::time::Duration;

use async_trait::async_trait;
use intake::{AnalyzerError, Document, LinguisticAnalyzer, SentenceSpan};
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};

pub mod types;
pub use types::*;

const DEFAULT_PARSER_URL: &str = "http://localhost:8090";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ParserClientError {
    #[error("Parser service not reachable at {0}")]
    NotReachable(String),
    #[error("Parser API error: {0}")]
    ApiError(String),
    #[error("Failed to parse parser response: {0}")]
    ParseError(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl From<ParserClientError> for AnalyzerError {
    fn from(err: ParserClientError) -> Self {
        match err {
            ParserClientError::NotReachable(_) => AnalyzerError::Unavailable(err.to_string()),
            other => AnalyzerError::Api(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParserClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ParserClientConfig {
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PARSER_URL").unwrap_or_else(|_| DEFAULT_PARSER_URL.to_string());
        let timeout_secs = std::env::var("PARSER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for ParserClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PARSER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Client for the parser sidecar
#[derive(Debug, Clone)]
pub struct ParserClient {
    base_url: String,
    client: Client,
}

impl ParserClient {
    pub fn new(config: &ParserClientConfig) -> Result<Self, ParserClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ParserClientError> {
        let resp = self
            .client
            .get(self.url("health"))
            .send()
            .await
            .map_err(|_| ParserClientError::NotReachable(self.base_url.clone()))?;

        decode(resp).await
    }

    pub async fn parse_document(&self, text: &str) -> Result<Document, ParserClientError> {
        self.post("parse", &TextRequest { text }).await
    }

    pub async fn split_sentences(
        &self,
        text: &str,
    ) -> Result<Vec<SentenceSpan>, ParserClientError> {
        let resp: SentencesResponse = self.post("sentences", &TextRequest { text }).await?;
        Ok(resp.sentences)
    }

    pub async fn score(&self, a: &str, b: &str) -> Result<f32, ParserClientError> {
        let resp: SimilarityResponse = self.post("similarity", &SimilarityRequest { a, b }).await?;
        Ok(resp.score)
    }

    /// One round trip for a whole candidate list
    pub async fn rank_candidates(
        &self,
        query: &str,
        candidates: &[String],
    ) -> Result<Vec<f32>, ParserClientError> {
        let resp: RankResponse = self
            .post("rank", &RankRequest { query, candidates })
            .await?;

        if resp.scores.len() != candidates.len() {
            return Err(ParserClientError::ParseError(format!(
                "expected {} scores, got {}",
                candidates.len(),
                resp.scores.len()
            )));
        }
        Ok(resp.scores)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ParserClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ParserClientError::NotReachable(self.base_url.clone())
                } else {
                    ParserClientError::ApiError(e.to_string())
                }
            })?;

        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ParserClientError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("status {}", status));
        return Err(ParserClientError::ApiError(message));
    }

    resp.json()
        .await
        .map_err(|e| ParserClientError::ParseError(e.to_string()))
}

#[async_trait]
impl LinguisticAnalyzer for ParserClient {
    async fn parse(&self, text: &str) -> Result<Document, AnalyzerError> {
        Ok(self.parse_document(text).await?)
    }

    async fn similarity(&self, a: &str, b: &str) -> Result<f32, AnalyzerError> {
        Ok(self.score(a, b).await?)
    }

    async fn sentences(&self, text: &str) -> Result<Vec<SentenceSpan>, AnalyzerError> {
        Ok(self.split_sentences(text).await?)
    }

    async fn rank(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, AnalyzerError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.rank_candidates(query, candidates).await?)
    }
}

/// Build a client and log whether the sidecar answers. The client is
/// returned either way; requests fail individually while it is down.
pub async fn connect(config: &ParserClientConfig) -> Result<ParserClient, ParserClientError> {
    let client = ParserClient::new(config)?;

    match client.health_check().await {
        Ok(health) => info!(
            "Connected to parser at {} ({})",
            client.base_url(),
            health.model.as_deref().unwrap_or("unknown model")
        ),
        Err(e) => warn!("Parser not available at {}: {}", client.base_url(), e),
    }

    Ok(client)
}
