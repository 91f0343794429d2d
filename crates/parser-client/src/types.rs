//! Request and response bodies of the parser sidecar

use intake::SentenceSpan;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Body of `/parse` and `/sentences`
#[derive(Debug, Clone, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityRequest<'a> {
    pub a: &'a str,
    pub b: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityResponse {
    pub score: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentencesResponse {
    pub sentences: Vec<SentenceSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankRequest<'a> {
    pub query: &'a str,
    pub candidates: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankResponse {
    pub scores: Vec<f32>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
