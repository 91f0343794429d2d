use async_trait::async_trait;
use thiserror::Error;

use crate::document::{Document, DocumentError, SentenceSpan};

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Language analyzer not reachable: {0}")]
    Unavailable(String),
    #[error("Language analyzer error: {0}")]
    Api(String),
    #[error("Invalid document from language analyzer: {0}")]
    InvalidDocument(#[from] DocumentError),
}

/// Tokenizer, tagger, dependency parser, entity recognizer and sentence
/// similarity model behind one seam.
#[async_trait]
pub trait LinguisticAnalyzer: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Document, AnalyzerError>;

    async fn similarity(&self, a: &str, b: &str) -> Result<f32, AnalyzerError>;

    async fn sentences(&self, text: &str) -> Result<Vec<SentenceSpan>, AnalyzerError>;

    /// Similarity of `query` against every candidate, in candidate order.
    /// Implementations with a batch endpoint should override this.
    async fn rank(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, AnalyzerError> {
        let mut scores = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            scores.push(self.similarity(query, candidate).await?);
        }
        Ok(scores)
    }
}
