//! Answers messages that carry no actionable intent by returning the stored
//! sentence closest to the question.

use crate::{analyzer::LinguisticAnalyzer, store::PersistenceStore};

pub const FALLBACK_APOLOGY: &str = "Sorry, I didn't understand you.";

#[derive(Debug, Clone, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: any store or analyzer problem degrades to the apology
    pub async fn respond(
        &self,
        analyzer: &dyn LinguisticAnalyzer,
        store: &dyn PersistenceStore,
        message: &str,
    ) -> String {
        let corpus = match store.fetch_corpus().await {
            Ok(corpus) => corpus,
            Err(e) => {
                tracing::warn!("Failed to build fallback corpus: {}", e);
                return FALLBACK_APOLOGY.to_string();
            }
        };
        if corpus.trim().is_empty() {
            return FALLBACK_APOLOGY.to_string();
        }

        let sentences: Vec<String> = match analyzer.sentences(&corpus).await {
            Ok(spans) => spans
                .into_iter()
                .map(|span| span.text.trim().to_string())
                .filter(|text| !text.is_empty())
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to split fallback corpus into sentences: {}", e);
                return FALLBACK_APOLOGY.to_string();
            }
        };
        if sentences.is_empty() {
            return FALLBACK_APOLOGY.to_string();
        }

        let scores = match analyzer.rank(message, &sentences).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!("Failed to rank fallback sentences: {}", e);
                return FALLBACK_APOLOGY.to_string();
            }
        };

        match best_match(&sentences, &scores) {
            Some((sentence, score)) => {
                tracing::debug!("Fallback answer scored {:.3}", score);
                sentence.to_string()
            }
            None => FALLBACK_APOLOGY.to_string(),
        }
    }
}

/// Highest positive score; the earliest sentence wins ties
fn best_match<'a>(sentences: &'a [String], scores: &[f32]) -> Option<(&'a str, f32)> {
    sentences
        .iter()
        .zip(scores)
        .filter(|(_, score)| score.is_finite() && **score > 0.0)
        .fold(None, |best: Option<(&'a str, f32)>, (sentence, score)| match best {
            Some((_, top)) if top >= *score => best,
            _ => Some((sentence.as_str(), *score)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAnalyzer, MemoryStore};

    #[test]
    fn test_best_match_prefers_first_of_equal_scores() {
        let sentences = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(best_match(&sentences, &[0.2, 0.7, 0.7]), Some(("b", 0.7)));
        assert_eq!(best_match(&sentences, &[0.0, -1.0, f32::NAN]), None);
        assert_eq!(best_match(&[], &[]), None);
    }

    #[tokio::test]
    async fn test_returns_most_similar_sentence() {
        let store = MemoryStore::new().with_corpus(
            "There is a project called Apollo.\n\
             Task Design is assigned to alice.\n\
             Task Design has the deadline 15/03/2024.",
        );
        let analyzer = FakeAnalyzer::new();

        let answer = FallbackResponder::new()
            .respond(&analyzer, &store, "when is the deadline of Design")
            .await;
        assert_eq!(answer, "Task Design has the deadline 15/03/2024.");
    }

    #[tokio::test]
    async fn test_empty_corpus_apologises() {
        let store = MemoryStore::new();
        let analyzer = FakeAnalyzer::new();

        let answer = FallbackResponder::new()
            .respond(&analyzer, &store, "what is going on")
            .await;
        assert_eq!(answer, FALLBACK_APOLOGY);
    }

    #[tokio::test]
    async fn test_no_overlap_apologises() {
        let store = MemoryStore::new().with_corpus("There is a project called Apollo.");
        let analyzer = FakeAnalyzer::new();

        let answer = FallbackResponder::new()
            .respond(&analyzer, &store, "weather tomorrow")
            .await;
        assert_eq!(answer, FALLBACK_APOLOGY);
    }

    #[tokio::test]
    async fn test_store_outage_apologises() {
        let store = MemoryStore::new().with_corpus("There is a project called Apollo.");
        store.fail_reads(true);
        let analyzer = FakeAnalyzer::new();

        let answer = FallbackResponder::new()
            .respond(&analyzer, &store, "project Apollo")
            .await;
        assert_eq!(answer, FALLBACK_APOLOGY);
    }
}
