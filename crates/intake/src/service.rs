//! Request handling: validate the extracted record, then persist it, reject
//! it, or fall back to question answering.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    analyzer::{AnalyzerError, LinguisticAnalyzer},
    fallback::FallbackResponder,
    orchestrator::Orchestrator,
    record::StructuredRecord,
    registry::{ReferenceRegistry, RegistrySnapshot},
    store::{PersistenceStore, StoreError},
};

pub const INSERT_SUCCESS_MESSAGE: &str = "Data inserted successfully!";

/// Id returned when nothing was written
pub const NO_ROW_ID: i64 = 0;
/// Id returned when the store failed to write the record
pub const STORE_FAILURE_ID: i64 = -1;

/// Envelope returned for every chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub id: i64,
    pub message: String,
}

impl IntakeResponse {
    pub fn not_written(message: impl Into<String>) -> Self {
        Self {
            id: NO_ROW_ID,
            message: message.into(),
        }
    }
}

/// Where a validated record goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Rejected(String),
    Persist,
    Fallback,
}

impl Decision {
    /// Unknown users are checked before duplicate projects, and both before
    /// the intent.
    pub fn for_record(record: &StructuredRecord) -> Self {
        if !record.non_existing_users().is_empty() {
            return Decision::Rejected(format!(
                "These users do not exist: {}",
                record.non_existing_users().join(", ")
            ));
        }
        if !record.existing_projects().is_empty() {
            return Decision::Rejected(format!(
                "These projects already exist: {}",
                record.existing_projects().join(", ")
            ));
        }
        if !record.intent().is_determined() {
            return Decision::Fallback;
        }
        Decision::Persist
    }
}

pub struct IntakeService {
    analyzer: Arc<dyn LinguisticAnalyzer>,
    store: Arc<dyn PersistenceStore>,
    registry: Arc<ReferenceRegistry>,
    orchestrator: Orchestrator,
    fallback: FallbackResponder,
}

impl IntakeService {
    pub fn new(
        analyzer: Arc<dyn LinguisticAnalyzer>,
        store: Arc<dyn PersistenceStore>,
        registry: Arc<ReferenceRegistry>,
        orchestrator: Orchestrator,
    ) -> Self {
        Self {
            analyzer,
            store,
            registry,
            orchestrator,
            fallback: FallbackResponder::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ReferenceRegistry> {
        &self.registry
    }

    pub async fn refresh_registry(&self) -> Result<Arc<RegistrySnapshot>, StoreError> {
        self.registry.refresh(self.store.as_ref()).await
    }

    /// Keep the raw request for auditing. Failures are logged, never raised.
    pub async fn record_chat_message(&self, payload: &serde_json::Value) -> Option<i64> {
        match self.store.insert_chat_message(payload).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Failed to store chat message: {}", e);
                None
            }
        }
    }

    /// Only a parser outage is an error; rejections, fallbacks and store
    /// failures are all expressed in the envelope.
    pub async fn handle_message(&self, message: &str) -> Result<IntakeResponse, AnalyzerError> {
        let snapshot = self.registry.snapshot().await;
        let record = self
            .orchestrator
            .extract_all(self.analyzer.as_ref(), message, &snapshot)
            .await?;

        let response = match Decision::for_record(&record) {
            Decision::Rejected(reason) => {
                tracing::info!("Rejected message: {}", reason);
                IntakeResponse::not_written(reason)
            }
            Decision::Fallback => {
                let answer = self
                    .fallback
                    .respond(self.analyzer.as_ref(), self.store.as_ref(), message)
                    .await;
                IntakeResponse::not_written(answer)
            }
            Decision::Persist => self.persist(&record).await,
        };

        Ok(response)
    }

    async fn persist(&self, record: &StructuredRecord) -> IntakeResponse {
        match self.store.insert_structured_record(record).await {
            Ok(id) => {
                tracing::info!("Stored {} request as record {}", record.intent(), id);
                IntakeResponse {
                    id,
                    message: INSERT_SUCCESS_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                tracing::error!("Failed to store intake record: {}", e);
                IntakeResponse {
                    id: STORE_FAILURE_ID,
                    message: first_line(&e.to_string()).to_string(),
                }
            }
        }
    }
}

/// Store errors can carry multi-line driver detail; the envelope keeps the
/// headline only.
pub(crate) fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
