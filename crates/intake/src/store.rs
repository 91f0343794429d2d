use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use db::{
    DBService,
    models::{
        chat_message::ChatMessage, corpus::Corpus, intake_record::IntakeRecord,
        project::Project, user::User,
    },
};
use thiserror::Error;

use crate::record::StructuredRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything the intake pipeline reads from or writes to storage.
///
/// Each call checks out its own connection and releases it before
/// returning, on success and on error.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Lower-cased username -> user id
    async fn fetch_usernames(&self) -> Result<HashMap<String, i64>, StoreError>;

    /// Lower-cased project names
    async fn fetch_projects(&self) -> Result<HashSet<String>, StoreError>;

    async fn insert_structured_record(&self, record: &StructuredRecord)
    -> Result<i64, StoreError>;

    /// Projects, tasks and comments rendered as prose, one sentence per line
    async fn fetch_corpus(&self) -> Result<String, StoreError>;

    async fn insert_chat_message(&self, payload: &serde_json::Value) -> Result<i64, StoreError>;
}

#[async_trait]
impl PersistenceStore for DBService {
    async fn fetch_usernames(&self) -> Result<HashMap<String, i64>, StoreError> {
        Ok(User::username_index(&self.pool).await?)
    }

    async fn fetch_projects(&self) -> Result<HashSet<String>, StoreError> {
        Ok(Project::name_set(&self.pool).await?)
    }

    async fn insert_structured_record(
        &self,
        record: &StructuredRecord,
    ) -> Result<i64, StoreError> {
        let data = serde_json::to_value(record)?;
        let id = IntakeRecord::create(&self.pool, &data).await?;
        tracing::debug!("Stored intake record {} (intent {:?})", id, record.intent());
        Ok(id)
    }

    async fn fetch_corpus(&self) -> Result<String, StoreError> {
        Ok(Corpus::load(&self.pool).await?.render())
    }

    async fn insert_chat_message(&self, payload: &serde_json::Value) -> Result<i64, StoreError> {
        Ok(ChatMessage::create(&self.pool, payload).await?)
    }
}
