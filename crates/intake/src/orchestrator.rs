use crate::{
    analyzer::{AnalyzerError, LinguisticAnalyzer},
    document::Document,
    extract::{
        self, COMMENT_LEMMA, DESCRIPTION_LEMMA, DeadlinePolicy, SynonymTable, UserMentions,
    },
    record::StructuredRecord,
    registry::RegistrySnapshot,
};

/// Runs every extraction pass over one message and assembles the record
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    synonyms: SynonymTable,
    deadline_policy: DeadlinePolicy,
}

impl Orchestrator {
    pub fn new(synonyms: SynonymTable, deadline_policy: DeadlinePolicy) -> Self {
        Self {
            synonyms,
            deadline_policy,
        }
    }

    pub fn deadline_policy(&self) -> DeadlinePolicy {
        self.deadline_policy
    }

    /// Parse `text` and extract from it
    pub async fn extract_all(
        &self,
        analyzer: &dyn LinguisticAnalyzer,
        text: &str,
        registry: &RegistrySnapshot,
    ) -> Result<StructuredRecord, AnalyzerError> {
        let doc = analyzer.parse(text).await?;
        Ok(self.extract_document(&doc, registry))
    }

    /// Pure: the same document and snapshot always give the same record
    pub fn extract_document(&self, doc: &Document, registry: &RegistrySnapshot) -> StructuredRecord {
        let intent = extract::classify(doc, &self.synonyms);

        let task_ids = extract::task_tokens(doc);
        let project_ids = extract::project_tokens(doc);
        let claimed: Vec<_> = task_ids.iter().chain(&project_ids).copied().collect();
        let UserMentions {
            resolved,
            unresolved,
        } = extract::extract_users_excluding(doc, registry, &claimed);

        let tasks = extract::surface_texts(doc, &task_ids);
        let projects_mentioned = extract::surface_texts(doc, &project_ids);
        let existing_projects = projects_mentioned
            .iter()
            .filter(|name| registry.has_project(name))
            .cloned()
            .collect();

        let record = StructuredRecord {
            intent,
            tasks,
            users: resolved,
            non_existing_users: unresolved,
            comments: extract::extract_quoted(doc, COMMENT_LEMMA),
            descriptions: extract::extract_quoted(doc, DESCRIPTION_LEMMA),
            projects_mentioned,
            existing_projects,
            deadline: extract::extract_deadline(doc, self.deadline_policy),
        };

        tracing::debug!(
            intent = %record.intent,
            tasks = record.tasks.len(),
            users = record.users.len(),
            unknown_users = record.non_existing_users.len(),
            projects = record.projects_mentioned.len(),
            "Extracted record"
        );
        record
    }
}
