use std::fmt;

use serde::{Deserialize, Serialize};

/// What the user asked for. `Undetermined` serializes as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Create,
    Update,
    Delete,
    Assign,
    Show,
    Describe,
    #[default]
    #[serde(rename = "")]
    Undetermined,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Create => "create",
            Intent::Update => "update",
            Intent::Delete => "delete",
            Intent::Assign => "assign",
            Intent::Show => "show",
            Intent::Describe => "describe",
            Intent::Undetermined => "",
        }
    }

    pub fn is_determined(self) -> bool {
        self != Intent::Undetermined
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything extracted from one chat message.
///
/// Only the orchestrator builds records; callers get read access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub(crate) intent: Intent,
    pub(crate) tasks: Vec<String>,
    pub(crate) users: Vec<i64>,
    pub(crate) non_existing_users: Vec<String>,
    pub(crate) comments: Vec<String>,
    pub(crate) descriptions: Vec<String>,
    pub(crate) projects_mentioned: Vec<String>,
    pub(crate) existing_projects: Vec<String>,
    pub(crate) deadline: Vec<String>,
}

impl StructuredRecord {
    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Ids of mentioned users found in the registry
    pub fn users(&self) -> &[i64] {
        &self.users
    }

    pub fn non_existing_users(&self) -> &[String] {
        &self.non_existing_users
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn projects_mentioned(&self) -> &[String] {
        &self.projects_mentioned
    }

    pub fn existing_projects(&self) -> &[String] {
        &self.existing_projects
    }

    pub fn deadline(&self) -> &[String] {
        &self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serialization() {
        assert_eq!(serde_json::to_string(&Intent::Create).unwrap(), "\"create\"");
        assert_eq!(serde_json::to_string(&Intent::Undetermined).unwrap(), "\"\"");
        assert_eq!(
            serde_json::from_str::<Intent>("\"describe\"").unwrap(),
            Intent::Describe
        );
        assert_eq!(
            serde_json::from_str::<Intent>("\"\"").unwrap(),
            Intent::Undetermined
        );
    }

    #[test]
    fn test_record_payload_shape() {
        let record = StructuredRecord {
            intent: Intent::Assign,
            tasks: vec!["Design".to_string()],
            users: vec![7],
            deadline: vec!["15/03/2024".to_string()],
            ..StructuredRecord::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["intent"], "assign");
        assert_eq!(value["tasks"], serde_json::json!(["Design"]));
        assert_eq!(value["users"], serde_json::json!([7]));
        assert_eq!(value["non_existing_users"], serde_json::json!([]));
        assert_eq!(value["existing_projects"], serde_json::json!([]));
        assert_eq!(value["deadline"], serde_json::json!(["15/03/2024"]));
    }
}
