use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"SELECT id, name, description, created_at FROM projects ORDER BY id ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    /// Lower-cased project names
    pub async fn name_set(pool: &PgPool) -> Result<HashSet<String>, sqlx::Error> {
        let names = sqlx::query_scalar::<_, String>(r#"SELECT name FROM projects"#)
            .fetch_all(pool)
            .await?;

        Ok(names.into_iter().map(|name| name.to_lowercase()).collect())
    }

    pub fn to_sentences(&self) -> Vec<String> {
        let mut sentences = vec![format!("There is a project called {}.", self.name)];
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            sentences.push(format!(
                "Project {} is described as {}.",
                self.name,
                description.trim().trim_end_matches('.')
            ));
        }
        sentences
    }
}
