use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// A comment together with the name of the task it belongs to
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentOverview {
    pub task_name: String,
    pub content: String,
}

pub struct TaskComment;

impl TaskComment {
    pub async fn find_overviews(pool: &PgPool) -> Result<Vec<CommentOverview>, sqlx::Error> {
        sqlx::query_as::<_, CommentOverview>(
            r#"SELECT t.name AS task_name, c.content
               FROM task_comments c
               JOIN tasks t ON t.id = c.task_id
               ORDER BY c.created_at ASC, c.id ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}

impl CommentOverview {
    pub fn to_sentence(&self) -> Option<String> {
        let content = self.content.trim().trim_end_matches('.');
        if content.is_empty() {
            return None;
        }
        Some(format!("A comment on task {} says: {}.", self.task_name, content))
    }
}
