use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// A task joined with the names of its project and assignee
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskOverview {
    pub name: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub project_name: Option<String>,
    pub assignee: Option<String>,
}

pub struct Task;

impl Task {
    pub async fn find_overviews(pool: &PgPool) -> Result<Vec<TaskOverview>, sqlx::Error> {
        sqlx::query_as::<_, TaskOverview>(
            r#"SELECT
                t.name,
                t.description,
                t.deadline,
                p.name AS project_name,
                u.username AS assignee
               FROM tasks t
               LEFT JOIN projects p ON p.id = t.project_id
               LEFT JOIN users u ON u.id = t.assignee_id
               ORDER BY t.id ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}

impl TaskOverview {
    pub fn to_sentences(&self) -> Vec<String> {
        let mut sentences = Vec::new();

        match self.project_name.as_deref() {
            Some(project) => sentences.push(format!("Project {} has the task {}.", project, self.name)),
            None => sentences.push(format!("There is a task called {}.", self.name)),
        }
        if let Some(assignee) = self.assignee.as_deref() {
            sentences.push(format!("Task {} is assigned to {}.", self.name, assignee));
        }
        if let Some(deadline) = self.deadline.as_deref().filter(|d| !d.trim().is_empty()) {
            sentences.push(format!("Task {} has the deadline {}.", self.name, deadline.trim()));
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            sentences.push(format!(
                "Task {} is described as {}.",
                self.name,
                description.trim().trim_end_matches('.')
            ));
        }

        sentences
    }
}
