//! Flattens projects, tasks and comments into plain sentences.
//!
//! The rendered text is only consumed by the fallback responder, which
//! splits it back into sentences and ranks them against a user question.

use sqlx::PgPool;

use super::{
    comment::{CommentOverview, TaskComment},
    project::Project,
    task::{Task, TaskOverview},
};

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub projects: Vec<Project>,
    pub tasks: Vec<TaskOverview>,
    pub comments: Vec<CommentOverview>,
}

impl Corpus {
    pub async fn load(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let projects = Project::find_all(pool).await?;
        let tasks = Task::find_overviews(pool).await?;
        let comments = TaskComment::find_overviews(pool).await?;

        tracing::debug!(
            "Loaded corpus: {} projects, {} tasks, {} comments",
            projects.len(),
            tasks.len(),
            comments.len()
        );

        Ok(Self {
            projects,
            tasks,
            comments,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tasks.is_empty() && self.comments.is_empty()
    }

    pub fn sentences(&self) -> Vec<String> {
        self.projects
            .iter()
            .flat_map(Project::to_sentences)
            .chain(self.tasks.iter().flat_map(TaskOverview::to_sentences))
            .chain(self.comments.iter().filter_map(CommentOverview::to_sentence))
            .collect()
    }

    /// One sentence per line keeps sentence boundaries recoverable even for
    /// names that contain dots.
    pub fn render(&self) -> String {
        self.sentences().join("\n")
    }
}
