#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::{
        comment::CommentOverview,
        corpus::Corpus,
        project::Project,
        task::TaskOverview,
    };

    fn project(name: &str, description: Option<&str>) -> Project {
        Project {
            id: 1,
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_corpus_renders_empty_text() {
        let corpus = Corpus::default();
        assert!(corpus.is_empty());
        assert_eq!(corpus.render(), "");
    }

    #[test]
    fn test_project_sentences() {
        let corpus = Corpus {
            projects: vec![project("Apollo", Some("the moon landing app."))],
            ..Corpus::default()
        };

        assert_eq!(
            corpus.sentences(),
            vec![
                "There is a project called Apollo.".to_string(),
                "Project Apollo is described as the moon landing app.".to_string(),
            ]
        );
    }

    #[test]
    fn test_task_sentences_include_known_fields_only() {
        let task = TaskOverview {
            name: "Design".to_string(),
            description: None,
            deadline: Some("15/03/2024".to_string()),
            project_name: Some("Apollo".to_string()),
            assignee: Some("alice".to_string()),
        };

        assert_eq!(
            task.to_sentences(),
            vec![
                "Project Apollo has the task Design.".to_string(),
                "Task Design is assigned to alice.".to_string(),
                "Task Design has the deadline 15/03/2024.".to_string(),
            ]
        );
    }

    #[test]
    fn test_orphan_task_and_blank_comment() {
        let corpus = Corpus {
            projects: vec![],
            tasks: vec![TaskOverview {
                name: "Cleanup".to_string(),
                description: Some("remove old builds".to_string()),
                deadline: Some("  ".to_string()),
                project_name: None,
                assignee: None,
            }],
            comments: vec![
                CommentOverview {
                    task_name: "Cleanup".to_string(),
                    content: "   ".to_string(),
                },
                CommentOverview {
                    task_name: "Cleanup".to_string(),
                    content: "almost done".to_string(),
                },
            ],
        };

        assert_eq!(
            corpus.render(),
            "There is a task called Cleanup.\n\
             Task Cleanup is described as remove old builds.\n\
             A comment on task Cleanup says: almost done."
        );
    }
}
