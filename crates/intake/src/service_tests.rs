//! Tests for the request decision flow

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        analyzer::AnalyzerError,
        document::Document,
        fallback::FALLBACK_APOLOGY,
        orchestrator::Orchestrator,
        record::Intent,
        registry::ReferenceRegistry,
        service::{
            Decision, INSERT_SUCCESS_MESSAGE, IntakeResponse, IntakeService, first_line,
        },
        store::StoreError,
        testing::{FakeAnalyzer, MemoryStore, fixtures},
    };

    const CORPUS: &str = "There is a project called Apollo.\n\
                          Project Apollo has the task Launch.\n\
                          Task Design is assigned to alice.";

    async fn service(store: Arc<MemoryStore>, analyzer: FakeAnalyzer) -> IntakeService {
        let registry = ReferenceRegistry::load(store.as_ref()).await.unwrap();
        IntakeService::new(
            Arc::new(analyzer),
            store,
            Arc::new(registry),
            Orchestrator::default(),
        )
    }

    #[tokio::test]
    async fn test_known_user_is_persisted() {
        let store = Arc::new(MemoryStore::new().with_user("alice", 7));
        let service = service(store.clone(), FakeAnalyzer::with_fixtures()).await;

        let response = service
            .handle_message(fixtures::CREATE_AND_ASSIGN)
            .await
            .unwrap();

        assert_eq!(response, IntakeResponse {
            id: 1,
            message: INSERT_SUCCESS_MESSAGE.to_string(),
        });
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].intent(), Intent::Create);
        assert_eq!(records[0].tasks(), ["Design"]);
        assert_eq!(records[0].users(), [7]);
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let store = Arc::new(MemoryStore::new().with_user("alice", 7));
        let service = service(store.clone(), FakeAnalyzer::with_fixtures()).await;

        let response = service
            .handle_message(fixtures::SHOW_USER_TASKS)
            .await
            .unwrap();

        assert_eq!(
            response,
            IntakeResponse::not_written("These users do not exist: Bob")
        );
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_existing_project_is_rejected() {
        let store = Arc::new(MemoryStore::new().with_project("apollo"));
        let service = service(store.clone(), FakeAnalyzer::with_fixtures()).await;

        let response = service
            .handle_message(fixtures::CREATE_PROJECTS)
            .await
            .unwrap();

        assert_eq!(
            response,
            IntakeResponse::not_written("These projects already exist: Apollo")
        );
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_unclaimed_proper_nouns_are_unknown_users() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store, FakeAnalyzer::with_fixtures()).await;

        // "Report" names the task; "Friday" is left over as a person
        let response = service
            .handle_message(fixtures::DEADLINE_ENTITY)
            .await
            .unwrap();
        assert_eq!(
            response,
            IntakeResponse::not_written("These users do not exist: Friday")
        );
    }

    #[tokio::test]
    async fn test_no_intent_falls_back_to_corpus() {
        let store = Arc::new(MemoryStore::new().with_corpus(CORPUS));
        let service = service(store.clone(), FakeAnalyzer::with_fixtures()).await;

        let response = service.handle_message(fixtures::QUESTION).await.unwrap();

        assert_eq!(
            response,
            IntakeResponse::not_written("Task Design is assigned to alice.")
        );
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_no_intent_with_empty_corpus_apologises() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store, FakeAnalyzer::with_fixtures()).await;

        let response = service.handle_message(fixtures::NESTED_VERB).await.unwrap();
        assert_eq!(response, IntakeResponse::not_written(FALLBACK_APOLOGY));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_error_text() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone(), FakeAnalyzer::with_fixtures()).await;
        store.fail_writes(true);

        let response = service
            .handle_message(fixtures::CREATE_TWO_TASKS)
            .await
            .unwrap();

        assert_eq!(response.id, -1);
        assert_eq!(response.message, sqlx::Error::PoolTimedOut.to_string());
    }

    #[test]
    fn test_store_error_text_is_cut_to_first_line() {
        let err = StoreError::Database(sqlx::Error::Protocol(
            "bad row\nDETAIL: column 3\nHINT: check the schema".to_string(),
        ));
        assert_eq!(
            first_line(&err.to_string()),
            "encountered unexpected or invalid data: bad row"
        );
        assert_eq!(first_line(""), "");
    }

    #[tokio::test]
    async fn test_analyzer_outage_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store, FakeAnalyzer::new().unavailable()).await;

        let result = service.handle_message("create task Foo").await;
        assert!(matches!(result, Err(AnalyzerError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_registry_refresh_is_picked_up() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone(), FakeAnalyzer::with_fixtures()).await;

        let before = service
            .handle_message(fixtures::CREATE_AND_ASSIGN)
            .await
            .unwrap();
        assert_eq!(before, IntakeResponse::not_written("These users do not exist: Alice"));

        store.add_user("Alice", 7);
        let snapshot = service.refresh_registry().await.unwrap();
        assert_eq!(snapshot.user_id("alice"), Some(7));

        let after = service
            .handle_message(fixtures::CREATE_AND_ASSIGN)
            .await
            .unwrap();
        assert_eq!(after.message, INSERT_SUCCESS_MESSAGE);
        assert!(after.id > 0);
    }

    #[tokio::test]
    async fn test_chat_message_logging_is_best_effort() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone(), FakeAnalyzer::new()).await;
        let payload = serde_json::json!({"message": "hello"});

        assert!(service.record_chat_message(&payload).await.is_some());
        assert_eq!(store.chat_messages(), vec![payload.clone()]);

        store.fail_writes(true);
        assert!(service.record_chat_message(&payload).await.is_none());
    }

    #[test]
    fn test_decision_order() {
        let orchestrator = Orchestrator::default();
        let registry = crate::registry::RegistrySnapshot::new(
            vec![("alice".to_string(), 7)],
            vec!["apollo".to_string()],
        );

        let decide =
            |doc: Document| Decision::for_record(&orchestrator.extract_document(&doc, &registry));

        assert_eq!(decide(fixtures::create_and_assign()), Decision::Persist);
        assert_eq!(decide(fixtures::question()), Decision::Fallback);
        assert_eq!(
            decide(fixtures::create_projects()),
            Decision::Rejected("These projects already exist: Apollo".to_string())
        );
        assert_eq!(
            decide(fixtures::show_user_tasks()),
            Decision::Rejected("These users do not exist: Bob".to_string())
        );
    }
}
