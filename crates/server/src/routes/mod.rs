use axum::{Router, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::{AppState, middleware as app_middleware};

pub mod health;
pub mod registry;
pub mod send_data;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(send_data::router())
        .merge(registry::router())
        .layer(middleware::from_fn(app_middleware::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use http_body_util::BodyExt;
    use intake::{
        IntakeService, Orchestrator, ReferenceRegistry,
        testing::{FakeAnalyzer, MemoryStore, fixtures},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn app_with(store: Arc<MemoryStore>, analyzer: FakeAnalyzer) -> Router {
        let registry = ReferenceRegistry::load(store.as_ref()).await.unwrap();
        let service = IntakeService::new(
            Arc::new(analyzer),
            store,
            Arc::new(registry),
            Orchestrator::default(),
        );
        router(AppState::new(Arc::new(service)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_send_data_persists_record() {
        let store = Arc::new(MemoryStore::new().with_user("alice", 7));
        let app = app_with(store.clone(), FakeAnalyzer::with_fixtures()).await;

        let payload = json!({"message": fixtures::CREATE_AND_ASSIGN});
        let response = app
            .oneshot(post_json("/send_data", payload.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        // The chat log row takes id 1
        assert_eq!(
            body_json(response).await,
            json!({"id": 2, "message": "Data inserted successfully!"})
        );
        assert_eq!(store.chat_messages(), vec![payload]);
        assert_eq!(store.records()[0].users(), [7]);
    }

    #[tokio::test]
    async fn test_send_data_rejection_is_ok_status() {
        let store = Arc::new(MemoryStore::new().with_user("alice", 7));
        let app = app_with(store, FakeAnalyzer::with_fixtures()).await;

        let response = app
            .oneshot(post_json(
                "/send_data",
                json!({"message": fixtures::SHOW_USER_TASKS}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"id": 0, "message": "These users do not exist: Bob"})
        );
    }

    #[tokio::test]
    async fn test_send_data_fallback_apology() {
        let app = app_with(Arc::new(MemoryStore::new()), FakeAnalyzer::with_fixtures()).await;

        let response = app
            .oneshot(post_json("/send_data", json!({"message": fixtures::QUESTION})))
            .await
            .unwrap();

        assert_eq!(
            body_json(response).await,
            json!({"id": 0, "message": intake::FALLBACK_APOLOGY})
        );
    }

    #[tokio::test]
    async fn test_send_data_without_message_is_bad_request() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), FakeAnalyzer::new()).await;

        let response = app
            .oneshot(post_json("/send_data", json!({"text": "hello"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(store.chat_messages().is_empty());
    }

    #[tokio::test]
    async fn test_send_data_malformed_json_uses_error_envelope() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), FakeAnalyzer::new()).await;

        let request = Request::builder()
            .method("POST")
            .uri("/send_data")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"message\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
        assert!(store.chat_messages().is_empty());
    }

    #[tokio::test]
    async fn test_parser_outage_is_service_unavailable() {
        let app = app_with(
            Arc::new(MemoryStore::new()),
            FakeAnalyzer::new().unavailable(),
        )
        .await;

        let response = app
            .oneshot(post_json("/send_data", json!({"message": "create task Foo"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("AnalyzerError")
        );
    }

    #[tokio::test]
    async fn test_health_reports_registry_sizes() {
        let store = Arc::new(MemoryStore::new().with_user("alice", 7).with_project("apollo"));
        let app = app_with(store, FakeAnalyzer::new()).await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(app_middleware::REQUEST_ID_HEADER));
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "data": {"status": "ok", "users": 1, "projects": 1}})
        );
    }

    #[tokio::test]
    async fn test_registry_refresh_endpoint() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), FakeAnalyzer::new()).await;

        store.add_user("bob", 8);
        store.add_project("gemini");
        let response = app
            .clone()
            .oneshot(post_json("/registry/refresh", json!({})))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "data": {"users": 1, "projects": 1}})
        );

        store.fail_reads(true);
        let response = app
            .oneshot(post_json("/registry/refresh", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
