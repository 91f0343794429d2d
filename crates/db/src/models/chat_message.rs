use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, types::Json};

/// Raw payload of an incoming chat request, kept verbatim
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub payload: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub async fn create(pool: &PgPool, payload: &serde_json::Value) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO chat_messages (payload) VALUES ($1) RETURNING id"#,
        )
        .bind(Json(payload))
        .fetch_one(pool)
        .await
    }
}
