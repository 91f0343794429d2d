use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, types::Json};

/// A structured record produced from one chat message, stored as an opaque
/// JSON document for downstream processing.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub id: i64,
    pub data: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl IntakeRecord {
    /// Insert inside its own transaction and return the new row id. The
    /// transaction rolls back when dropped on any error path.
    pub async fn create(pool: &PgPool, data: &serde_json::Value) -> Result<i64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO intake_records (data) VALUES ($1) RETURNING id"#,
        )
        .bind(Json(data))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }
}
