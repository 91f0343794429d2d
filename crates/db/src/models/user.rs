use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Lower-cased username -> id. Later rows win if two usernames only
    /// differ by case.
    pub async fn username_index(pool: &PgPool) -> Result<HashMap<String, i64>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i64, String)>(r#"SELECT id, username FROM users ORDER BY id ASC"#)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, username)| (username.to_lowercase(), id))
            .collect())
    }
}
