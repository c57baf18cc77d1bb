use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const COLUMNS: &str = "id, username, password, created_at, created_by, updated_at, updated_by";

/// An application user able to sign in and own appointments.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

impl User {
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact username and password match. Callers lowercase the username
    /// before lookup; stored usernames are lowercase.
    pub async fn find_by_credentials(
        pool: &sqlx::SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE username = ? AND password = ?"
        ))
        .bind(username)
        .bind(password)
        .fetch_optional(pool)
        .await
    }
}
