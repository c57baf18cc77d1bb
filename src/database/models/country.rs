use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const COLUMNS: &str = "id, name, created_at, created_by, updated_at, updated_by";

/// A country in the reference dataset.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

impl Country {
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Country>(&format!("SELECT {COLUMNS} FROM countries ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Country>(&format!("SELECT {COLUMNS} FROM countries WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
