use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A company contact assigned to appointments. Contacts carry no audit
/// columns; the reference data ships with the seed migration.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Contact {
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Contact>("SELECT id, name, email FROM contacts ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Contact>("SELECT id, name, email FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
