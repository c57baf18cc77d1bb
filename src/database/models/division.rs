use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const COLUMNS: &str = "id, name, country_id, created_at, created_by, updated_at, updated_by";

/// A first-level division (state, province, region) within a country.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FirstLevelDivision {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

impl FirstLevelDivision {
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FirstLevelDivision>(&format!(
            "SELECT {COLUMNS} FROM first_level_divisions ORDER BY id"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FirstLevelDivision>(&format!(
            "SELECT {COLUMNS} FROM first_level_divisions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_country(
        pool: &sqlx::SqlitePool,
        country_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FirstLevelDivision>(&format!(
            "SELECT {COLUMNS} FROM first_level_divisions WHERE country_id = ? ORDER BY name"
        ))
        .bind(country_id)
        .fetch_all(pool)
        .await
    }
}
