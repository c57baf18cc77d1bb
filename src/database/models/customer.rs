use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const COLUMNS: &str =
    "id, name, address, postal_code, phone, division_id, created_at, created_by, updated_at, updated_by";

/// A customer record tied to a first-level division.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub division_id: i64,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

/// Field values for a new or updated customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub division_id: i64,
}

impl Customer {
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!("SELECT {COLUMNS} FROM customers ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!("SELECT {COLUMNS} FROM customers WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        fields: &NewCustomer,
        actor: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO customers
                (name, address, postal_code, phone, division_id, created_at, created_by, updated_at, updated_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.postal_code)
        .bind(&fields.phone)
        .bind(fields.division_id)
        .bind(now)
        .bind(actor)
        .bind(now)
        .bind(actor)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        pool: &sqlx::SqlitePool,
        id: i64,
        fields: &NewCustomer,
        actor: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, address = ?, postal_code = ?, phone = ?, division_id = ?,
                updated_at = ?, updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.postal_code)
        .bind(&fields.phone)
        .bind(fields.division_id)
        .bind(now)
        .bind(actor)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Deletes the customer unless appointments still reference them.
    /// Returns `false`, leaving the row in place, when appointments exist.
    pub async fn delete(pool: &sqlx::SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let appointments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM appointments WHERE customer_id = ?",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        if appointments > 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(true)
    }
}
