use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const COLUMNS: &str = "id, title, description, location, type, start_time, end_time, \
                       customer_id, user_id, contact_id, created_at, created_by, updated_at, updated_by";

/// A booked appointment. `start_time`/`end_time` and the audit timestamps are
/// stored in the server zone; conversion to local wall-clock happens at the
/// display layer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub customer_id: i64,
    pub user_id: i64,
    pub contact_id: i64,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

/// Field values for a new or rescheduled appointment, with times already
/// converted into the server zone.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub title: String,
    pub description: String,
    pub location: String,
    pub kind: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub customer_id: i64,
    pub user_id: i64,
    pub contact_id: i64,
}

/// One row of the appointments-per-month report.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentTally {
    pub year: i64,
    pub month: i64,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub total: i64,
}

impl Appointment {
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments ORDER BY start_time"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        fields: &NewAppointment,
        actor: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO appointments
                (title, description, location, type, start_time, end_time,
                 customer_id, user_id, contact_id, created_at, created_by, updated_at, updated_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(&fields.kind)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(fields.customer_id)
        .bind(fields.user_id)
        .bind(fields.contact_id)
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
        fields: &NewAppointment,
        actor: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE appointments
            SET title = ?, description = ?, location = ?, type = ?, start_time = ?, end_time = ?,
                customer_id = ?, user_id = ?, contact_id = ?, updated_at = ?, updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(&fields.kind)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(fields.customer_id)
        .bind(fields.user_id)
        .bind(fields.contact_id)
        .bind(now)
        .bind(actor)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Deletes the appointment; returns whether a row was removed.
    pub async fn delete(pool: &sqlx::SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Appointments whose start falls inside the inclusive server-zone range.
    pub async fn find_in_range(
        pool: &sqlx::SqlitePool,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments WHERE start_time >= ? AND start_time <= ? ORDER BY start_time"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Appointments overlapping the candidate interval by more than a touch.
    /// `exclude` drops the appointment currently being edited from the result.
    pub async fn find_overlapping(
        pool: &sqlx::SqlitePool,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<i64>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match exclude {
            Some(id) => {
                sqlx::query_as::<_, Appointment>(&format!(
                    "SELECT {COLUMNS} FROM appointments WHERE start_time < ? AND end_time > ? AND id != ?"
                ))
                .bind(end)
                .bind(start)
                .bind(id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Appointment>(&format!(
                    "SELECT {COLUMNS} FROM appointments WHERE start_time < ? AND end_time > ?"
                ))
                .bind(end)
                .bind(start)
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn find_by_contact(
        pool: &sqlx::SqlitePool,
        contact_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments WHERE contact_id = ? ORDER BY start_time"
        ))
        .bind(contact_id)
        .fetch_all(pool)
        .await
    }

    /// Appointments for a user that were changed after creation.
    pub async fn find_modified_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {COLUMNS} FROM appointments WHERE user_id = ? AND created_at != updated_at ORDER BY updated_at"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Earliest start and latest end across every appointment, or `None` when
    /// the table is empty.
    pub async fn schedule_bounds(
        pool: &sqlx::SqlitePool,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime)>, sqlx::Error> {
        let row = sqlx::query_as::<_, (Option<NaiveDateTime>, Option<NaiveDateTime>)>(
            "SELECT MIN(start_time), MAX(end_time) FROM appointments",
        )
        .fetch_one(pool)
        .await?;
        match row {
            (Some(min), Some(max)) => Ok(Some((min, max))),
            _ => Ok(None),
        }
    }

    /// Appointment totals grouped by year, month, and type, busiest first.
    pub async fn count_by_month_and_type(
        pool: &sqlx::SqlitePool,
    ) -> Result<Vec<AppointmentTally>, sqlx::Error> {
        sqlx::query_as::<_, AppointmentTally>(
            r#"
            SELECT CAST(strftime('%Y', start_time) AS INTEGER) AS year,
                   CAST(strftime('%m', start_time) AS INTEGER) AS month,
                   type,
                   COUNT(customer_id) AS total
            FROM appointments
            GROUP BY year, month, type
            ORDER BY total DESC, year, month
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
