use anyhow::Result;
use chrono_tz::Tz;
use sqlx::SqlitePool;
use std::fmt::Write as _;

use crate::database::models::{Appointment, Contact, User};
use crate::utils::datetime;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Text reports over the appointment book, rendered the way the reports
/// screen shows them.
pub struct ReportService {
    pool: SqlitePool,
    local_zone: Tz,
}

impl ReportService {
    pub fn new(pool: SqlitePool, local_zone: Tz) -> Self {
        Self { pool, local_zone }
    }

    /// Appointment totals by year, month, and type, busiest first.
    pub async fn customer_appointments(&self) -> Result<String> {
        let tallies = Appointment::count_by_month_and_type(&self.pool).await?;
        let mut report = String::new();
        for tally in tallies {
            let month = usize::try_from(tally.month)
                .ok()
                .and_then(|m| m.checked_sub(1))
                .and_then(|m| MONTH_NAMES.get(m))
                .copied()
                .unwrap_or("Unknown");
            writeln!(
                report,
                "{:<4} {:<11} {:<26} {:>4}",
                tally.year, month, tally.kind, tally.total
            )?;
        }
        Ok(report)
    }

    /// Every appointment assigned to one contact, in schedule order.
    pub async fn contact_schedule(&self, contact: &Contact) -> Result<String> {
        let appointments = Appointment::find_by_contact(&self.pool, contact.id).await?;
        let mut report = String::new();
        for appointment in appointments {
            let start = datetime::from_server_time(appointment.start_time, self.local_zone);
            let end = datetime::from_server_time(appointment.end_time, self.local_zone);
            writeln!(
                report,
                "ID {}: {} ({}) {} to {}, customer {}",
                appointment.id,
                appointment.title,
                appointment.kind,
                datetime::format_full(start),
                datetime::format_hours(end),
                appointment.customer_id
            )?;
        }
        Ok(report)
    }

    /// Appointments owned by a user that were changed after they were
    /// created, with the moment of the last change.
    pub async fn modified_appointments(&self, user: &User) -> Result<String> {
        let appointments = Appointment::find_modified_by_user(&self.pool, user.id).await?;
        let mut report = String::new();
        for appointment in appointments {
            let updated = datetime::from_server_time(appointment.updated_at, self.local_zone);
            writeln!(
                report,
                "Appointment with ID: {} was last updated by '{}' on {}",
                appointment.id,
                appointment.updated_by,
                updated.format("%B %-d, %Y at %-I:%M %p")
            )?;
        }
        Ok(report)
    }
}
