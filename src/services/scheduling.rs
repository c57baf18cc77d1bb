use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::config::{BusinessCalendar, REMINDER_WINDOW_MINUTES, TEXT_FIELD_MAX};
use crate::database::models::{Appointment, Contact, Customer, NewAppointment, User};
use crate::services::auth::Session;
use crate::utils::datetime;
use crate::utils::logging;
use crate::utils::validation::{self, ValidationError};

/// Raw appointment entry as captured from the user, times in local
/// wall-clock. Validation and zone conversion happen on the way in.
#[derive(Debug, Clone, Default)]
pub struct AppointmentDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub kind: String,
    pub start_local: Option<NaiveDateTime>,
    pub end_local: Option<NaiveDateTime>,
    pub customer_id: i64,
    pub user_id: i64,
    pub contact_id: i64,
}

/// Result of trying to place or move an appointment.
#[derive(Debug)]
pub enum ScheduleOutcome {
    Scheduled(Appointment),
    /// Every violation found in the entry, for display as one list.
    Rejected(Vec<ValidationError>),
}

/// Appointment booking, filtering, and the post-login reminder.
pub struct SchedulingService {
    pool: SqlitePool,
    calendar: BusinessCalendar,
    local_zone: Tz,
}

impl SchedulingService {
    pub fn new(pool: SqlitePool, calendar: BusinessCalendar, local_zone: Tz) -> Self {
        Self {
            pool,
            calendar,
            local_zone,
        }
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Run the complete validation pass for a draft and collect every
    /// violation. `editing` carries the id of the appointment being
    /// rescheduled so it never conflicts with itself.
    pub async fn validate(
        &self,
        draft: &AppointmentDraft,
        editing: Option<i64>,
    ) -> Result<Vec<ValidationError>, sqlx::Error> {
        let mut errors = Vec::new();
        errors.extend(validation::validate_text("title", &draft.title, TEXT_FIELD_MAX));
        errors.extend(validation::validate_text(
            "description",
            &draft.description,
            TEXT_FIELD_MAX,
        ));
        errors.extend(validation::validate_text(
            "location",
            &draft.location,
            TEXT_FIELD_MAX,
        ));
        errors.extend(validation::validate_text("type", &draft.kind, TEXT_FIELD_MAX));
        errors.extend(validation::validate_entity_id("customer ID", draft.customer_id));
        errors.extend(validation::validate_entity_id("user ID", draft.user_id));
        errors.extend(validation::validate_entity_id("contact ID", draft.contact_id));

        let interval_errors = validation::validate_interval(
            &self.calendar,
            self.local_zone,
            draft.start_local,
            draft.end_local,
        );
        let interval_ok = interval_errors.is_empty();
        errors.extend(interval_errors);

        if draft.customer_id >= 0
            && Customer::find_by_id(&self.pool, draft.customer_id).await?.is_none()
        {
            errors.push(ValidationError::UnknownCustomer(draft.customer_id));
        }
        if draft.user_id >= 0 && User::find_by_id(&self.pool, draft.user_id).await?.is_none() {
            errors.push(ValidationError::UnknownUser(draft.user_id));
        }
        if draft.contact_id >= 0
            && Contact::find_by_id(&self.pool, draft.contact_id).await?.is_none()
        {
            errors.push(ValidationError::UnknownContact(draft.contact_id));
        }

        // Conflict detection only makes sense for a well-formed interval.
        if interval_ok {
            if let (Some(start), Some(end)) = (draft.start_local, draft.end_local) {
                let server_start = datetime::to_server_time(start, self.local_zone);
                let server_end = datetime::to_server_time(end, self.local_zone);
                let conflicts =
                    Appointment::find_overlapping(&self.pool, server_start, server_end, editing)
                        .await?;
                if !conflicts.is_empty() {
                    errors.push(ValidationError::Conflict);
                }
            }
        }

        Ok(errors)
    }

    /// Validate and book a new appointment under the signed-in session.
    /// Nothing is written when the draft is rejected.
    pub async fn schedule(
        &self,
        session: &Session,
        draft: &AppointmentDraft,
    ) -> Result<ScheduleOutcome> {
        let errors = self.validate(draft, None).await?;
        if !errors.is_empty() {
            logging::log_validation_failure("schedule", errors.len());
            return Ok(ScheduleOutcome::Rejected(errors));
        }

        let Some(fields) = self.to_fields(draft) else {
            return Ok(ScheduleOutcome::Rejected(vec![
                ValidationError::MissingField("start date/time"),
            ]));
        };
        let appointment = Appointment::create(&self.pool, &fields, session.actor()).await?;
        logging::log_database_operation(
            "INSERT",
            "appointments",
            Some(&format!("id {}", appointment.id)),
        );
        Ok(ScheduleOutcome::Scheduled(self.localize(appointment)))
    }

    /// Validate and move an existing appointment, excluding it from its own
    /// conflict check.
    pub async fn reschedule(
        &self,
        session: &Session,
        id: i64,
        draft: &AppointmentDraft,
    ) -> Result<ScheduleOutcome> {
        let errors = self.validate(draft, Some(id)).await?;
        if !errors.is_empty() {
            logging::log_validation_failure("reschedule", errors.len());
            return Ok(ScheduleOutcome::Rejected(errors));
        }

        let Some(fields) = self.to_fields(draft) else {
            return Ok(ScheduleOutcome::Rejected(vec![
                ValidationError::MissingField("start date/time"),
            ]));
        };
        let appointment = Appointment::update(&self.pool, id, &fields, session.actor()).await?;
        logging::log_database_operation("UPDATE", "appointments", Some(&format!("id {id}")));
        Ok(ScheduleOutcome::Scheduled(self.localize(appointment)))
    }

    /// Delete an appointment; returns whether one existed.
    pub async fn cancel(&self, id: i64) -> Result<bool> {
        let removed = Appointment::delete(&self.pool, id).await?;
        if removed {
            logging::log_database_operation("DELETE", "appointments", Some(&format!("id {id}")));
        }
        Ok(removed)
    }

    /// Every appointment, times converted to the local zone.
    pub async fn appointments(&self) -> Result<Vec<Appointment>> {
        let rows = Appointment::find_all(&self.pool).await?;
        Ok(self.localize_all(rows))
    }

    /// Appointments starting inside one local calendar month.
    pub async fn appointments_in_month(&self, year: i32, month: u32) -> Result<Vec<Appointment>> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Ok(Vec::new());
        };
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let Some(next_month) = next_month else {
            return Ok(Vec::new());
        };
        let start = first.and_time(NaiveTime::MIN);
        let end = next_month.and_time(NaiveTime::MIN) - Duration::seconds(1);
        self.appointments_between(start, end).await
    }

    /// Appointments starting in the week running from `week_start` through
    /// the following Saturday (inclusive), local dates.
    pub async fn appointments_in_week(&self, week_start: NaiveDate) -> Result<Vec<Appointment>> {
        let days_to_saturday = (Weekday::Sat.num_days_from_sunday() + 7
            - week_start.weekday().num_days_from_sunday())
            % 7;
        let week_end = week_start + Duration::days(i64::from(days_to_saturday));
        let end_of_day = NaiveTime::MIN + Duration::seconds(86_399);
        self.appointments_between(week_start.and_time(NaiveTime::MIN), week_end.and_time(end_of_day))
            .await
    }

    /// Earliest start and latest end across all appointments, localized.
    pub async fn schedule_bounds(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
        let bounds = Appointment::schedule_bounds(&self.pool).await?;
        Ok(bounds.map(|(min, max)| {
            (
                datetime::from_server_time(min, self.local_zone),
                datetime::from_server_time(max, self.local_zone),
            )
        }))
    }

    /// Appointments starting within the next `minutes`, for the post-login
    /// reminder.
    pub async fn upcoming_within(&self, minutes: i64) -> Result<Vec<Appointment>> {
        let now = datetime::now_in_server_time(self.local_zone);
        let rows =
            Appointment::find_in_range(&self.pool, now, now + Duration::minutes(minutes)).await?;
        Ok(self.localize_all(rows))
    }

    /// The standard sign-in reminder window.
    pub async fn login_reminder(&self) -> Result<Vec<Appointment>> {
        self.upcoming_within(REMINDER_WINDOW_MINUTES).await
    }

    async fn appointments_between(
        &self,
        start_local: NaiveDateTime,
        end_local: NaiveDateTime,
    ) -> Result<Vec<Appointment>> {
        let rows = Appointment::find_in_range(
            &self.pool,
            datetime::to_server_time(start_local, self.local_zone),
            datetime::to_server_time(end_local, self.local_zone),
        )
        .await?;
        Ok(self.localize_all(rows))
    }

    fn to_fields(&self, draft: &AppointmentDraft) -> Option<NewAppointment> {
        let start = draft.start_local?;
        let end = draft.end_local?;
        Some(NewAppointment {
            title: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            kind: draft.kind.clone(),
            start_time: datetime::to_server_time(start, self.local_zone),
            end_time: datetime::to_server_time(end, self.local_zone),
            customer_id: draft.customer_id,
            user_id: draft.user_id,
            contact_id: draft.contact_id,
        })
    }

    fn localize(&self, mut appointment: Appointment) -> Appointment {
        appointment.start_time = datetime::from_server_time(appointment.start_time, self.local_zone);
        appointment.end_time = datetime::from_server_time(appointment.end_time, self.local_zone);
        appointment.created_at = datetime::from_server_time(appointment.created_at, self.local_zone);
        appointment.updated_at = datetime::from_server_time(appointment.updated_at, self.local_zone);
        appointment
    }

    fn localize_all(&self, rows: Vec<Appointment>) -> Vec<Appointment> {
        rows.into_iter().map(|row| self.localize(row)).collect()
    }
}
