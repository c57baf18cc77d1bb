use chrono::{Datelike, NaiveDateTime};
use chrono_tz::Tz;
use thiserror::Error;

use crate::config::BusinessCalendar;
use crate::utils::datetime::{self, HOURS_FORMAT};

/// A single user-displayable reason an appointment entry was rejected.
///
/// Callers collect every violation for one entry and present the whole list,
/// so each variant renders as a standalone sentence.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must not be blank or longer than {max} characters")]
    InvalidText { field: &'static str, max: usize },

    #[error("{field} must be a non-negative whole number")]
    InvalidId { field: &'static str },

    #[error("the start date/time must be before the end date/time")]
    StartNotBeforeEnd,

    #[error("the appointment must fall on a single business day between {opens} and {closes} ({zone})")]
    OutsideBusinessHours {
        opens: String,
        closes: String,
        zone: &'static str,
    },

    #[error("an appointment already exists during this time")]
    Conflict,

    #[error("no customer with ID {0} exists")]
    UnknownCustomer(i64),

    #[error("no user with ID {0} exists")]
    UnknownUser(i64),

    #[error("no division with ID {0} exists")]
    UnknownDivision(i64),

    #[error("no contact with ID {0} exists")]
    UnknownContact(i64),
}

/// Check a free-text field for blankness and length.
pub fn validate_text(field: &'static str, value: &str, max: usize) -> Option<ValidationError> {
    if value.trim().is_empty() || value.len() > max {
        return Some(ValidationError::InvalidText { field, max });
    }
    None
}

/// Check that an entity reference is a plausible identifier.
pub fn validate_entity_id(field: &'static str, id: i64) -> Option<ValidationError> {
    if id < 0 {
        return Some(ValidationError::InvalidId { field });
    }
    None
}

/// Validate a candidate interval against the business calendar.
///
/// Inputs are local wall-clock values; the business-day check happens after
/// converting both endpoints into the company zone. Checks that depend on a
/// well-formed interval are skipped once an earlier one fails, so the returned
/// list never contains contradictory reasons.
pub fn validate_interval(
    calendar: &BusinessCalendar,
    local_zone: Tz,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if start.is_none() {
        errors.push(ValidationError::MissingField("start date/time"));
    }
    if end.is_none() {
        errors.push(ValidationError::MissingField("end date/time"));
    }
    let (Some(start), Some(end)) = (start, end) else {
        return errors;
    };

    if start >= end {
        errors.push(ValidationError::StartNotBeforeEnd);
        return errors;
    }

    let company_start = datetime::convert(start, local_zone, calendar.zone);
    let company_end = datetime::convert(end, local_zone, calendar.zone);
    let single_open_day = company_start.date() == company_end.date()
        && calendar.open_days.contains(&company_start.weekday());
    let inside_hours = company_start.time() >= calendar.opening
        && company_end.time() <= calendar.closing;
    if !single_open_day || !inside_hours {
        errors.push(ValidationError::OutsideBusinessHours {
            opens: calendar.opening.format(HOURS_FORMAT).to_string(),
            closes: calendar.closing.format(HOURS_FORMAT).to_string(),
            zone: calendar.zone.name(),
        });
    }
    errors
}

/// True when a stored interval overlaps the candidate by more than a touch.
///
/// Exact boundary touches are allowed, so back-to-back appointments never
/// conflict.
pub fn intervals_conflict(
    stored_start: NaiveDateTime,
    stored_end: NaiveDateTime,
    candidate_start: NaiveDateTime,
    candidate_end: NaiveDateTime,
) -> bool {
    stored_start < candidate_end && stored_end > candidate_start
}
