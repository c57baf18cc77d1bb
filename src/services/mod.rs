/// Sign-in and explicit session context
pub mod auth;
/// Append-only login-attempt log
pub mod credential_log;
/// Text reports over the appointment book
pub mod reports;
/// Appointment booking, filtering, and reminders
pub mod scheduling;
