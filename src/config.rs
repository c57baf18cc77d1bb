use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveTime, Weekday};
use chrono_tz::Tz;
use std::collections::HashSet;
use std::env;

/// Minutes ahead that the post-login reminder looks for upcoming appointments.
pub const REMINDER_WINDOW_MINUTES: i64 = 15;

/// Maximum length accepted for free-text appointment and customer fields.
pub const TEXT_FIELD_MAX: usize = 50;

/// Environment-backed application settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub local_zone: Tz,
    pub login_log_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/schedule.db".to_string());
        let database_url = if database_url.trim().is_empty() {
            "sqlite:./data/schedule.db".to_string()
        } else {
            database_url
        };

        let zone_str = env::var("LOCAL_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let zone_str = if zone_str.trim().is_empty() {
            "UTC".to_string()
        } else {
            zone_str
        };
        let local_zone: Tz = zone_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid LOCAL_TIMEZONE: {zone_str}"))?;

        let login_log_path = env::var("LOGIN_LOG_PATH")
            .unwrap_or_else(|_| "login_activity.txt".to_string());
        let login_log_path = if login_log_path.trim().is_empty() {
            "login_activity.txt".to_string()
        } else {
            login_log_path
        };

        Ok(Config {
            database_url,
            local_zone,
            login_log_path,
        })
    }
}

/// The company's booking window: which days appointments may be placed on and
/// the wall-clock opening hours, all expressed in the company zone.
///
/// Read-only after startup.
#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    pub zone: Tz,
    pub open_days: HashSet<Weekday>,
    pub opening: NaiveTime,
    pub closing: NaiveTime,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            zone: chrono_tz::America::New_York,
            open_days: [
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
            ]
            .into_iter()
            .collect(),
            opening: NaiveTime::MIN + Duration::hours(8),
            closing: NaiveTime::MIN + Duration::hours(22),
        }
    }
}

impl BusinessCalendar {
    /// Calendar with the company defaults but custom opening hours.
    pub fn with_hours(opening: NaiveTime, closing: NaiveTime) -> Self {
        Self {
            opening,
            closing,
            ..Self::default()
        }
    }
}
