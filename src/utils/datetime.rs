use chrono::{Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Zone that all persisted timestamps are expressed in.
pub const SERVER_ZONE: Tz = chrono_tz::UTC;

/// Hour-and-minute display format, e.g. `9:00AM`.
pub const HOURS_FORMAT: &str = "%-I:%M%p";

/// Month, day, and year display format, e.g. `March 5, 2024`.
pub const MONTH_DAY_FORMAT: &str = "%B %-d, %Y";

/// Full timestamp display format, e.g. `March 5, 2024 - 9:00 AM`.
pub const FULL_FORMAT: &str = "%B %-d, %Y - %-I:%M %p";

/// Timestamp format used in the credential log.
pub const LOG_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current wall-clock time as observed in `zone`.
pub fn now_in(zone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&zone).naive_local()
}

/// Whole-hour offset between two zones, observed at the current moment and
/// truncated toward zero.
///
/// The offset of the present instant is applied uniformly to whatever value is
/// being converted, so conversions that straddle a daylight-saving transition
/// inherit the present offset rather than the target instant's.
pub fn hours_offset(origin: Tz, target: Tz) -> i64 {
    let now = Utc::now();
    let origin_now = now.with_timezone(&origin).naive_local();
    let target_now = now.with_timezone(&target).naive_local();
    (target_now - origin_now).num_hours()
}

/// Shift a wall-clock value from `origin` into `target` by the whole-hour
/// offset between the zones.
pub fn convert(value: NaiveDateTime, origin: Tz, target: Tz) -> NaiveDateTime {
    value + Duration::hours(hours_offset(origin, target))
}

/// Local wall-clock value to its stored server-zone representation.
pub fn to_server_time(value: NaiveDateTime, local_zone: Tz) -> NaiveDateTime {
    convert(value, local_zone, SERVER_ZONE)
}

/// Stored server-zone value to local wall-clock for display.
pub fn from_server_time(value: NaiveDateTime, local_zone: Tz) -> NaiveDateTime {
    convert(value, SERVER_ZONE, local_zone)
}

/// The present moment expressed in the server zone, going through the same
/// offset arithmetic the rest of the conversions use.
pub fn now_in_server_time(local_zone: Tz) -> NaiveDateTime {
    to_server_time(now_in(local_zone), local_zone)
}

/// Render a timestamp for console output.
pub fn format_full(value: NaiveDateTime) -> String {
    value.format(FULL_FORMAT).to_string()
}

/// Render just the time-of-day portion of a timestamp.
pub fn format_hours(value: NaiveDateTime) -> String {
    value.format(HOURS_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // Fixed-offset zones keep these deterministic year round; POSIX signs are
    // inverted, so Etc/GMT+5 is five hours behind UTC.
    const WEST: Tz = chrono_tz::Etc::GMTPlus5;
    const EAST: Tz = chrono_tz::Etc::GMTMinus3;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn offset_between_a_zone_and_itself_is_zero() {
        assert_eq!(hours_offset(WEST, WEST), 0);
        assert_eq!(hours_offset(SERVER_ZONE, SERVER_ZONE), 0);
    }

    #[test]
    fn offsets_between_fixed_zones() {
        assert_eq!(hours_offset(SERVER_ZONE, WEST), -5);
        assert_eq!(hours_offset(WEST, SERVER_ZONE), 5);
        assert_eq!(hours_offset(WEST, EAST), 8);
        assert_eq!(hours_offset(EAST, WEST), -8);
    }

    #[test]
    fn convert_shifts_by_the_zone_offset() {
        let converted = convert(sample(), WEST, SERVER_ZONE);
        assert_eq!(converted, sample() + Duration::hours(5));
    }

    #[test]
    fn server_round_trip_returns_the_original_value() {
        let stored = to_server_time(sample(), WEST);
        assert_eq!(from_server_time(stored, WEST), sample());
    }

    #[test]
    fn identity_conversion_leaves_the_value_unchanged() {
        assert_eq!(convert(sample(), WEST, WEST), sample());
    }

    #[test]
    fn company_zone_offset_stays_in_the_expected_band() {
        // America/New_York is UTC-4 or UTC-5 depending on the season.
        let offset = hours_offset(SERVER_ZONE, chrono_tz::America::New_York);
        assert!(offset == -4 || offset == -5);
    }

    #[test]
    fn display_formats() {
        assert_eq!(format_hours(sample()), "9:00AM");
        assert_eq!(format_full(sample()), "March 5, 2024 - 9:00 AM");
    }
}
