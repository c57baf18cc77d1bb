use schedule_consult::config::{BusinessCalendar, Config};
use std::env;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

fn clear_env() {
    env::remove_var("DATABASE_URL");
    env::remove_var("LOCAL_TIMEZONE");
    env::remove_var("LOGIN_LOG_PATH");
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("LOCAL_TIMEZONE", "America/New_York");
    env::set_var("LOGIN_LOG_PATH", "/tmp/logins.txt");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.local_zone, chrono_tz::America::New_York);
    assert_eq!(config.login_log_path, "/tmp/logins.txt");

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:./data/schedule.db");
    assert_eq!(config.local_zone, chrono_tz::UTC);
    assert_eq!(config.login_log_path, "login_activity.txt");
}

#[test]
fn test_config_invalid_timezone() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("LOCAL_TIMEZONE", "Mars/Olympus_Mons");

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("Invalid LOCAL_TIMEZONE"));

    clear_env();
}

#[test]
fn test_config_empty_values_fall_back_to_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("DATABASE_URL", "");
    env::set_var("LOCAL_TIMEZONE", "");
    env::set_var("LOGIN_LOG_PATH", "");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:./data/schedule.db");
    assert_eq!(config.local_zone, chrono_tz::UTC);
    assert_eq!(config.login_log_path, "login_activity.txt");

    clear_env();
}

#[test]
fn test_config_timezone_whitespace_is_trimmed() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("LOCAL_TIMEZONE", "  Europe/London  ");

    let config = Config::from_env().unwrap();
    assert_eq!(config.local_zone, chrono_tz::Europe::London);

    clear_env();
}

#[test]
fn test_business_calendar_defaults() {
    let calendar = BusinessCalendar::default();

    assert_eq!(calendar.zone, chrono_tz::America::New_York);
    assert_eq!(calendar.open_days.len(), 7);
    assert_eq!(
        calendar.opening,
        chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    );
    assert_eq!(
        calendar.closing,
        chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap()
    );
}

#[test]
fn test_business_calendar_with_hours() {
    let calendar = BusinessCalendar::with_hours(
        chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    );

    assert_eq!(calendar.zone, chrono_tz::America::New_York);
    assert_eq!(
        calendar.opening,
        chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    );
    assert_eq!(
        calendar.closing,
        chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap()
    );
}
