use tracing::{debug, error, info, warn};

/// Logs a login attempt with consistent format
pub fn log_login_attempt(username: &str, success: bool) {
    if success {
        info!("LOGIN: user '{}' signed in", username);
    } else {
        warn!("LOGIN: failed attempt for user '{}'", username);
    }
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str) {
    error!("DB_ERROR: {} on {} failed: {}", operation, table, error);
}

/// Logs rejected appointment entries with consistent format
pub fn log_validation_failure(operation: &str, reasons: usize) {
    warn!(
        "VALIDATION: {} rejected with {} violation(s)",
        operation, reasons
    );
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
