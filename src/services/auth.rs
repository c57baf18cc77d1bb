use anyhow::Result;
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::database::models::User;
use crate::services::credential_log::CredentialLog;
use crate::utils::datetime;
use crate::utils::logging;

/// The authenticated context for one signed-in user.
///
/// Passed explicitly to whichever service needs the actor identity; there is
/// no ambient logged-in-user state.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    /// Login moment in the server zone; drives the upcoming-appointment
    /// reminder shown right after sign-in.
    pub logged_in_at: NaiveDateTime,
}

impl Session {
    /// Name recorded in audit columns for changes made under this session.
    pub fn actor(&self) -> &str {
        &self.user.username
    }
}

/// Attempt to sign in. Usernames are matched case-insensitively by
/// lowercasing the input; every attempt lands in the credential log whether
/// or not it succeeds. Returns `None` for bad or blank credentials.
pub async fn login(
    pool: &SqlitePool,
    log: &CredentialLog,
    local_zone: Tz,
    username: &str,
    password: &str,
) -> Result<Option<Session>> {
    let username = username.trim().to_lowercase();
    if username.is_empty() || password.is_empty() {
        log.record(&username, false)?;
        logging::log_login_attempt(&username, false);
        return Ok(None);
    }

    match User::find_by_credentials(pool, &username, password).await? {
        Some(user) => {
            log.record(&username, true)?;
            logging::log_login_attempt(&username, true);
            Ok(Some(Session {
                user,
                logged_in_at: datetime::now_in_server_time(local_zone),
            }))
        }
        None => {
            log.record(&username, false)?;
            logging::log_login_attempt(&username, false);
            Ok(None)
        }
    }
}
