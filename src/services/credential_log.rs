use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

use crate::utils::datetime::LOG_STAMP_FORMAT;

/// Flat append-only record of every sign-in attempt, one line per attempt.
pub struct CredentialLog {
    path: PathBuf,
}

impl CredentialLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one attempt. Write failures propagate; a failed audit write
    /// aborts the surrounding operation rather than passing silently.
    pub fn record(&self, username: &str, success: bool) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening credential log {}", self.path.display()))?;
        let stamp = Local::now().format(LOG_STAMP_FORMAT);
        writeln!(
            file,
            "TIME:{stamp} USER:{username} SUCCESS:{}",
            if success { "yes" } else { "no" }
        )
        .with_context(|| format!("writing credential log {}", self.path.display()))?;
        Ok(())
    }

    /// Read the whole log back for the sign-in report. A log that does not
    /// exist yet reads back empty; read failures degrade the same way.
    pub fn report(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not read credential log {}: {}", self.path.display(), err);
                }
                String::new()
            }
        }
    }
}
