use anyhow::Result;
use schedule_consult::services::credential_log::CredentialLog;
use tempfile::tempdir;

#[test]
fn test_record_appends_in_order() -> Result<()> {
    let temp_dir = tempdir()?;
    let log = CredentialLog::new(temp_dir.path().join("login_activity.txt"));

    log.record("alice", true)?;
    log.record("bob", false)?;
    log.record("alice", false)?;

    let report = log.report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("USER:alice SUCCESS:yes"));
    assert!(lines[1].contains("USER:bob SUCCESS:no"));
    assert!(lines[2].contains("USER:alice SUCCESS:no"));

    Ok(())
}

#[test]
fn test_line_format() -> Result<()> {
    let temp_dir = tempdir()?;
    let log = CredentialLog::new(temp_dir.path().join("login_activity.txt"));

    log.record("alice", true)?;

    let report = log.report();
    let line = report.lines().next().unwrap();
    // TIME:yyyy-MM-dd HH:mm:ss USER:alice SUCCESS:yes
    assert!(line.starts_with("TIME:"));
    assert!(line.ends_with("USER:alice SUCCESS:yes"));
    let stamp = line
        .strip_prefix("TIME:")
        .unwrap()
        .split(" USER:")
        .next()
        .unwrap();
    assert_eq!(stamp.len(), "2024-03-05 09:00:00".len());
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());

    Ok(())
}

#[test]
fn test_missing_log_reads_back_empty() {
    let temp_dir = tempdir().unwrap();
    let log = CredentialLog::new(temp_dir.path().join("never_written.txt"));

    assert_eq!(log.report(), "");
}

#[test]
fn test_report_survives_reopening() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("login_activity.txt");

    {
        let log = CredentialLog::new(&path);
        log.record("alice", true)?;
    }
    let log = CredentialLog::new(&path);
    log.record("bob", true)?;

    assert_eq!(log.report().lines().count(), 2);

    Ok(())
}
