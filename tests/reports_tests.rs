use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use schedule_consult::database::connection::DatabaseManager;
use schedule_consult::database::models::{
    Appointment, Contact, Customer, NewAppointment, NewCustomer, User,
};
use schedule_consult::services::reports::ReportService;
use tempfile::{tempdir, TempDir};

const ZONE: chrono_tz::Tz = chrono_tz::UTC;

async fn setup() -> Result<(DatabaseManager, ReportService, Customer, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db = DatabaseManager::new(&database_url).await?;
    db.run_migrations().await?;

    let reports = ReportService::new(db.pool.clone(), ZONE);
    let customer = Customer::create(
        &db.pool,
        &NewCustomer {
            name: "Acme Fabrication".to_string(),
            address: "12 Foundry Road".to_string(),
            postal_code: "30301".to_string(),
            phone: "404-555-0188".to_string(),
            division_id: 11,
        },
        "test",
    )
    .await?;

    Ok((db, reports, customer, temp_dir))
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn fields(
    customer_id: i64,
    contact_id: i64,
    kind: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NewAppointment {
    NewAppointment {
        title: "Planning kickoff".to_string(),
        description: "Initial scope review".to_string(),
        location: "Atlanta office".to_string(),
        kind: kind.to_string(),
        start_time: start,
        end_time: end,
        customer_id,
        user_id: 1,
        contact_id,
    }
}

#[tokio::test]
async fn test_customer_appointments_report_groups_by_month_and_type() -> Result<()> {
    let (db, reports, customer, _temp_dir) = setup().await?;

    for day in [5, 12] {
        Appointment::create(
            &db.pool,
            &fields(
                customer.id,
                1,
                "Planning Session",
                at(2024, 3, day, 9, 0),
                at(2024, 3, day, 10, 0),
            ),
            "test",
        )
        .await?;
    }
    Appointment::create(
        &db.pool,
        &fields(
            customer.id,
            1,
            "De-Briefing",
            at(2024, 4, 2, 9, 0),
            at(2024, 4, 2, 10, 0),
        ),
        "test",
    )
    .await?;

    let report = reports.customer_appointments().await?;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 2);
    // Busiest row first.
    assert!(lines[0].contains("2024"));
    assert!(lines[0].contains("March"));
    assert!(lines[0].contains("Planning Session"));
    assert!(lines[0].trim_end().ends_with('2'));
    assert!(lines[1].contains("April"));
    assert!(lines[1].contains("De-Briefing"));
    assert!(lines[1].trim_end().ends_with('1'));

    Ok(())
}

#[tokio::test]
async fn test_contact_schedule_lists_only_that_contact() -> Result<()> {
    let (db, reports, customer, _temp_dir) = setup().await?;

    Appointment::create(
        &db.pool,
        &fields(
            customer.id,
            1,
            "Planning Session",
            at(2024, 3, 5, 9, 0),
            at(2024, 3, 5, 10, 0),
        ),
        "test",
    )
    .await?;
    Appointment::create(
        &db.pool,
        &fields(
            customer.id,
            2,
            "De-Briefing",
            at(2024, 3, 6, 9, 0),
            at(2024, 3, 6, 10, 0),
        ),
        "test",
    )
    .await?;

    let anika = Contact::find_by_id(&db.pool, 1).await?.unwrap();
    let report = reports.contact_schedule(&anika).await?;
    assert_eq!(report.lines().count(), 1);
    assert!(report.contains("Planning kickoff"));
    assert!(report.contains("Planning Session"));
    assert!(report.contains("March 5, 2024"));
    assert!(report.contains(&format!("customer {}", customer.id)));
    assert!(!report.contains("De-Briefing"));

    Ok(())
}

#[tokio::test]
async fn test_contact_with_no_appointments_yields_empty_report() -> Result<()> {
    let (db, reports, _customer, _temp_dir) = setup().await?;

    let li = Contact::find_by_id(&db.pool, 3).await?.unwrap();
    assert_eq!(reports.contact_schedule(&li).await?, "");

    Ok(())
}

#[tokio::test]
async fn test_modified_appointments_report() -> Result<()> {
    let (db, reports, customer, _temp_dir) = setup().await?;

    let appointment = Appointment::create(
        &db.pool,
        &fields(
            customer.id,
            1,
            "Planning Session",
            at(2024, 3, 5, 9, 0),
            at(2024, 3, 5, 10, 0),
        ),
        "test",
    )
    .await?;

    let admin = User::find_by_id(&db.pool, 1).await?.unwrap();

    // Untouched appointments stay out of the report.
    assert_eq!(reports.modified_appointments(&admin).await?, "");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    Appointment::update(
        &db.pool,
        appointment.id,
        &fields(
            customer.id,
            1,
            "Planning Session",
            at(2024, 3, 5, 10, 0),
            at(2024, 3, 5, 11, 0),
        ),
        "admin",
    )
    .await?;

    let report = reports.modified_appointments(&admin).await?;
    assert_eq!(report.lines().count(), 1);
    assert!(report.contains(&format!("Appointment with ID: {}", appointment.id)));
    assert!(report.contains("last updated by 'admin'"));

    Ok(())
}
