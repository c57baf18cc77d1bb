//! # ScheduleConsult Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, and runs
//! the interactive console session: sign-in, appointment management,
//! customer management, and reports.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schedule_consult::config::{BusinessCalendar, Config, REMINDER_WINDOW_MINUTES, TEXT_FIELD_MAX};
use schedule_consult::database::connection::DatabaseManager;
use schedule_consult::database::models::{
    Appointment, Contact, Country, Customer, FirstLevelDivision, NewCustomer, User,
};
use schedule_consult::services::auth::{self, Session};
use schedule_consult::services::credential_log::CredentialLog;
use schedule_consult::services::reports::ReportService;
use schedule_consult::services::scheduling::{
    AppointmentDraft, ScheduleOutcome, SchedulingService,
};
use schedule_consult::utils::{datetime, logging, validation};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schedule_consult=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting ScheduleConsult v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, Local timezone: {}",
        config.database_url, config.local_zone
    );

    let db = DatabaseManager::new(&config.database_url).await?;
    db.run_migrations().await?;
    logging::log_system_event("database ready", None);

    let credential_log = CredentialLog::new(&config.login_log_path);
    let scheduling = SchedulingService::new(
        db.pool.clone(),
        BusinessCalendar::default(),
        config.local_zone,
    );
    let reports = ReportService::new(db.pool.clone(), config.local_zone);

    println!("ScheduleConsult {} ({})", env!("CARGO_PKG_VERSION"), config.local_zone);
    loop {
        let Some(session) = sign_in(&db, &credential_log, &config).await? else {
            break;
        };
        print_reminder(&scheduling).await?;
        let quit = command_loop(&session, &db, &scheduling, &reports, &credential_log).await?;
        if quit {
            break;
        }
        println!("Signed out.");
    }

    info!("Application stopped");
    Ok(())
}

/// Prompt until a user signs in. Returns `None` when the user quits instead.
async fn sign_in(
    db: &DatabaseManager,
    credential_log: &CredentialLog,
    config: &Config,
) -> Result<Option<Session>> {
    loop {
        let username = prompt("Username (or 'quit')")?;
        if username.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        let password = prompt("Password")?;
        match auth::login(&db.pool, credential_log, config.local_zone, &username, &password).await?
        {
            Some(session) => {
                println!("Welcome, {}.", session.user.username);
                return Ok(Some(session));
            }
            None => println!("Invalid username or password."),
        }
    }
}

async fn print_reminder(scheduling: &SchedulingService) -> Result<()> {
    let upcoming = scheduling.login_reminder().await?;
    if upcoming.is_empty() {
        println!(
            "There are no appointments within the next {REMINDER_WINDOW_MINUTES} minutes."
        );
    } else {
        println!("You have appointments within the next {REMINDER_WINDOW_MINUTES} minutes:");
        for appointment in upcoming {
            println!(
                "  {} at {}.",
                appointment.title,
                datetime::format_hours(appointment.start_time)
            );
        }
    }
    Ok(())
}

/// Dispatch console commands until the user logs out (`Ok(false)`) or quits
/// the program (`Ok(true)`).
async fn command_loop(
    session: &Session,
    db: &DatabaseManager,
    scheduling: &SchedulingService,
    reports: &ReportService,
    credential_log: &CredentialLog,
) -> Result<bool> {
    print_help();
    loop {
        let line = prompt(">")?;
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();

        match (command, args.as_slice()) {
            ("help", _) => print_help(),
            ("quit", _) => return Ok(true),
            ("logout", _) => return Ok(false),

            ("appointments", []) => {
                print_appointments(&scheduling.appointments().await?);
                if let Some((min, max)) = scheduling.schedule_bounds().await? {
                    println!(
                        "Schedule spans {} to {}.",
                        datetime::format_full(min),
                        datetime::format_full(max)
                    );
                }
            }
            ("appointments", ["month", arg]) => match parse_month(arg) {
                Some((year, month)) => {
                    print_appointments(&scheduling.appointments_in_month(year, month).await?);
                }
                None => println!("Expected a month as YYYY-MM."),
            },
            ("appointments", ["week", arg]) => {
                match NaiveDate::parse_from_str(arg, "%Y-%m-%d") {
                    Ok(week_start) => {
                        print_appointments(&scheduling.appointments_in_week(week_start).await?);
                    }
                    Err(_) => println!("Expected a week start date as YYYY-MM-DD."),
                }
            }
            ("schedule", _) => {
                let draft = collect_draft(session)?;
                print_outcome(scheduling.schedule(session, &draft).await?);
            }
            ("reschedule", [id]) => match id.parse::<i64>() {
                Ok(id) => {
                    if Appointment::find_by_id(&db.pool, id).await?.is_none() {
                        println!("No appointment with ID {id}.");
                        continue;
                    }
                    let draft = collect_draft(session)?;
                    print_outcome(scheduling.reschedule(session, id, &draft).await?);
                }
                Err(_) => println!("Expected an appointment ID."),
            },
            ("cancel", [id]) => match id.parse::<i64>() {
                Ok(id) => {
                    if scheduling.cancel(id).await? {
                        println!("Appointment {id} cancelled.");
                    } else {
                        println!("No appointment with ID {id}.");
                    }
                }
                Err(_) => println!("Expected an appointment ID."),
            },

            ("customers", []) => print_customers(&Customer::find_all(&db.pool).await?),
            ("customer", ["add"]) => customer_entry(session, db, None).await?,
            ("customer", ["edit", id]) => match id.parse::<i64>() {
                Ok(id) => customer_entry(session, db, Some(id)).await?,
                Err(_) => println!("Expected a customer ID."),
            },
            ("customer", ["delete", id]) => match id.parse::<i64>() {
                Ok(id) => {
                    if Customer::find_by_id(&db.pool, id).await?.is_none() {
                        println!("No customer with ID {id}.");
                    } else if Customer::delete(&db.pool, id).await? {
                        println!("Customer {id} deleted.");
                    } else {
                        println!(
                            "Unable to delete this customer. Please delete all appointments that this customer has."
                        );
                    }
                }
                Err(_) => println!("Expected a customer ID."),
            },

            ("contacts", _) => {
                for contact in Contact::find_all(&db.pool).await? {
                    println!("{:>4}  {:<24} {}", contact.id, contact.name, contact.email);
                }
            }
            ("countries", _) => {
                for country in Country::find_all(&db.pool).await? {
                    println!("{:>4}  {}", country.id, country.name);
                }
            }
            ("divisions", [country_id]) => match country_id.parse::<i64>() {
                Ok(country_id) => {
                    for division in
                        FirstLevelDivision::find_by_country(&db.pool, country_id).await?
                    {
                        println!("{:>4}  {}", division.id, division.name);
                    }
                }
                Err(_) => println!("Expected a country ID."),
            },

            ("report", ["customers"]) => print!("{}", reports.customer_appointments().await?),
            ("report", ["contact", id]) => match id.parse::<i64>() {
                Ok(id) => match Contact::find_by_id(&db.pool, id).await? {
                    Some(contact) => print!("{}", reports.contact_schedule(&contact).await?),
                    None => println!("No contact with ID {id}."),
                },
                Err(_) => println!("Expected a contact ID."),
            },
            ("report", ["modified", id]) => match id.parse::<i64>() {
                Ok(id) => match User::find_by_id(&db.pool, id).await? {
                    Some(user) => print!("{}", reports.modified_appointments(&user).await?),
                    None => println!("No user with ID {id}."),
                },
                Err(_) => println!("Expected a user ID."),
            },
            ("report", ["logins"]) => print!("{}", credential_log.report()),

            ("", _) => {}
            _ => println!("Unknown command. Type 'help' for the command list."),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  appointments [month YYYY-MM | week YYYY-MM-DD]");
    println!("  schedule | reschedule <id> | cancel <id>");
    println!("  customers | customer add | customer edit <id> | customer delete <id>");
    println!("  contacts | countries | divisions <country_id>");
    println!("  report customers | report contact <id> | report modified <user_id> | report logins");
    println!("  help | logout | quit");
}

/// Gather appointment fields interactively. Bad numeric input flows through
/// as -1 so the validator reports it alongside everything else.
fn collect_draft(session: &Session) -> Result<AppointmentDraft> {
    let title = prompt("Title")?;
    let description = prompt("Description")?;
    let location = prompt("Location")?;
    let kind = prompt("Type")?;
    let customer_id = parse_id(&prompt("Customer ID")?);
    let contact_id = parse_id(&prompt("Contact ID")?);
    let user_input = prompt("User ID (blank for yours)")?;
    let user_id = if user_input.is_empty() {
        session.user.id
    } else {
        parse_id(&user_input)
    };
    let start_local = parse_datetime_input(&prompt("Start (YYYY-MM-DD HH:MM)")?);
    let end_local = parse_datetime_input(&prompt("End (YYYY-MM-DD HH:MM)")?);

    Ok(AppointmentDraft {
        title,
        description,
        location,
        kind,
        start_local,
        end_local,
        customer_id,
        user_id,
        contact_id,
    })
}

async fn customer_entry(
    session: &Session,
    db: &DatabaseManager,
    editing: Option<i64>,
) -> Result<()> {
    if let Some(id) = editing {
        if Customer::find_by_id(&db.pool, id).await?.is_none() {
            println!("No customer with ID {id}.");
            return Ok(());
        }
    }

    let name = prompt("Name")?;
    let address = prompt("Address")?;
    let postal_code = prompt("Postal code")?;
    let phone = prompt("Phone")?;
    let division_id = parse_id(&prompt("Division ID")?);

    let mut errors = Vec::new();
    errors.extend(validation::validate_text("name", &name, TEXT_FIELD_MAX));
    errors.extend(validation::validate_text("address", &address, TEXT_FIELD_MAX));
    errors.extend(validation::validate_text("postal code", &postal_code, TEXT_FIELD_MAX));
    errors.extend(validation::validate_text("phone", &phone, TEXT_FIELD_MAX));
    errors.extend(validation::validate_entity_id("division ID", division_id));
    if division_id >= 0
        && FirstLevelDivision::find_by_id(&db.pool, division_id).await?.is_none()
    {
        errors.push(validation::ValidationError::UnknownDivision(division_id));
    }
    if !errors.is_empty() {
        println!("The customer was not saved:");
        for error in &errors {
            println!("  - {error}");
        }
        return Ok(());
    }

    let fields = NewCustomer {
        name,
        address,
        postal_code,
        phone,
        division_id,
    };
    let customer = match editing {
        Some(id) => Customer::update(&db.pool, id, &fields, session.actor()).await?,
        None => Customer::create(&db.pool, &fields, session.actor()).await?,
    };
    println!("Saved customer {} '{}'.", customer.id, customer.name);
    Ok(())
}

fn print_appointments(rows: &[Appointment]) {
    if rows.is_empty() {
        println!("No appointments.");
        return;
    }
    println!(
        "{:>4}  {:<20} {:<14} {:<17} {:<17} {:>5} {:>5} {:>7}",
        "ID", "Title", "Type", "Start", "End", "Cust", "User", "Contact"
    );
    for row in rows {
        println!(
            "{:>4}  {:<20} {:<14} {:<17} {:<17} {:>5} {:>5} {:>7}",
            row.id,
            row.title,
            row.kind,
            row.start_time.format("%Y-%m-%d %H:%M"),
            row.end_time.format("%Y-%m-%d %H:%M"),
            row.customer_id,
            row.user_id,
            row.contact_id
        );
    }
}

fn print_customers(rows: &[Customer]) {
    if rows.is_empty() {
        println!("No customers.");
        return;
    }
    println!(
        "{:>4}  {:<24} {:<30} {:<12} {:<14} {:>4}",
        "ID", "Name", "Address", "Postal", "Phone", "Div"
    );
    for row in rows {
        println!(
            "{:>4}  {:<24} {:<30} {:<12} {:<14} {:>4}",
            row.id, row.name, row.address, row.postal_code, row.phone, row.division_id
        );
    }
}

fn print_outcome(outcome: ScheduleOutcome) {
    match outcome {
        ScheduleOutcome::Scheduled(appointment) => {
            println!(
                "Saved appointment {} '{}' from {} to {}.",
                appointment.id,
                appointment.title,
                datetime::format_full(appointment.start_time),
                datetime::format_hours(appointment.end_time)
            );
        }
        ScheduleOutcome::Rejected(errors) => {
            println!("The appointment was not saved:");
            for error in &errors {
                println!("  - {error}");
            }
        }
    }
}

fn parse_id(input: &str) -> i64 {
    input.trim().parse().unwrap_or(-1)
}

fn parse_datetime_input(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M").ok()
}

fn parse_month(arg: &str) -> Option<(i32, u32)> {
    let (year, month) = arg.split_once('-')?;
    let year = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Read one trimmed line from stdin; end-of-input behaves like `quit`.
fn prompt(label: &str) -> Result<String> {
    print!("{label} ");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok("quit".to_string());
    }
    Ok(line.trim().to_string())
}
