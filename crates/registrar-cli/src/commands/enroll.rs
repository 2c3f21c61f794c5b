//! Enrollment workflow

use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use registrar_core::errors::ExError;
use registrar_core::model::{Persisted, Student};
use registrar_core::schema::define_schema;
use registrar_core_types::Sensitive;
use registrar_store::config::MEMORY_URL;
use registrar_store::{materialize, Database, Session, StoreConfig, StudentRepo};

#[derive(Debug, Args)]
pub struct EnrollArgs {
    /// Backend connection string
    #[arg(long, default_value = MEMORY_URL)]
    pub db: String,

    /// Bulk-save two students instead of staging one
    #[arg(long)]
    pub bulk: bool,
}

fn midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn albert_einstein() -> Student {
    let student = Student::new("Albert Einstein", "albert.einstein@zurich.edu", 6);
    match midnight(1879, 3, 14) {
        Some(birthday) => student.with_birthday(birthday),
        None => student,
    }
}

fn alan_turing() -> Student {
    let student = Student::new("Alan Turing", "alan.turing@sherborne.edu", 11);
    match midnight(1912, 6, 23) {
        Some(birthday) => student.with_birthday(birthday),
        None => student,
    }
}

/// Render the id line; absent ids print as `None`
pub fn id_line(id: Option<i64>) -> String {
    match id {
        Some(id) => format!("New student ID is {}.", id),
        None => "New student ID is None.".to_string(),
    }
}

/// Render stored rows as a bracketed, comma-separated list
pub fn listing_line(rows: &[Persisted<Student>]) -> String {
    let rows: Vec<String> = rows.iter().map(ToString::to_string).collect();
    format!("[{}]", rows.join(", "))
}

fn log_enrollment(student: &Student) {
    tracing::info!(
        name = %student.name,
        email = %Sensitive::new(&student.email),
        grade = student.grade,
        "Enrolling student"
    );
}

pub fn execute(args: EnrollArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_url(args.db).map_err(ExError::from)?;
    let mut db = Database::connect(&config)?;
    materialize(&define_schema(), &mut db)?;

    let mut lines = {
        let mut session = Session::open(&mut db);
        if args.bulk {
            let students = vec![albert_einstein(), alan_turing()];
            for student in &students {
                log_enrollment(student);
            }
            session.bulk_save(students.clone());
            session.commit()?;
            // bulk_save never reports ids back to the caller's values
            students.iter().map(|_| id_line(None)).collect::<Vec<_>>()
        } else {
            let student = albert_einstein();
            log_enrollment(&student);
            let key = session.stage(student);
            session.commit()?;
            vec![id_line(session.id_of(key))]
        }
    };

    // The bulk rows exist even though their ids never came back
    if args.bulk {
        let rows = StudentRepo::list(db.connection())?;
        lines.push(listing_line(&rows));
    }

    db.close()?;

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}
