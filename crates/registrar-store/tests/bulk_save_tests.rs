// Integration tests for bulk_save
// Rows are written by the next commit but their ids are never reported back

use registrar_core::model::Student;
use registrar_core::schema::define_schema;
use registrar_store::{materialize, Database, Session, StudentRepo};

fn setup_test_db() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    materialize(&define_schema(), &mut db).unwrap();
    db
}

fn pair() -> Vec<Student> {
    vec![
        Student::new("Albert Einstein", "albert.einstein@zurich.edu", 6),
        Student::new("Alan Turing", "alan.turing@sherborne.edu", 11),
    ]
}

#[test]
fn test_bulk_save_persists_rows_without_ids() {
    // Given: Two students queued with bulk_save
    let mut db = setup_test_db();
    let mut session = Session::open(&mut db);
    let students = pair();
    assert_eq!(session.bulk_save(students.clone()), 2);
    assert_eq!(session.bulk_count(), 2);

    // When: The session commits
    let report = session.commit().unwrap();

    // Then: Both rows were written but no id came back
    assert_eq!(report.bulk_inserted, 2);
    assert!(report.persisted.is_empty());
    assert!(report.ids().is_empty());
    assert_eq!(session.bulk_count(), 0);
    drop(session);

    // And: The backend holds both rows with ids 1 and 2
    let stored = StudentRepo::list(db.connection()).unwrap();
    let ids: Vec<i64> = stored.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(stored[1].value().email, "alan.turing@sherborne.edu");

    // And: The caller's copies are untouched
    for student in &students {
        assert_eq!(student.enrolled_date, None);
    }
}

#[test]
fn test_bulk_and_staged_share_one_transaction() {
    let mut db = setup_test_db();
    let mut session = Session::open(&mut db);

    let tracked = session.stage(Student::new("Grace Hopper", "grace.hopper@yale.edu", 12));
    session.bulk_save(pair());
    let report = session.commit().unwrap();

    // Staged rows are inserted first, so the tracked record gets id 1
    assert_eq!(session.id_of(tracked), Some(1));
    assert_eq!(report.bulk_inserted, 2);
    drop(session);

    assert_eq!(StudentRepo::count(db.connection()).unwrap(), 3);
}

#[test]
fn test_failing_bulk_row_rolls_back_staged_rows() {
    let mut db = setup_test_db();
    let mut session = Session::open(&mut db);

    let tracked = session.stage(Student::new("Grace Hopper", "grace.hopper@yale.edu", 12));
    session.bulk_save(vec![Student::new("Bad", "bad@school.edu", 99)]);

    assert!(session.commit().is_err());
    assert_eq!(session.id_of(tracked), None);
    assert_eq!(session.bulk_count(), 1);

    let values = session.rollback();
    assert_eq!(values.len(), 2);
    drop(session);

    assert_eq!(StudentRepo::count(db.connection()).unwrap(), 0);
}

#[test]
fn test_bulk_save_empty_commit_is_noop() {
    let mut db = setup_test_db();
    let mut session: Session<'_, Student> = Session::open(&mut db);

    assert_eq!(session.bulk_save(Vec::new()), 0);
    let report = session.commit().unwrap();

    assert_eq!(report.bulk_inserted, 0);
    assert!(report.persisted.is_empty());
}
