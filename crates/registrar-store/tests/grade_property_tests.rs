// Property tests for the grade check constraint and id assignment

use proptest::prelude::*;
use registrar_core::errors::ExErrorKind;
use registrar_core::model::Student;
use registrar_core::schema::define_schema;
use registrar_store::{materialize, Database, Session, StudentRepo};

fn setup_test_db() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    materialize(&define_schema(), &mut db).unwrap();
    db
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_valid_grade_is_persisted(grade in 1i32..=12) {
        let mut db = setup_test_db();
        let mut session = Session::open(&mut db);
        let key = session.stage(Student::new("Student", "student@school.edu", grade));

        prop_assert!(session.commit().is_ok());
        prop_assert_eq!(session.id_of(key), Some(1));
    }

    #[test]
    fn prop_valid_students_get_sequential_ids(
        students in prop::collection::vec(("[A-Z][a-z]{1,10} [A-Z][a-z]{1,10}", 1i32..=12), 1..8)
    ) {
        let mut db = setup_test_db();
        let mut session = Session::open(&mut db);
        let keys: Vec<_> = students
            .iter()
            .enumerate()
            .map(|(i, (name, grade))| {
                let email = format!("student{}@school.edu", i);
                session.stage(Student::new(name.as_str(), email, *grade))
            })
            .collect();

        let report = session.commit().unwrap();
        let expected: Vec<i64> = (1..=students.len() as i64).collect();
        prop_assert_eq!(report.ids(), expected.clone());
        let ids: Vec<Option<i64>> = keys.iter().map(|k| session.id_of(*k)).collect();
        prop_assert_eq!(ids, expected.iter().copied().map(Some).collect::<Vec<_>>());
        drop(session);

        let stored = StudentRepo::list(db.connection()).unwrap();
        prop_assert_eq!(stored.len(), students.len());
        for (row, (name, grade)) in stored.iter().zip(&students) {
            prop_assert_eq!(&row.value().name, name);
            prop_assert_eq!(row.value().grade, *grade);
        }
    }

    #[test]
    fn prop_invalid_grade_is_rejected(
        grade in prop_oneof![i32::MIN..1, 13i32..=i32::MAX]
    ) {
        let mut db = setup_test_db();
        let mut session = Session::open(&mut db);
        let key = session.stage(Student::new("Student", "student@school.edu", grade));

        let err = session.commit().unwrap_err();
        prop_assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
        prop_assert_eq!(err.constraint(), Some("grade_between_1_and_12"));
        prop_assert_eq!(session.id_of(key), None);
        drop(session);

        prop_assert_eq!(StudentRepo::count(db.connection()).unwrap(), 0);
    }
}
