use grade_tracker::{
    DuplicateError, Field, GradeStore, Gradebook, GradebookError, MemoryGradeStore, RowId,
    ValidationError,
};

fn id(value: u32) -> RowId {
    RowId::new(value).unwrap()
}

fn fill<S: GradeStore>(gradebook: &mut Gradebook<S>, code: &str, row: RowId, values: [&str; 4]) {
    for (field, value) in Field::ALL.into_iter().zip(values) {
        gradebook.set_field(code, row, field, value).unwrap();
    }
}

#[test]
fn register_course_creates_placeholder_row() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    let editor = gradebook.register_course("CS101").unwrap();
    assert_eq!(editor.code(), "CS101");
    assert_eq!(editor.course().average(), 0.0);

    assert_eq!(
        gradebook.store().select_distinct_courses().unwrap(),
        vec!["CS101".to_string()]
    );
    let rows = gradebook.store().select_rows("CS101").unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_placeholder());
}

#[test]
fn duplicate_code_already_in_storage_is_rejected() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    // Written behind the session's back, so only storage knows about it.
    gradebook.store().insert_row("CS101", RowId::FIRST).unwrap();

    let err = gradebook.register_course("CS101").unwrap_err();
    assert!(matches!(
        err,
        GradebookError::Duplicate(DuplicateError { ref code }) if code == "CS101"
    ));
    assert!(gradebook.course("CS101").is_none());
    assert_eq!(gradebook.store().select_rows("CS101").unwrap().len(), 1);
}

#[test]
fn duplicate_code_in_session_is_rejected() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    gradebook.register_course("CS101").unwrap();
    let err = gradebook.register_course("CS101").unwrap_err();
    assert_eq!(err.to_string(), "course with code 'CS101' already exists");
    assert_eq!(gradebook.courses().len(), 1);
}

#[test]
fn blank_course_code_is_rejected() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    let err = gradebook.register_course("  ").unwrap_err();
    assert!(matches!(
        err,
        GradebookError::Validation(ValidationError::BlankCourseCode)
    ));
    assert!(gradebook.store().select_distinct_courses().unwrap().is_empty());
}

#[test]
fn delete_course_removes_every_stored_row() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    gradebook.register_course("CS101").unwrap();
    gradebook.register_course("MAT137").unwrap();
    gradebook.add_row("CS101").unwrap();
    gradebook.add_row("CS101").unwrap();

    assert!(gradebook.delete_course("CS101").unwrap());
    assert!(gradebook.course("CS101").is_none());
    assert!(gradebook.store().select_rows("CS101").unwrap().is_empty());
    assert_eq!(
        gradebook.store().select_distinct_courses().unwrap(),
        vec!["MAT137".to_string()]
    );

    assert!(!gradebook.delete_course("CS101").unwrap());
}

#[test]
fn deleted_code_can_be_registered_again() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    gradebook.register_course("CS101").unwrap();
    gradebook.add_row("CS101").unwrap();
    gradebook.delete_course("CS101").unwrap();

    let editor = gradebook.register_course("CS101").unwrap();
    assert_eq!(editor.rows().len(), 1);
    assert_eq!(editor.rows()[0].id(), RowId::FIRST);
}

#[test]
fn operations_on_unknown_course_fail() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    assert!(matches!(
        gradebook.add_row("NOPE"),
        Err(GradebookError::UnknownCourse(code)) if code == "NOPE"
    ));
    assert!(matches!(
        gradebook.update_assignments("NOPE"),
        Err(GradebookError::UnknownCourse(_))
    ));
}

#[test]
fn reopening_reproduces_assignments_and_average() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    gradebook.register_course("CS101").unwrap();
    let second = gradebook.add_row("CS101").unwrap();
    let third = gradebook.add_row("CS101").unwrap();
    fill(&mut gradebook, "CS101", RowId::FIRST, ["HW1", "8", "10", "20"]);
    fill(&mut gradebook, "CS101", second, ["HW2", "18", "20", "30"]);
    fill(&mut gradebook, "CS101", third, ["Final", "", "", ""]);
    assert_eq!(gradebook.update_assignments("CS101").unwrap(), 86.0);

    gradebook.register_course("MAT137").unwrap();
    fill(&mut gradebook, "MAT137", RowId::FIRST, ["Quiz", "3.5", "4", "2.5"]);
    gradebook.update_assignments("MAT137").unwrap();

    let before: Vec<_> = gradebook
        .courses()
        .iter()
        .map(|editor| editor.course().clone())
        .collect();

    let reopened = Gradebook::open(gradebook.into_store()).unwrap();
    let after: Vec<_> = reopened
        .courses()
        .iter()
        .map(|editor| editor.course().clone())
        .collect();
    assert_eq!(after, before);

    let cs101 = reopened.course("CS101").unwrap();
    assert_eq!(cs101.course().average(), 86.0);
    assert_eq!(cs101.rows().len(), 3);
    assert_eq!(cs101.rows()[2].get(Field::Name), "Final");
}

#[test]
fn reopened_course_allocates_after_existing_rows() {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    gradebook.register_course("CS101").unwrap();
    gradebook.add_row("CS101").unwrap();

    let mut reopened = Gradebook::open(gradebook.into_store()).unwrap();
    assert_eq!(reopened.add_row("CS101").unwrap(), id(3));
}

#[test]
fn stored_rows_that_fail_validation_load_without_assignments() {
    let store = MemoryGradeStore::new();
    store.insert_row("PHY131", RowId::FIRST).unwrap();
    store
        .update_field("PHY131", RowId::FIRST, Field::Earned, &grade_tracker::FieldValue::Real(5.0))
        .unwrap();
    store
        .update_field("PHY131", RowId::FIRST, Field::Total, &grade_tracker::FieldValue::Real(0.0))
        .unwrap();
    store
        .update_field("PHY131", RowId::FIRST, Field::Weight, &grade_tracker::FieldValue::Real(10.0))
        .unwrap();

    let gradebook = Gradebook::open(store).unwrap();
    let editor = gradebook.course("PHY131").unwrap();
    assert!(editor.course().assignments().is_empty());
    assert_eq!(editor.course().average(), 0.0);
    assert_eq!(editor.rows()[0].get(Field::Total), "0");
}
