use grade_tracker::{
    Field, Gradebook, MemoryGradeStore, RowId, save_gradebook_to_csv, save_gradebook_to_json,
};
use tempfile::NamedTempFile;

fn sample_gradebook() -> Gradebook<MemoryGradeStore> {
    let mut gradebook = Gradebook::open(MemoryGradeStore::new()).unwrap();
    gradebook.register_course("CS101").unwrap();
    let second = gradebook.add_row("CS101").unwrap();
    for (row, values) in [
        (RowId::FIRST, ["HW1", "8", "10", "20"]),
        (second, ["HW2", "18", "20", "30"]),
    ] {
        for (field, value) in Field::ALL.into_iter().zip(values) {
            gradebook.set_field("CS101", row, field, value).unwrap();
        }
    }
    gradebook.update_assignments("CS101").unwrap();
    gradebook.register_course("MAT137").unwrap();
    gradebook
}

#[test]
fn json_export_contains_courses_and_averages() {
    let gradebook = sample_gradebook();
    let tmp = NamedTempFile::new().unwrap();
    save_gradebook_to_json(&gradebook, tmp.path()).unwrap();

    let raw = std::fs::read_to_string(tmp.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value["exported_at"].is_string());

    let courses = value["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0]["code"], "CS101");
    assert_eq!(courses[0]["average"], 86.0);
    assert_eq!(courses[0]["assignments"][1]["name"], "HW2");
    assert_eq!(courses[0]["assignments"][1]["weight"], 30.0);
    assert_eq!(courses[1]["code"], "MAT137");
    assert_eq!(courses[1]["assignments"].as_array().unwrap().len(), 0);
}

#[test]
fn json_export_ignores_uncommitted_edits() {
    let mut gradebook = sample_gradebook();
    gradebook
        .set_field("CS101", RowId::FIRST, Field::Earned, "0")
        .unwrap();

    let tmp = NamedTempFile::new().unwrap();
    save_gradebook_to_json(&gradebook, tmp.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path()).unwrap()).unwrap();
    assert_eq!(value["courses"][0]["assignments"][0]["earned"], 8.0);
}

#[test]
fn csv_export_writes_one_record_per_assignment() {
    let gradebook = sample_gradebook();
    let tmp = NamedTempFile::new().unwrap();
    save_gradebook_to_csv(&gradebook, tmp.path()).unwrap();

    let mut reader = csv::Reader::from_path(tmp.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["course", "course_average", "name", "earned", "total", "weight", "percentage"]
    );
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "CS101");
    assert_eq!(&records[0][2], "HW1");
    assert_eq!(records[0][6].parse::<f64>().unwrap(), 0.8);
    assert_eq!(records[1][1].parse::<f64>().unwrap(), 86.0);
}
