use super::{GradeStore, PersistenceResult};
use crate::{Assignment, Course, Gradebook};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
struct GradebookSnapshot<'a> {
    exported_at: DateTime<Utc>,
    courses: Vec<CourseSnapshot<'a>>,
}

#[derive(Serialize)]
struct CourseSnapshot<'a> {
    code: &'a str,
    average: f64,
    assignments: &'a [Assignment],
}

impl<'a> From<&'a Course> for CourseSnapshot<'a> {
    fn from(course: &'a Course) -> Self {
        Self {
            code: course.code(),
            average: course.average(),
            assignments: course.assignments(),
        }
    }
}

/// Writes the committed state of every course as pretty-printed JSON.
pub fn save_gradebook_to_json<S: GradeStore, P: AsRef<Path>>(
    gradebook: &Gradebook<S>,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = GradebookSnapshot {
        exported_at: Utc::now(),
        courses: gradebook
            .courses()
            .iter()
            .map(|editor| CourseSnapshot::from(editor.course()))
            .collect(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

#[derive(Serialize)]
struct AssignmentCsvRecord<'a> {
    course: &'a str,
    course_average: f64,
    name: &'a str,
    earned: f64,
    total: f64,
    weight: f64,
    percentage: f64,
}

/// Writes one record per counted assignment, tagged with its course.
pub fn save_gradebook_to_csv<S: GradeStore, P: AsRef<Path>>(
    gradebook: &Gradebook<S>,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for editor in gradebook.courses() {
        let course = editor.course();
        for assignment in course.assignments() {
            writer.serialize(AssignmentCsvRecord {
                course: course.code(),
                course_average: course.average(),
                name: assignment.name(),
                earned: assignment.earned(),
                total: assignment.total(),
                weight: assignment.weight(),
                percentage: assignment.percentage(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
