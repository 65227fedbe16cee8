//! Bulk student-course registration from spreadsheet rows.

use std::collections::HashMap;

use serde::Serialize;

use super::model::Student;
use super::{add_record, Store};

/// `[studentNumber, firstName, lastName, courseCode]`; extra cells are ignored.
pub type ImportRow = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    pub duplicates: usize,
    /// Short rows, blank student numbers and unknown course codes.
    pub skipped: usize,
    pub students_created: usize,
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl Store {
    /// Registers each row's student for the row's course in `exam_id`.
    ///
    /// Course codes resolve only against courses attached to the exam.
    /// Unknown student numbers create a student. A registration that already
    /// exists, or repeats an earlier row of the same batch, counts as a
    /// duplicate.
    pub fn import_registrations(&mut self, exam_id: &str, rows: &[ImportRow]) -> ImportSummary {
        let mut course_by_code: HashMap<String, String> = HashMap::new();
        for ec in self.exam_courses.rows().iter().filter(|ec| ec.exam_id == exam_id) {
            if let Some(course) = self.courses.get(&ec.course_id) {
                course_by_code
                    .entry(normalize_code(&course.code))
                    .or_insert_with(|| course.id.clone());
            }
        }
        let mut student_by_number: HashMap<String, String> = self
            .students
            .rows()
            .iter()
            .map(|s| (s.student_number.trim().to_string(), s.id.clone()))
            .collect();

        let mut summary = ImportSummary {
            total: rows.len(),
            ..ImportSummary::default()
        };
        for row in rows {
            let [number, first, last, code, ..] = row.as_slice() else {
                summary.skipped += 1;
                continue;
            };
            let number = number.trim();
            if number.is_empty() {
                summary.skipped += 1;
                continue;
            }
            let Some(course_id) = course_by_code.get(&normalize_code(code)) else {
                summary.skipped += 1;
                continue;
            };
            let student_id = match student_by_number.get(number) {
                Some(id) => id.clone(),
                None => {
                    let student = add_record(
                        &mut self.students,
                        Student {
                            id: String::new(),
                            student_number: number.to_string(),
                            first_name: first.trim().to_string(),
                            last_name: last.trim().to_string(),
                            department_id: None,
                        },
                    );
                    summary.students_created += 1;
                    student_by_number.insert(number.to_string(), student.id.clone());
                    student.id
                }
            };
            if self.insert_registration(exam_id, course_id, &student_id) {
                summary.success += 1;
            } else {
                summary.duplicates += 1;
            }
        }
        tracing::info!(
            exam = exam_id,
            total = summary.total,
            success = summary.success,
            duplicates = summary.duplicates,
            skipped = summary.skipped,
            "registration import finished"
        );
        self.flush();
        summary
    }
}

#[cfg(test)]
mod tests {
    use crate::store::testing::store;
    use crate::store::*;

    fn row(cells: &[&str]) -> ImportRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn exam_with_course(s: &mut Store, code: &str) -> (String, String) {
        let course = s.add_course(Course {
            id: String::new(),
            department_id: "DEP1".into(),
            teacher_id: None,
            code: code.into(),
            name: "Management".into(),
            class_level: None,
        });
        s.add_exam_course("EXM1", &course.id, 20, 40);
        ("EXM1".to_string(), course.id)
    }

    #[test]
    fn repeated_row_in_one_batch_counts_as_duplicate() {
        let mut s = store();
        let (exam, _) = exam_with_course(&mut s, "YON701");
        let rows = vec![
            row(&["111", "Ali", "Veli", "YON701"]),
            row(&["111", "Ali", "Veli", "YON701"]),
        ];
        let summary = s.import_registrations(&exam, &rows);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(s.registrations().len(), 1);
        assert_eq!(s.students().len(), 1);
    }

    #[test]
    fn already_persisted_registration_is_a_duplicate() {
        let mut s = store();
        let (exam, _) = exam_with_course(&mut s, "YON701");
        s.import_registrations(&exam, &[row(&["111", "Ali", "Veli", "YON701"])]);
        let again = s.import_registrations(&exam, &[row(&["111", "Ali", "Veli", "yon701 "])]);
        assert_eq!(again.success, 0);
        assert_eq!(again.duplicates, 1);
        assert_eq!(again.students_created, 0);
    }

    #[test]
    fn unknown_codes_and_short_rows_are_skipped() {
        let mut s = store();
        let (exam, _) = exam_with_course(&mut s, "YON701");
        s.add_course(Course {
            id: String::new(),
            department_id: "DEP1".into(),
            teacher_id: None,
            code: "MAT101".into(),
            name: "Not in this exam".into(),
            class_level: None,
        });
        let rows = vec![
            row(&["111", "Ali", "Veli", "MAT101"]),
            row(&["112", "Ayşe"]),
            row(&["", "No", "Number", "YON701"]),
            row(&["113", "Can", "Demir", "YON701"]),
        ];
        let summary = s.import_registrations(&exam, &rows);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.duplicates, 0);
    }
}
