//! Students, their course registrations and their seats.

use super::model::{Student, StudentCourseRegistration, StudentHallAssignment};
use super::{add_record, join_row, pair, triple, Store};
use crate::ids::now_stamp;

impl Store {
    pub fn add_student(&mut self, student: Student) -> Student {
        let student = add_record(&mut self.students, student);
        self.flush();
        student
    }

    pub fn update_student(&mut self, student: Student) -> bool {
        let hit = self.students.replace(student);
        self.flush();
        hit
    }

    pub fn delete_student(&mut self, id: &str) -> bool {
        if self.students.remove(id).is_none() {
            return false;
        }
        self.registrations.retain(|r| r.student_id != id);
        self.hall_assignments.retain(|r| r.student_id != id);
        self.flush();
        true
    }

    pub fn add_registration(&mut self, exam_id: &str, course_id: &str, student_id: &str) -> bool {
        let added = self.insert_registration(exam_id, course_id, student_id);
        self.flush();
        added
    }

    pub(super) fn insert_registration(
        &mut self,
        exam_id: &str,
        course_id: &str,
        student_id: &str,
    ) -> bool {
        self.registrations.insert(join_row(StudentCourseRegistration {
            id: String::new(),
            exam_id: exam_id.to_string(),
            course_id: course_id.to_string(),
            student_id: student_id.to_string(),
            registered_at: now_stamp(),
        }))
    }

    pub fn remove_registration(
        &mut self,
        exam_id: &str,
        course_id: &str,
        student_id: &str,
    ) -> bool {
        let hit = !self
            .registrations
            .remove_key(&triple(exam_id, course_id, student_id))
            .is_empty();
        self.flush();
        hit
    }

    /// Seats the student for the session, moving any earlier seat of the
    /// same student in that session. The row id survives a move.
    pub fn assign_student_to_hall(
        &mut self,
        session_id: &str,
        department_id: &str,
        hall_id: &str,
        student_id: &str,
        seat_number: Option<u32>,
    ) -> StudentHallAssignment {
        let key = pair(session_id, student_id);
        let mut moved = None;
        self.hall_assignments.modify_key(&key, |r| {
            r.department_id = department_id.to_string();
            r.hall_id = hall_id.to_string();
            r.seat_number = seat_number;
            moved = Some(r.clone());
        });
        let row = match moved {
            Some(row) => row,
            None => {
                let row = join_row(StudentHallAssignment {
                    id: String::new(),
                    session_id: session_id.to_string(),
                    department_id: department_id.to_string(),
                    hall_id: hall_id.to_string(),
                    student_id: student_id.to_string(),
                    seat_number,
                });
                self.hall_assignments.insert(row.clone());
                row
            }
        };
        self.flush();
        row
    }

    pub fn remove_hall_assignment(&mut self, session_id: &str, student_id: &str) -> bool {
        let hit = !self
            .hall_assignments
            .remove_key(&pair(session_id, student_id))
            .is_empty();
        self.flush();
        hit
    }

    /// Empties one hall for one session department. Returns the number of
    /// seats freed.
    pub fn clear_hall_assignments(
        &mut self,
        session_id: &str,
        department_id: &str,
        hall_id: &str,
    ) -> usize {
        let removed = self.hall_assignments.retain(|r| {
            !(r.session_id == session_id
                && r.department_id == department_id
                && r.hall_id == hall_id)
        });
        self.flush();
        removed.len()
    }
}
