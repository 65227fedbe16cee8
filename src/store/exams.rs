//! Exams, sessions and the joins hanging off them.

use serde::Deserialize;

use super::model::{
    Exam, ExamCourse, ExamCourseStatus, ExamHall, HallListPrintStatus, Session, SessionCourse,
    SessionDepartment, SessionHall,
};
use super::{add_record, join_row, pair, triple, Store};
use crate::ids::now_stamp;

/// Fields an exam-course upsert may set. `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCoursePatch {
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_confirmed: Option<bool>,
    #[serde(default)]
    pub status: Option<ExamCourseStatus>,
    #[serde(default)]
    pub confirmed_at: Option<String>,
}

impl ExamCoursePatch {
    fn apply(&self, row: &mut ExamCourse) {
        if let Some(v) = self.question_count {
            row.question_count = v;
        }
        if let Some(v) = self.duration {
            row.duration = v;
        }
        if let Some(v) = self.is_confirmed {
            row.is_confirmed = v;
        }
        if let Some(v) = self.status {
            row.status = v;
        }
        // Reverting to draft drops the confirmation stamp.
        if self.is_confirmed == Some(false) || self.status == Some(ExamCourseStatus::Draft) {
            row.confirmed_at = None;
        } else if let Some(v) = &self.confirmed_at {
            row.confirmed_at = Some(v.clone());
        }
    }
}

impl Store {
    pub fn add_exam(&mut self, exam: Exam) -> Exam {
        let exam = add_record(&mut self.exams, exam);
        self.flush();
        exam
    }

    pub fn update_exam(&mut self, exam: Exam) -> bool {
        let hit = self.exams.replace(exam);
        self.flush();
        hit
    }

    pub fn toggle_exam_status(&mut self, id: &str) -> bool {
        let hit = self.exams.modify(id, |e| e.is_active = !e.is_active);
        self.flush();
        hit
    }

    /// Removes the exam, its sessions (with their joins) and every row keyed
    /// by the exam id.
    pub fn delete_exam(&mut self, id: &str) -> bool {
        if self.exams.remove(id).is_none() {
            return false;
        }
        let sessions: Vec<String> = self
            .sessions
            .rows()
            .iter()
            .filter(|s| s.exam_id == id)
            .map(|s| s.id.clone())
            .collect();
        for session in &sessions {
            self.drop_session(session);
        }
        self.exam_courses.retain(|r| r.exam_id != id);
        self.exam_halls.retain(|r| r.exam_id != id);
        self.exam_course_questions.retain(|r| r.exam_id != id);
        self.registrations.retain(|r| r.exam_id != id);
        tracing::debug!(exam = id, sessions = sessions.len(), "exam deleted");
        self.flush();
        true
    }

    pub fn add_session(&mut self, session: Session) -> Session {
        let session = add_record(&mut self.sessions, session);
        self.flush();
        session
    }

    pub fn update_session(&mut self, session: Session) -> bool {
        let hit = self.sessions.replace(session);
        self.flush();
        hit
    }

    pub fn toggle_session_status(&mut self, id: &str) -> bool {
        let hit = self.sessions.modify(id, |s| s.is_active = !s.is_active);
        self.flush();
        hit
    }

    pub fn delete_session(&mut self, id: &str) -> bool {
        let hit = self.drop_session(id);
        self.flush();
        hit
    }

    fn drop_session(&mut self, id: &str) -> bool {
        if self.sessions.remove(id).is_none() {
            return false;
        }
        self.session_courses.retain(|r| r.session_id != id);
        self.session_departments.retain(|r| r.session_id != id);
        self.session_halls.retain(|r| r.session_id != id);
        self.hall_assignments.retain(|r| r.session_id != id);
        self.attendant_assignments.retain(|r| r.session_id != id);
        self.task_requests.retain(|r| r.session_id != id);
        self.print_statuses.retain(|r| r.session_id != id);
        true
    }

    /// Inserts the (exam, course) row if absent, otherwise patches it in
    /// place. The synthetic id of an existing row never changes.
    pub fn upsert_exam_course(
        &mut self,
        exam_id: &str,
        course_id: &str,
        patch: ExamCoursePatch,
    ) -> ExamCourse {
        let key = pair(exam_id, course_id);
        let mut patched = None;
        self.exam_courses.modify_key(&key, |row| {
            patch.apply(row);
            patched = Some(row.clone());
        });
        let row = match patched {
            Some(row) => row,
            None => {
                let mut row = join_row(ExamCourse {
                    id: String::new(),
                    exam_id: exam_id.to_string(),
                    course_id: course_id.to_string(),
                    question_count: 0,
                    duration: 0,
                    is_confirmed: false,
                    status: ExamCourseStatus::Draft,
                    confirmed_at: None,
                });
                patch.apply(&mut row);
                self.exam_courses.insert(row.clone());
                row
            }
        };
        self.flush();
        row
    }

    /// Direct add from the admin pages.
    pub fn add_exam_course(
        &mut self,
        exam_id: &str,
        course_id: &str,
        question_count: u32,
        duration: u32,
    ) -> ExamCourse {
        self.upsert_exam_course(
            exam_id,
            course_id,
            ExamCoursePatch {
                question_count: Some(question_count),
                duration: Some(duration),
                ..ExamCoursePatch::default()
            },
        )
    }

    /// Full-row update keyed by (exam, course); the row is created if
    /// missing. Every field is taken from `row`, so a `None` there clears
    /// `confirmed_at`. The stored id is kept.
    pub fn update_exam_course(&mut self, row: &ExamCourse) -> ExamCourse {
        let key = pair(&row.exam_id, &row.course_id);
        let mut updated = None;
        self.exam_courses.modify_key(&key, |stored| {
            stored.question_count = row.question_count;
            stored.duration = row.duration;
            stored.is_confirmed = row.is_confirmed;
            stored.status = row.status;
            stored.confirmed_at = row.confirmed_at.clone();
            updated = Some(stored.clone());
        });
        let updated = match updated {
            Some(updated) => updated,
            None => {
                let fresh = join_row(row.clone());
                self.exam_courses.insert(fresh.clone());
                fresh
            }
        };
        self.flush();
        updated
    }

    /// Marks the teacher's definition as ready.
    pub fn confirm_exam_course(&mut self, exam_id: &str, course_id: &str) -> ExamCourse {
        self.upsert_exam_course(
            exam_id,
            course_id,
            ExamCoursePatch {
                is_confirmed: Some(true),
                status: Some(ExamCourseStatus::Ready),
                confirmed_at: Some(now_stamp()),
                ..ExamCoursePatch::default()
            },
        )
    }

    /// Drops the row and the question set of that (exam, course).
    pub fn remove_exam_course(&mut self, exam_id: &str, course_id: &str) -> bool {
        let removed = self.exam_courses.remove_key(&pair(exam_id, course_id));
        if removed.is_empty() {
            return false;
        }
        self.exam_course_questions
            .retain(|r| !(r.exam_id == exam_id && r.course_id == course_id));
        self.flush();
        true
    }

    pub fn add_exam_hall(&mut self, exam_id: &str, hall_id: &str) -> bool {
        let added = self.exam_halls.insert(join_row(ExamHall {
            id: String::new(),
            exam_id: exam_id.to_string(),
            hall_id: hall_id.to_string(),
        }));
        self.flush();
        added
    }

    pub fn remove_exam_hall(&mut self, exam_id: &str, hall_id: &str) -> bool {
        let hit = !self.exam_halls.remove_key(&pair(exam_id, hall_id)).is_empty();
        self.flush();
        hit
    }

    pub fn add_session_course(&mut self, session_id: &str, course_id: &str) -> bool {
        let added = self.session_courses.insert(join_row(SessionCourse {
            id: String::new(),
            session_id: session_id.to_string(),
            course_id: course_id.to_string(),
        }));
        self.flush();
        added
    }

    pub fn remove_session_course(&mut self, session_id: &str, course_id: &str) -> bool {
        let hit = !self
            .session_courses
            .remove_key(&pair(session_id, course_id))
            .is_empty();
        self.flush();
        hit
    }

    pub fn add_session_department(&mut self, session_id: &str, department_id: &str) -> bool {
        let added = self.session_departments.insert(join_row(SessionDepartment {
            id: String::new(),
            session_id: session_id.to_string(),
            department_id: department_id.to_string(),
        }));
        self.flush();
        added
    }

    /// Also removes the halls booked for that department in the session.
    pub fn remove_session_department(&mut self, session_id: &str, department_id: &str) -> bool {
        let hit = !self
            .session_departments
            .remove_key(&pair(session_id, department_id))
            .is_empty();
        self.session_halls
            .retain(|r| !(r.session_id == session_id && r.department_id == department_id));
        self.flush();
        hit
    }

    pub fn add_session_hall(
        &mut self,
        session_id: &str,
        department_id: &str,
        hall_id: &str,
    ) -> bool {
        let added = self.session_halls.insert(join_row(SessionHall {
            id: String::new(),
            session_id: session_id.to_string(),
            department_id: department_id.to_string(),
            hall_id: hall_id.to_string(),
        }));
        self.flush();
        added
    }

    pub fn remove_session_hall(
        &mut self,
        session_id: &str,
        department_id: &str,
        hall_id: &str,
    ) -> bool {
        let hit = !self
            .session_halls
            .remove_key(&triple(session_id, department_id, hall_id))
            .is_empty();
        self.flush();
        hit
    }

    /// Records whether the hall list was printed; `printed_at` follows the flag.
    pub fn set_print_status(
        &mut self,
        session_id: &str,
        department_id: &str,
        hall_id: &str,
        is_printed: bool,
    ) -> HallListPrintStatus {
        let key = triple(session_id, department_id, hall_id);
        let printed_at = is_printed.then(now_stamp);
        let mut patched = None;
        self.print_statuses.modify_key(&key, |r| {
            r.is_printed = is_printed;
            r.printed_at = printed_at.clone();
            patched = Some(r.clone());
        });
        let row = match patched {
            Some(row) => row,
            None => {
                let row = join_row(HallListPrintStatus {
                    id: String::new(),
                    session_id: session_id.to_string(),
                    department_id: department_id.to_string(),
                    hall_id: hall_id.to_string(),
                    is_printed,
                    printed_at,
                });
                self.print_statuses.insert(row.clone());
                row
            }
        };
        self.flush();
        row
    }
}
