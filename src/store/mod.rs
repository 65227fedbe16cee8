//! In-memory relational store for exam administration.
//!
//! The store owns one table per entity collection and writes every dirty
//! table back to its [`KvBackend`] at the end of each mutation. Mutations
//! never fail: unknown ids and duplicate keys are no-ops, and persistence
//! failures are logged while the in-memory rows stay authoritative.

mod academic;
mod attendants;
mod error;
mod exams;
mod facilities;
mod import;
mod kv;
mod model;
mod questions;
mod students;
mod table;
mod views;

pub use attendants::DutySlot;
pub use error::StoreError;
pub use exams::ExamCoursePatch;
pub use import::ImportRow;
pub use kv::{KvBackend, MemoryKv};
pub use model::*;

use table::{JoinTable, Record, Table};

use crate::ids::new_id;

pub const KEY_SCHOOLS: &str = "ems_schools_v1";
pub const KEY_DEPARTMENTS: &str = "ems_departments_v1";
pub const KEY_BUILDINGS: &str = "ems_buildings_v1";
pub const KEY_HALLS: &str = "ems_halls_v1";
pub const KEY_COURSES: &str = "ems_courses_v1";
pub const KEY_EXAMS: &str = "ems_exams_v1";
pub const KEY_SESSIONS: &str = "ems_sessions_v1";
pub const KEY_SESSION_COURSES: &str = "ems_sessionCourses_v1";
pub const KEY_SESSION_DEPARTMENTS: &str = "ems_sessionDepartments_v1";
pub const KEY_EXAM_COURSES: &str = "ems_examCourses_v1";
pub const KEY_EXAM_HALLS: &str = "ems_examHalls_v1";
pub const KEY_SESSION_HALLS: &str = "ems_sessionHalls_v1";
pub const KEY_STUDENTS: &str = "ems_students_v1";
pub const KEY_TEACHERS: &str = "ems_teachers_v1";
pub const KEY_ATTENDANTS: &str = "ems_attendants_v1";
pub const KEY_REGISTRATIONS: &str = "ems_studentCourseRegistrations_v1";
pub const KEY_HALL_ASSIGNMENTS: &str = "ems_studentHallAssignments_v1";
pub const KEY_ATTENDANT_ASSIGNMENTS: &str = "ems_attendantAssignments_v1";
pub const KEY_TASK_REQUESTS: &str = "ems_taskRequests_v1";
pub const KEY_QUESTIONS: &str = "ems_questions_v8";
pub const KEY_EXAM_COURSE_QUESTIONS: &str = "ems_examCourseQuestions_v5";
pub const KEY_TOPICS: &str = "ems_topics_v1";
pub const KEY_PRINT_STATUSES: &str = "ems_hallListPrintStatuses_v1";

/// Every storage key the store reads and writes.
pub const ALL_KEYS: [&str; 23] = [
    KEY_SCHOOLS,
    KEY_DEPARTMENTS,
    KEY_BUILDINGS,
    KEY_HALLS,
    KEY_COURSES,
    KEY_EXAMS,
    KEY_SESSIONS,
    KEY_SESSION_COURSES,
    KEY_SESSION_DEPARTMENTS,
    KEY_EXAM_COURSES,
    KEY_EXAM_HALLS,
    KEY_SESSION_HALLS,
    KEY_STUDENTS,
    KEY_TEACHERS,
    KEY_ATTENDANTS,
    KEY_REGISTRATIONS,
    KEY_HALL_ASSIGNMENTS,
    KEY_ATTENDANT_ASSIGNMENTS,
    KEY_TASK_REQUESTS,
    KEY_QUESTIONS,
    KEY_EXAM_COURSE_QUESTIONS,
    KEY_TOPICS,
    KEY_PRINT_STATUSES,
];

pub struct Store {
    backend: Box<dyn KvBackend>,

    schools: Table<School>,
    departments: Table<Department>,
    buildings: Table<Building>,
    halls: Table<Hall>,
    teachers: Table<Teacher>,
    courses: Table<Course>,
    exams: Table<Exam>,
    sessions: Table<Session>,
    students: Table<Student>,
    attendants: Table<Attendant>,
    topics: Table<Topic>,
    questions: Table<Question>,

    exam_courses: JoinTable<ExamCourse>,
    exam_halls: JoinTable<ExamHall>,
    session_courses: JoinTable<SessionCourse>,
    session_departments: JoinTable<SessionDepartment>,
    session_halls: JoinTable<SessionHall>,
    registrations: JoinTable<StudentCourseRegistration>,
    hall_assignments: JoinTable<StudentHallAssignment>,
    attendant_assignments: JoinTable<AttendantAssignment>,
    task_requests: JoinTable<TaskRequest>,
    exam_course_questions: JoinTable<ExamCourseQuestion>,
    print_statuses: JoinTable<HallListPrintStatus>,
}

impl Store {
    /// Loads every collection from `backend`. Collections that are missing
    /// or unreadable start empty.
    pub fn open(backend: Box<dyn KvBackend>) -> Self {
        let kv = backend.as_ref();
        let store = Self {
            schools: Table::load(kv, KEY_SCHOOLS, Vec::new()),
            departments: Table::load(kv, KEY_DEPARTMENTS, Vec::new()),
            buildings: Table::load(kv, KEY_BUILDINGS, Vec::new()),
            halls: Table::load(kv, KEY_HALLS, Vec::new()),
            teachers: Table::load(kv, KEY_TEACHERS, Vec::new()),
            courses: Table::load(kv, KEY_COURSES, Vec::new()),
            exams: Table::load(kv, KEY_EXAMS, Vec::new()),
            sessions: Table::load(kv, KEY_SESSIONS, Vec::new()),
            students: Table::load(kv, KEY_STUDENTS, Vec::new()),
            attendants: Table::load(kv, KEY_ATTENDANTS, Vec::new()),
            topics: Table::load(kv, KEY_TOPICS, Vec::new()),
            questions: Table::load(kv, KEY_QUESTIONS, Vec::new()),
            exam_courses: JoinTable::new(Table::load(kv, KEY_EXAM_COURSES, Vec::new())),
            exam_halls: JoinTable::new(Table::load(kv, KEY_EXAM_HALLS, Vec::new())),
            session_courses: JoinTable::new(Table::load(kv, KEY_SESSION_COURSES, Vec::new())),
            session_departments: JoinTable::new(Table::load(
                kv,
                KEY_SESSION_DEPARTMENTS,
                Vec::new(),
            )),
            session_halls: JoinTable::new(Table::load(kv, KEY_SESSION_HALLS, Vec::new())),
            registrations: JoinTable::new(Table::load(kv, KEY_REGISTRATIONS, Vec::new())),
            hall_assignments: JoinTable::new(Table::load(kv, KEY_HALL_ASSIGNMENTS, Vec::new())),
            attendant_assignments: JoinTable::new(Table::load(
                kv,
                KEY_ATTENDANT_ASSIGNMENTS,
                Vec::new(),
            )),
            task_requests: JoinTable::new(Table::load(kv, KEY_TASK_REQUESTS, Vec::new())),
            exam_course_questions: JoinTable::new(Table::load(
                kv,
                KEY_EXAM_COURSE_QUESTIONS,
                Vec::new(),
            )),
            print_statuses: JoinTable::new(Table::load(kv, KEY_PRINT_STATUSES, Vec::new())),
            backend,
        };
        tracing::debug!(
            schools = store.schools.len(),
            exams = store.exams.len(),
            students = store.students.len(),
            "store loaded"
        );
        store
    }

    pub fn backend(&self) -> &dyn KvBackend {
        self.backend.as_ref()
    }

    /// Writes a serialized collection straight to the backend. The rows in
    /// memory are untouched until [`Store::reload`].
    pub fn write_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(key, value)
    }

    /// Re-reads every collection from the backend, discarding unsaved rows.
    pub fn reload(&mut self) {
        let backend = std::mem::replace(&mut self.backend, Box::new(MemoryKv::new()));
        *self = Store::open(backend);
    }

    /// Writes every dirty collection. Returns false when any write failed;
    /// failed collections stay dirty and are retried by the next flush.
    pub fn flush(&mut self) -> bool {
        let kv = self.backend.as_mut();
        let mut ok = true;
        macro_rules! save {
            ($($table:expr),* $(,)?) => {
                $(
                    if $table.is_dirty() {
                        ok &= $table.save(kv);
                    }
                )*
            };
        }
        save!(
            self.schools,
            self.departments,
            self.buildings,
            self.halls,
            self.teachers,
            self.courses,
            self.exams,
            self.sessions,
            self.students,
            self.attendants,
            self.topics,
            self.questions,
            self.exam_courses.table_mut(),
            self.exam_halls.table_mut(),
            self.session_courses.table_mut(),
            self.session_departments.table_mut(),
            self.session_halls.table_mut(),
            self.registrations.table_mut(),
            self.hall_assignments.table_mut(),
            self.attendant_assignments.table_mut(),
            self.task_requests.table_mut(),
            self.exam_course_questions.table_mut(),
            self.print_statuses.table_mut(),
        );
        ok
    }

    pub fn schools(&self) -> &[School] {
        self.schools.rows()
    }
    pub fn departments(&self) -> &[Department] {
        self.departments.rows()
    }
    pub fn buildings(&self) -> &[Building] {
        self.buildings.rows()
    }
    pub fn halls(&self) -> &[Hall] {
        self.halls.rows()
    }
    pub fn teachers(&self) -> &[Teacher] {
        self.teachers.rows()
    }
    pub fn courses(&self) -> &[Course] {
        self.courses.rows()
    }
    pub fn exams(&self) -> &[Exam] {
        self.exams.rows()
    }
    pub fn sessions(&self) -> &[Session] {
        self.sessions.rows()
    }
    pub fn students(&self) -> &[Student] {
        self.students.rows()
    }
    pub fn attendants(&self) -> &[Attendant] {
        self.attendants.rows()
    }
    pub fn topics(&self) -> &[Topic] {
        self.topics.rows()
    }
    pub fn questions(&self) -> &[Question] {
        self.questions.rows()
    }
    pub fn exam_courses(&self) -> &[ExamCourse] {
        self.exam_courses.rows()
    }
    pub fn exam_halls(&self) -> &[ExamHall] {
        self.exam_halls.rows()
    }
    pub fn session_courses(&self) -> &[SessionCourse] {
        self.session_courses.rows()
    }
    pub fn session_departments(&self) -> &[SessionDepartment] {
        self.session_departments.rows()
    }
    pub fn session_halls(&self) -> &[SessionHall] {
        self.session_halls.rows()
    }
    pub fn registrations(&self) -> &[StudentCourseRegistration] {
        self.registrations.rows()
    }
    pub fn hall_assignments(&self) -> &[StudentHallAssignment] {
        self.hall_assignments.rows()
    }
    pub fn attendant_assignments(&self) -> &[AttendantAssignment] {
        self.attendant_assignments.rows()
    }
    pub fn task_requests(&self) -> &[TaskRequest] {
        self.task_requests.rows()
    }
    pub fn exam_course_questions(&self) -> &[ExamCourseQuestion] {
        self.exam_course_questions.rows()
    }
    pub fn print_statuses(&self) -> &[HallListPrintStatus] {
        self.print_statuses.rows()
    }
}

/// Gives `row` a fresh id and prepends it.
fn add_record<T: Record + Clone>(table: &mut Table<T>, mut row: T) -> T {
    row.set_id(new_id(T::PREFIX));
    table.prepend(row.clone());
    row
}

fn pair(a: &str, b: &str) -> PairKey {
    (a.to_string(), b.to_string())
}

fn triple(a: &str, b: &str, c: &str) -> TripleKey {
    (a.to_string(), b.to_string(), c.to_string())
}

/// Builds a join row with a fresh id.
fn join_row<T: Record>(mut row: T) -> T {
    row.set_id(new_id(T::PREFIX));
    row
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn mutations_persist_under_versioned_keys() {
        let mut s = store();
        s.add_school(School {
            id: String::new(),
            name: "Engineering".into(),
            code: "ENG".into(),
        });
        let raw = s
            .backend()
            .get(KEY_SCHOOLS)
            .expect("get")
            .expect("schools persisted");
        let rows: Vec<School> = serde_json::from_str(&raw).expect("parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Engineering");
        assert!(rows[0].id.starts_with("SCH"));
    }

    #[test]
    fn failed_write_keeps_memory_and_retries_on_next_flush() {
        let kv = FlakyKv::default();
        let fail = kv.fail.clone();
        let mut s = Store::open(Box::new(kv));

        fail.set(true);
        let school = s.add_school(School {
            id: String::new(),
            name: "Science".into(),
            code: "SCI".into(),
        });
        assert_eq!(s.schools().len(), 1);
        assert!(s.backend().get(KEY_SCHOOLS).expect("get").is_none());

        fail.set(false);
        s.add_building(Building {
            id: String::new(),
            name: "A Block".into(),
            address: None,
        });
        let raw = s.backend().get(KEY_SCHOOLS).expect("get").expect("retried");
        assert!(raw.contains(&school.id));
    }

    #[test]
    fn reopen_reads_back_persisted_state() {
        let mut s = store();
        let exam = s.add_exam(Exam {
            id: String::new(),
            name: "Spring Finals".into(),
            description: None,
            closing_date: "2026-06-01".into(),
            is_active: true,
        });
        let mut copy = MemoryKv::new();
        for key in s.backend().keys().expect("keys") {
            let v = s.backend().get(&key).expect("get").expect("value");
            copy.set(&key, &v).expect("set");
        }
        let reopened = Store::open(Box::new(copy));
        assert_eq!(reopened.exams(), &[exam]);
    }
}
