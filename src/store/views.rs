//! Read-only joined views for session overviews and printable hall lists.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::model::{
    AttendantAssignment, Course, Department, Hall, HallListPrintStatus, Session, SessionHall,
};
use super::{triple, Store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session: Session,
    pub courses: Vec<Course>,
    pub departments: Vec<Department>,
    pub halls: Vec<SessionHall>,
    /// Distinct students registered, in the session's exam, for any of the
    /// session's courses.
    pub unique_student_count: usize,
    pub attendants: Vec<AttendantAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HallListEntry {
    pub student_id: String,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub seat_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HallListView {
    pub session_id: String,
    pub department_id: String,
    pub hall: Option<Hall>,
    pub entries: Vec<HallListEntry>,
    pub print_status: Option<HallListPrintStatus>,
}

impl Store {
    pub fn session_summary(&self, session_id: &str) -> Option<SessionSummary> {
        let session = self.sessions.get(session_id)?.clone();

        let course_ids: HashSet<&str> = self
            .session_courses
            .rows()
            .iter()
            .filter(|r| r.session_id == session_id)
            .map(|r| r.course_id.as_str())
            .collect();
        let courses = self
            .courses
            .rows()
            .iter()
            .filter(|c| course_ids.contains(c.id.as_str()))
            .cloned()
            .collect();

        let department_ids: HashSet<&str> = self
            .session_departments
            .rows()
            .iter()
            .filter(|r| r.session_id == session_id)
            .map(|r| r.department_id.as_str())
            .collect();
        let departments = self
            .departments
            .rows()
            .iter()
            .filter(|d| department_ids.contains(d.id.as_str()))
            .cloned()
            .collect();

        let unique_student_count = self
            .registrations
            .rows()
            .iter()
            .filter(|r| r.exam_id == session.exam_id && course_ids.contains(r.course_id.as_str()))
            .map(|r| r.student_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Some(SessionSummary {
            halls: self
                .session_halls
                .rows()
                .iter()
                .filter(|r| r.session_id == session_id)
                .cloned()
                .collect(),
            attendants: self
                .attendant_assignments
                .rows()
                .iter()
                .filter(|r| r.session_id == session_id)
                .cloned()
                .collect(),
            session,
            courses,
            departments,
            unique_student_count,
        })
    }

    /// Seated students of one hall, by seat number (unseated last) then
    /// last name.
    pub fn hall_list(&self, session_id: &str, department_id: &str, hall_id: &str) -> HallListView {
        let students: HashMap<&str, _> = self
            .students
            .rows()
            .iter()
            .map(|s| (s.id.as_str(), s))
            .collect();
        let mut entries: Vec<HallListEntry> = self
            .hall_assignments
            .rows()
            .iter()
            .filter(|r| {
                r.session_id == session_id
                    && r.department_id == department_id
                    && r.hall_id == hall_id
            })
            .map(|r| {
                let student = students.get(r.student_id.as_str());
                HallListEntry {
                    student_id: r.student_id.clone(),
                    student_number: student.map(|s| s.student_number.clone()).unwrap_or_default(),
                    first_name: student.map(|s| s.first_name.clone()).unwrap_or_default(),
                    last_name: student.map(|s| s.last_name.clone()).unwrap_or_default(),
                    seat_number: r.seat_number,
                }
            })
            .collect();
        entries.sort_by(|a, b| {
            let seat = |e: &HallListEntry| e.seat_number.unwrap_or(u32::MAX);
            seat(a)
                .cmp(&seat(b))
                .then_with(|| a.last_name.cmp(&b.last_name))
                .then_with(|| a.first_name.cmp(&b.first_name))
        });

        HallListView {
            session_id: session_id.to_string(),
            department_id: department_id.to_string(),
            hall: self.halls.get(hall_id).cloned(),
            entries,
            print_status: self
                .print_statuses
                .find(&triple(session_id, department_id, hall_id))
                .cloned(),
        }
    }
}
