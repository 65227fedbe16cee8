//! Entity records as they are persisted and exchanged with the UI.
//!
//! Every record carries an opaque string id. Relationships live in separate
//! join records holding the foreign ids; no record keeps a list of its
//! dependents.

use serde::{Deserialize, Serialize};

use super::table::{JoinRow, Record};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default)]
    pub id: String,
    pub school_id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    #[serde(default)]
    pub id: String,
    pub building_id: String,
    pub name: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub floor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
}

/// A course may be taught by a teacher from another school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub id: String,
    pub department_id: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub class_level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub closing_date: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    pub exam_id: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamCourseStatus {
    #[default]
    Draft,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCourse {
    #[serde(default)]
    pub id: String,
    pub exam_id: String,
    pub course_id: String,
    #[serde(default)]
    pub question_count: u32,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub status: ExamCourseStatus,
    #[serde(default)]
    pub confirmed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamHall {
    pub id: String,
    pub exam_id: String,
    pub hall_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCourse {
    pub id: String,
    pub session_id: String,
    pub course_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDepartment {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHall {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
    pub hall_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub id: String,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub department_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCourseRegistration {
    pub id: String,
    pub exam_id: String,
    pub course_id: String,
    pub student_id: String,
    pub registered_at: String,
}

/// Seat of a student in a hall for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentHallAssignment {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
    pub hall_id: String,
    pub student_id: String,
    #[serde(default)]
    pub seat_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendant {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    #[default]
    Assigned,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantAssignment {
    pub id: String,
    pub session_id: String,
    pub building_id: String,
    #[serde(default)]
    pub hall_id: Option<String>,
    pub role_name: String,
    pub attendant_id: String,
    #[serde(default)]
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub id: String,
    pub attendant_id: String,
    pub session_id: String,
    #[serde(default)]
    pub status: TaskRequestStatus,
    pub requested_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default)]
    pub id: String,
    pub course_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    /// Multiple choice; `correct_answer` indexes into `options`.
    Test,
    /// Free text answer.
    Classic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCourseQuestion {
    pub id: String,
    pub exam_id: String,
    pub course_id: String,
    pub question_id: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallListPrintStatus {
    pub id: String,
    pub session_id: String,
    pub department_id: String,
    pub hall_id: String,
    pub is_printed: bool,
    #[serde(default)]
    pub printed_at: Option<String>,
}

macro_rules! impl_record {
    ($($ty:ty => $prefix:literal),* $(,)?) => {
        $(
            impl Record for $ty {
                const PREFIX: &'static str = $prefix;

                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_record! {
    School => "SCH",
    Department => "DEP",
    Building => "BLD",
    Hall => "HAL",
    Teacher => "TCH",
    Course => "CRS",
    Exam => "EXM",
    Session => "SES",
    ExamCourse => "EC-",
    ExamHall => "EH-",
    SessionCourse => "SC-",
    SessionDepartment => "SD-",
    SessionHall => "SH-",
    Student => "STU",
    StudentCourseRegistration => "REG-",
    StudentHallAssignment => "SHA-",
    Attendant => "ATT",
    AttendantAssignment => "AA-",
    TaskRequest => "TR-",
    Topic => "TOP",
    Question => "Q",
    ExamCourseQuestion => "ECQ-",
    HallListPrintStatus => "HLP-",
}

pub type PairKey = (String, String);
pub type TripleKey = (String, String, String);

impl JoinRow for ExamCourse {
    type Key = PairKey;
    fn key(&self) -> PairKey {
        (self.exam_id.clone(), self.course_id.clone())
    }
}

impl JoinRow for ExamHall {
    type Key = PairKey;
    fn key(&self) -> PairKey {
        (self.exam_id.clone(), self.hall_id.clone())
    }
}

impl JoinRow for SessionCourse {
    type Key = PairKey;
    fn key(&self) -> PairKey {
        (self.session_id.clone(), self.course_id.clone())
    }
}

impl JoinRow for SessionDepartment {
    type Key = PairKey;
    fn key(&self) -> PairKey {
        (self.session_id.clone(), self.department_id.clone())
    }
}

impl JoinRow for SessionHall {
    type Key = TripleKey;
    fn key(&self) -> TripleKey {
        (
            self.session_id.clone(),
            self.department_id.clone(),
            self.hall_id.clone(),
        )
    }
}

impl JoinRow for StudentCourseRegistration {
    type Key = TripleKey;
    fn key(&self) -> TripleKey {
        (
            self.exam_id.clone(),
            self.course_id.clone(),
            self.student_id.clone(),
        )
    }
}

/// One seat per student per session.
impl JoinRow for StudentHallAssignment {
    type Key = PairKey;
    fn key(&self) -> PairKey {
        (self.session_id.clone(), self.student_id.clone())
    }
}

/// (sessionId, buildingId, roleName, hallId)
pub type SlotKey = (String, String, String, Option<String>);

impl JoinRow for AttendantAssignment {
    type Key = SlotKey;
    fn key(&self) -> SlotKey {
        (
            self.session_id.clone(),
            self.building_id.clone(),
            self.role_name.clone(),
            self.hall_id.clone(),
        )
    }
}

impl JoinRow for TaskRequest {
    type Key = PairKey;
    fn key(&self) -> PairKey {
        (self.attendant_id.clone(), self.session_id.clone())
    }
}

impl JoinRow for ExamCourseQuestion {
    type Key = TripleKey;
    fn key(&self) -> TripleKey {
        (
            self.exam_id.clone(),
            self.course_id.clone(),
            self.question_id.clone(),
        )
    }
}

impl JoinRow for HallListPrintStatus {
    type Key = TripleKey;
    fn key(&self) -> TripleKey {
        (
            self.session_id.clone(),
            self.department_id.clone(),
            self.hall_id.clone(),
        )
    }
}
