//! `<family>.list|create|update|delete[|toggleStatus]` for the entity
//! collections. Create ignores any incoming id; update and delete of an
//! unknown id succeed with `false`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::parse;
use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{
    Attendant, Building, Course, Department, Exam, Hall, Question, School, Session, Store,
    Student, Teacher, Topic,
};

struct EntityOps<T> {
    /// Result key for lists.
    plural: &'static str,
    /// Result key for a created record.
    singular: &'static str,
    list: fn(&Store) -> &[T],
    add: fn(&mut Store, T) -> T,
    update: fn(&mut Store, T) -> bool,
    delete: fn(&mut Store, &str) -> bool,
    toggle: Option<fn(&mut Store, &str) -> bool>,
}

const SCHOOLS: EntityOps<School> = EntityOps {
    plural: "schools",
    singular: "school",
    list: Store::schools,
    add: Store::add_school,
    update: Store::update_school,
    delete: Store::delete_school,
    toggle: None,
};

const DEPARTMENTS: EntityOps<Department> = EntityOps {
    plural: "departments",
    singular: "department",
    list: Store::departments,
    add: Store::add_department,
    update: Store::update_department,
    delete: Store::delete_department,
    toggle: None,
};

const BUILDINGS: EntityOps<Building> = EntityOps {
    plural: "buildings",
    singular: "building",
    list: Store::buildings,
    add: Store::add_building,
    update: Store::update_building,
    delete: Store::delete_building,
    toggle: None,
};

const HALLS: EntityOps<Hall> = EntityOps {
    plural: "halls",
    singular: "hall",
    list: Store::halls,
    add: Store::add_hall,
    update: Store::update_hall,
    delete: Store::delete_hall,
    toggle: None,
};

const TEACHERS: EntityOps<Teacher> = EntityOps {
    plural: "teachers",
    singular: "teacher",
    list: Store::teachers,
    add: Store::add_teacher,
    update: Store::update_teacher,
    delete: Store::delete_teacher,
    toggle: None,
};

const COURSES: EntityOps<Course> = EntityOps {
    plural: "courses",
    singular: "course",
    list: Store::courses,
    add: Store::add_course,
    update: Store::update_course,
    delete: Store::delete_course,
    toggle: None,
};

const EXAMS: EntityOps<Exam> = EntityOps {
    plural: "exams",
    singular: "exam",
    list: Store::exams,
    add: Store::add_exam,
    update: Store::update_exam,
    delete: Store::delete_exam,
    toggle: Some(Store::toggle_exam_status),
};

const SESSIONS: EntityOps<Session> = EntityOps {
    plural: "sessions",
    singular: "session",
    list: Store::sessions,
    add: Store::add_session,
    update: Store::update_session,
    delete: Store::delete_session,
    toggle: Some(Store::toggle_session_status),
};

const STUDENTS: EntityOps<Student> = EntityOps {
    plural: "students",
    singular: "student",
    list: Store::students,
    add: Store::add_student,
    update: Store::update_student,
    delete: Store::delete_student,
    toggle: None,
};

const ATTENDANTS: EntityOps<Attendant> = EntityOps {
    plural: "attendants",
    singular: "attendant",
    list: Store::attendants,
    add: Store::add_attendant,
    update: Store::update_attendant,
    delete: Store::delete_attendant,
    toggle: Some(Store::toggle_attendant_status),
};

const TOPICS: EntityOps<Topic> = EntityOps {
    plural: "topics",
    singular: "topic",
    list: Store::topics,
    add: Store::add_topic,
    update: Store::update_topic,
    delete: Store::delete_topic,
    toggle: None,
};

const QUESTIONS: EntityOps<Question> = EntityOps {
    plural: "questions",
    singular: "question",
    list: Store::questions,
    add: Store::add_question,
    update: Store::update_question,
    delete: Store::delete_question,
    toggle: None,
};

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

fn run<T>(
    ops: &EntityOps<T>,
    op: &str,
    store: &mut Store,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr>
where
    T: Serialize + DeserializeOwned,
{
    match op {
        "list" => Ok(json!({ ops.plural: (ops.list)(store) })),
        "create" => {
            let row: T = parse(params)?;
            let created = (ops.add)(store, row);
            Ok(json!({ ops.singular: created }))
        }
        "update" => {
            let row: T = parse(params)?;
            Ok(json!({ "updated": (ops.update)(store, row) }))
        }
        "delete" => {
            let p: IdParams = parse(params)?;
            Ok(json!({ "deleted": (ops.delete)(store, &p.id) }))
        }
        "toggleStatus" => {
            let Some(toggle) = ops.toggle else {
                return Err(HandlerErr {
                    code: "not_implemented",
                    message: format!("{} have no status to toggle", ops.plural),
                    details: None,
                });
            };
            let p: IdParams = parse(params)?;
            Ok(json!({ "toggled": toggle(store, &p.id) }))
        }
        _ => Err(HandlerErr {
            code: "not_implemented",
            message: format!("unknown method: {}.{}", ops.plural, op),
            details: None,
        }),
    }
}

fn handle<T>(state: &mut AppState, req: &Request, op: &str, ops: &EntityOps<T>) -> serde_json::Value
where
    T: Serialize + DeserializeOwned,
{
    let Some(store) = state.store.as_mut() else {
        if op == "list" {
            return ok(&req.id, json!({ ops.plural: [] }));
        }
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match run(ops, op, store, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let (family, op) = req.method.split_once('.')?;
    match family {
        "schools" => Some(handle(state, req, op, &SCHOOLS)),
        "departments" => Some(handle(state, req, op, &DEPARTMENTS)),
        "buildings" => Some(handle(state, req, op, &BUILDINGS)),
        "halls" => Some(handle(state, req, op, &HALLS)),
        "teachers" => Some(handle(state, req, op, &TEACHERS)),
        "courses" => Some(handle(state, req, op, &COURSES)),
        "exams" => Some(handle(state, req, op, &EXAMS)),
        "sessions" => Some(handle(state, req, op, &SESSIONS)),
        "students" => Some(handle(state, req, op, &STUDENTS)),
        "attendants" => Some(handle(state, req, op, &ATTENDANTS)),
        "topics" => Some(handle(state, req, op, &TOPICS)),
        "questions" => Some(handle(state, req, op, &QUESTIONS)),
        _ => None,
    }
}
