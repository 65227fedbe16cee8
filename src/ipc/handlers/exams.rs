use serde::Deserialize;
use serde_json::json;

use super::{matches, parse, with_store, HandlerResult, StoreHandler};
use crate::ipc::types::{AppState, Request};
use crate::store::{ExamCourse, Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamHallParams {
    exam_id: String,
    hall_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCourseParams {
    session_id: String,
    course_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDepartmentParams {
    session_id: String,
    department_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionHallParams {
    session_id: String,
    department_id: String,
    hall_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrintStatusParams {
    session_id: String,
    department_id: String,
    hall_id: String,
    is_printed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamCourseKey {
    exam_id: String,
    course_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamCourseAddParams {
    exam_id: String,
    course_id: String,
    #[serde(default)]
    question_count: u32,
    #[serde(default)]
    duration: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamListParams {
    #[serde(default)]
    exam_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionListParams {
    #[serde(default)]
    session_id: Option<String>,
}

fn exam_halls_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamListParams = parse(params)?;
    let rows: Vec<_> = store
        .exam_halls()
        .iter()
        .filter(|r| matches(&p.exam_id, &r.exam_id))
        .collect();
    Ok(json!({ "examHalls": rows }))
}

fn exam_halls_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamHallParams = parse(params)?;
    Ok(json!({ "added": store.add_exam_hall(&p.exam_id, &p.hall_id) }))
}

fn exam_halls_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamHallParams = parse(params)?;
    Ok(json!({ "removed": store.remove_exam_hall(&p.exam_id, &p.hall_id) }))
}

fn session_courses_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionListParams = parse(params)?;
    let rows: Vec<_> = store
        .session_courses()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "sessionCourses": rows }))
}

fn session_courses_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionCourseParams = parse(params)?;
    Ok(json!({ "added": store.add_session_course(&p.session_id, &p.course_id) }))
}

fn session_courses_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionCourseParams = parse(params)?;
    Ok(json!({ "removed": store.remove_session_course(&p.session_id, &p.course_id) }))
}

fn session_departments_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionListParams = parse(params)?;
    let rows: Vec<_> = store
        .session_departments()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "sessionDepartments": rows }))
}

fn session_departments_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionDepartmentParams = parse(params)?;
    Ok(json!({ "added": store.add_session_department(&p.session_id, &p.department_id) }))
}

fn session_departments_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionDepartmentParams = parse(params)?;
    Ok(json!({ "removed": store.remove_session_department(&p.session_id, &p.department_id) }))
}

fn session_halls_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionListParams = parse(params)?;
    let rows: Vec<_> = store
        .session_halls()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "sessionHalls": rows }))
}

fn session_halls_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionHallParams = parse(params)?;
    Ok(json!({ "added": store.add_session_hall(&p.session_id, &p.department_id, &p.hall_id) }))
}

fn session_halls_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionHallParams = parse(params)?;
    let removed = store.remove_session_hall(&p.session_id, &p.department_id, &p.hall_id);
    Ok(json!({ "removed": removed }))
}

fn print_statuses_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionListParams = parse(params)?;
    let rows: Vec<_> = store
        .print_statuses()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "printStatuses": rows }))
}

fn print_statuses_set(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: PrintStatusParams = parse(params)?;
    let status = store.set_print_status(&p.session_id, &p.department_id, &p.hall_id, p.is_printed);
    Ok(json!({ "printStatus": status }))
}

fn exam_courses_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamListParams = parse(params)?;
    let rows: Vec<_> = store
        .exam_courses()
        .iter()
        .filter(|r| matches(&p.exam_id, &r.exam_id))
        .collect();
    Ok(json!({ "examCourses": rows }))
}

fn exam_courses_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamCourseAddParams = parse(params)?;
    let row = store.add_exam_course(&p.exam_id, &p.course_id, p.question_count, p.duration);
    Ok(json!({ "examCourse": row }))
}

fn exam_courses_update(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let row: ExamCourse = parse(params)?;
    Ok(json!({ "examCourse": store.update_exam_course(&row) }))
}

fn exam_courses_confirm(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamCourseKey = parse(params)?;
    Ok(json!({ "examCourse": store.confirm_exam_course(&p.exam_id, &p.course_id) }))
}

fn exam_courses_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ExamCourseKey = parse(params)?;
    Ok(json!({ "removed": store.remove_exam_course(&p.exam_id, &p.course_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: StoreHandler = match req.method.as_str() {
        "examHalls.list" => exam_halls_list,
        "examHalls.add" => exam_halls_add,
        "examHalls.remove" => exam_halls_remove,
        "sessionCourses.list" => session_courses_list,
        "sessionCourses.add" => session_courses_add,
        "sessionCourses.remove" => session_courses_remove,
        "sessionDepartments.list" => session_departments_list,
        "sessionDepartments.add" => session_departments_add,
        "sessionDepartments.remove" => session_departments_remove,
        "sessionHalls.list" => session_halls_list,
        "sessionHalls.add" => session_halls_add,
        "sessionHalls.remove" => session_halls_remove,
        "printStatuses.list" => print_statuses_list,
        "printStatuses.set" => print_statuses_set,
        "examCourses.list" => exam_courses_list,
        "examCourses.add" => exam_courses_add,
        "examCourses.update" => exam_courses_update,
        "examCourses.confirm" => exam_courses_confirm,
        "examCourses.remove" => exam_courses_remove,
        _ => return None,
    };
    Some(with_store(state, req, handler))
}
