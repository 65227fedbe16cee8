use serde::Deserialize;
use serde_json::json;

use super::{matches, parse, with_store, HandlerResult, StoreHandler};
use crate::ipc::types::{AppState, Request};
use crate::store::{ImportRow, Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationParams {
    exam_id: String,
    course_id: String,
    student_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportParams {
    exam_id: String,
    rows: Vec<ImportRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignParams {
    session_id: String,
    department_id: String,
    hall_id: String,
    student_id: String,
    #[serde(default)]
    seat_number: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeatParams {
    session_id: String,
    student_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HallParams {
    session_id: String,
    department_id: String,
    hall_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationListParams {
    #[serde(default)]
    exam_id: Option<String>,
    #[serde(default)]
    course_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentListParams {
    #[serde(default)]
    session_id: Option<String>,
}

fn registrations_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: RegistrationListParams = parse(params)?;
    let rows: Vec<_> = store
        .registrations()
        .iter()
        .filter(|r| matches(&p.exam_id, &r.exam_id) && matches(&p.course_id, &r.course_id))
        .collect();
    Ok(json!({ "registrations": rows }))
}

fn registrations_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: RegistrationParams = parse(params)?;
    Ok(json!({ "added": store.add_registration(&p.exam_id, &p.course_id, &p.student_id) }))
}

fn registrations_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: RegistrationParams = parse(params)?;
    Ok(json!({ "removed": store.remove_registration(&p.exam_id, &p.course_id, &p.student_id) }))
}

fn registrations_import(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ImportParams = parse(params)?;
    let summary = store.import_registrations(&p.exam_id, &p.rows);
    Ok(json!(summary))
}

fn hall_assignments_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: AssignmentListParams = parse(params)?;
    let rows: Vec<_> = store
        .hall_assignments()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "hallAssignments": rows }))
}

fn hall_assignments_assign(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: AssignParams = parse(params)?;
    let row = store.assign_student_to_hall(
        &p.session_id,
        &p.department_id,
        &p.hall_id,
        &p.student_id,
        p.seat_number,
    );
    Ok(json!({ "assignment": row }))
}

fn hall_assignments_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SeatParams = parse(params)?;
    Ok(json!({ "removed": store.remove_hall_assignment(&p.session_id, &p.student_id) }))
}

fn hall_assignments_clear(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: HallParams = parse(params)?;
    let cleared = store.clear_hall_assignments(&p.session_id, &p.department_id, &p.hall_id);
    Ok(json!({ "cleared": cleared }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: StoreHandler = match req.method.as_str() {
        "registrations.list" => registrations_list,
        "registrations.add" => registrations_add,
        "registrations.remove" => registrations_remove,
        "registrations.import" => registrations_import,
        "hallAssignments.list" => hall_assignments_list,
        "hallAssignments.assign" => hall_assignments_assign,
        "hallAssignments.remove" => hall_assignments_remove,
        "hallAssignments.clear" => hall_assignments_clear,
        _ => return None,
    };
    Some(with_store(state, req, handler))
}
