use serde::Deserialize;
use serde_json::json;

use super::{matches, parse, with_store, HandlerResult, StoreHandler};
use crate::ipc::error::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::store::{AssignmentStatus, DutySlot, Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotParams {
    session_id: String,
    building_id: String,
    role_name: String,
    /// Empty clears the slot.
    #[serde(default)]
    attendant_id: String,
    #[serde(default)]
    hall_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RespondParams {
    id: String,
    status: AssignmentStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRequestParams {
    attendant_id: String,
    session_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveParams {
    id: String,
    approve: bool,
    #[serde(default)]
    building_id: Option<String>,
    #[serde(default)]
    role_name: Option<String>,
    #[serde(default)]
    hall_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    #[serde(default)]
    session_id: Option<String>,
}

fn assignments_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ListParams = parse(params)?;
    let rows: Vec<_> = store
        .attendant_assignments()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "assignments": rows }))
}

fn assignments_update(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SlotParams = parse(params)?;
    let row = store.update_attendant_assignment(
        &p.session_id,
        &p.building_id,
        &p.role_name,
        &p.attendant_id,
        p.hall_id.as_deref(),
    );
    Ok(json!({ "assignment": row }))
}

fn assignments_respond(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: RespondParams = parse(params)?;
    if p.status == AssignmentStatus::Assigned {
        return Err(HandlerErr::bad_params("status must be ACCEPTED or REJECTED"));
    }
    Ok(json!({ "updated": store.respond_attendant_assignment(&p.id, p.status) }))
}

fn task_requests_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ListParams = parse(params)?;
    let rows: Vec<_> = store
        .task_requests()
        .iter()
        .filter(|r| matches(&p.session_id, &r.session_id))
        .collect();
    Ok(json!({ "taskRequests": rows }))
}

fn task_requests_add(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: TaskRequestParams = parse(params)?;
    Ok(json!({ "added": store.add_task_request(&p.attendant_id, &p.session_id) }))
}

fn task_requests_remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: TaskRequestParams = parse(params)?;
    Ok(json!({ "removed": store.remove_task_request(&p.attendant_id, &p.session_id) }))
}

fn task_requests_resolve(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ResolveParams = parse(params)?;
    let slot = match (p.building_id, p.role_name) {
        (Some(building_id), Some(role_name)) => Some(DutySlot {
            building_id,
            role_name,
            hall_id: p.hall_id,
        }),
        _ => None,
    };
    Ok(json!({ "resolved": store.resolve_task_request(&p.id, p.approve, slot) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: StoreHandler = match req.method.as_str() {
        "attendantAssignments.list" => assignments_list,
        "attendantAssignments.update" => assignments_update,
        "attendantAssignments.respond" => assignments_respond,
        "taskRequests.list" => task_requests_list,
        "taskRequests.add" => task_requests_add,
        "taskRequests.remove" => task_requests_remove,
        "taskRequests.resolve" => task_requests_resolve,
        _ => return None,
    };
    Some(with_store(state, req, handler))
}
