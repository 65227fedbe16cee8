use serde::Deserialize;
use serde_json::json;

use super::{parse, with_store, HandlerResult, StoreHandler};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionParams {
    session_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HallListParams {
    session_id: String,
    department_id: String,
    hall_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentParams {
    department_id: String,
}

fn session_summary(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: SessionParams = parse(params)?;
    Ok(json!({ "summary": store.session_summary(&p.session_id) }))
}

fn hall_list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: HallListParams = parse(params)?;
    Ok(json!({ "hallList": store.hall_list(&p.session_id, &p.department_id, &p.hall_id) }))
}

fn department_courses(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: DepartmentParams = parse(params)?;
    Ok(json!({ "courses": store.department_courses(&p.department_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: StoreHandler = match req.method.as_str() {
        "views.sessionSummary" => session_summary,
        "views.hallList" => hall_list,
        "views.departmentCourses" => department_courses,
        _ => return None,
    };
    Some(with_store(state, req, handler))
}
