use serde::Deserialize;
use serde_json::json;

use super::{matches, parse, with_store, HandlerResult, StoreHandler};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignParams {
    exam_id: String,
    course_id: String,
    question_ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveParams {
    exam_id: String,
    course_id: String,
    question_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupParams {
    exam_id: String,
    course_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    #[serde(default)]
    exam_id: Option<String>,
    #[serde(default)]
    course_id: Option<String>,
}

fn assign(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: AssignParams = parse(params)?;
    let added = store.assign_questions_to_exam(&p.exam_id, &p.course_id, &p.question_ids);
    let rows = store.exam_course_question_set(&p.exam_id, &p.course_id);
    Ok(json!({ "added": added, "questions": rows }))
}

fn remove(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: RemoveParams = parse(params)?;
    let removed = store.remove_question_from_exam(&p.exam_id, &p.course_id, &p.question_id);
    Ok(json!({ "removed": removed }))
}

fn recalculate(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: GroupParams = parse(params)?;
    let points = store.recalculate_points(&p.exam_id, &p.course_id);
    Ok(json!({ "points": points }))
}

fn list(store: &mut Store, params: &serde_json::Value) -> HandlerResult {
    let p: ListParams = parse(params)?;
    let rows: Vec<_> = store
        .exam_course_questions()
        .iter()
        .filter(|r| matches(&p.exam_id, &r.exam_id) && matches(&p.course_id, &r.course_id))
        .collect();
    Ok(json!({ "questions": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: StoreHandler = match req.method.as_str() {
        "examCourseQuestions.assign" => assign,
        "examCourseQuestions.remove" => remove,
        "examCourseQuestions.recalculate" => recalculate,
        "examCourseQuestions.list" => list,
        _ => return None,
    };
    Some(with_store(state, req, handler))
}
