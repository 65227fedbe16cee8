pub mod attendants;
pub mod backup;
pub mod core;
pub mod entities;
pub mod exams;
pub mod questions;
pub mod students;
pub mod views;

use serde::de::DeserializeOwned;

use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

type HandlerResult = Result<serde_json::Value, HandlerErr>;
type StoreHandler = fn(&mut Store, &serde_json::Value) -> HandlerResult;

/// An absent filter matches every row.
fn matches(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().map_or(true, |f| f == value)
}

fn parse<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T, HandlerErr> {
    serde_json::from_value(params.clone()).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

fn with_store(state: &mut AppState, req: &Request, handler: StoreHandler) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match handler(store, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}
