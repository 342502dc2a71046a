use actix_web::{get, web, Responder, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

const DEFAULT_ORDER: &str = "DESC";
const DEFAULT_PAGE_SIZE: u32 = 100;

#[get("/token/{chain}/{address}/owners")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<(String, String)>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let (chain, address) = path.into_inner();

    let order = data.order.as_deref().unwrap_or(DEFAULT_ORDER);
    let limit = page_limit(data.limit);

    let owners = state
        .http
        .token_owners(&chain, &address, order, data.cursor.as_deref(), limit)
        .await?;

    Ok(web::Json(Response {
        success: true,
        data: owners,
    }))
}

/// Pagination is pass-through: a client-supplied limit goes upstream as-is
/// and upstream enforces its own maximum.
fn page_limit(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_PAGE_SIZE)
}

#[derive(Debug, Deserialize)]
pub struct Query {
    order: Option<String>,
    cursor: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub success: bool,
    pub data: Value,
}
