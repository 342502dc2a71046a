use actix_web::{get, web, Responder, Result};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/search")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let query = data
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::MissingParameter("query".to_owned()))?;

    let data = state.http.search_tokens(query).await?;

    Ok(web::Json(data))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    query: Option<String>,
}
