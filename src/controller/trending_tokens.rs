use actix_web::{get, web, Responder, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::Token,
};

#[get("/trending-tokens")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let tokens = state.http.trending(data.chain.as_deref()).await?;

    Ok(web::Json(Response {
        success: true,
        data: tokens,
    }))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    chain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub success: bool,
    pub data: Vec<Token>,
}
