use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use serde_json::Value;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/token/solana/{tokenAddress}/metadata")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let token_address = path.into_inner();

    let data = state.http.solana_metadata(&token_address).await?;

    Ok(web::Json(Response {
        success: true,
        data,
    }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub success: bool,
    pub data: Value,
}
