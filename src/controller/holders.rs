use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/holders/{chain}/{address}")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, Error> {
    let (chain, address) = path.into_inner();

    let stats = state.http.holder_stats(&chain, &address).await?;

    Ok(web::Json(stats))
}
