use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::trends::trending_holder_changes,
};

#[get("/trends")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let trends = trending_holder_changes(state.get_ref()).await?;

    Ok(web::Json(trends))
}
