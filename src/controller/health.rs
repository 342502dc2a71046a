use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[get("/health")]
async fn index() -> Result<impl Responder, Error> {
    Ok(web::Json(Response { status: "ok" }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response<'a> {
    pub status: &'a str,
}
