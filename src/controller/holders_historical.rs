use actix_web::{get, web, Responder, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

const DEFAULT_TIME_FRAME: &str = "1d";
const DEFAULT_WINDOW_DAYS: i64 = 30;

#[get("/holders/{chain}/{address}/historical")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<(String, String)>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let (chain, address) = path.into_inner();

    let to = data.toDate.unwrap_or_else(Utc::now);
    let from = data
        .fromDate
        .unwrap_or_else(|| to - Duration::days(DEFAULT_WINDOW_DAYS));
    let time_frame = data.timeFrame.as_deref().unwrap_or(DEFAULT_TIME_FRAME);

    let mut history = state
        .http
        .holder_history(&chain, &address, from, to, time_frame)
        .await?;

    // upstream order is not guaranteed
    history.sort_ascending();

    Ok(web::Json(history))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    fromDate: Option<DateTime<Utc>>,
    toDate: Option<DateTime<Utc>>,
    timeFrame: Option<String>,
}
