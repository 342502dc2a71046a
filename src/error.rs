use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::Error as ANYHOW_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::{json, Error as JSON_ERROR};
use std::{env::VarError, io::Error as IO_ERROR, num::ParseIntError};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    REQWEST(#[from] REQWEST_ERROR),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Upstream responded with status {status}")]
    Upstream { status: u16, message: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Error::Upstream { status, message } => json!({
                "success": false,
                "message": self.to_string(),
                "statusCode": status,
                "error": message,
            }),
            _ => json!({
                "success": false,
                "message": self.to_string(),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
