use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::facility::LoggerLevel;
use crate::level::validate_logger_name;

#[derive(Debug, Serialize, Deserialize)]
pub struct SpecBody {
    pub spec: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn bad_request(error: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn get_spec(State(state): State<AdminState>) -> Json<SpecBody> {
    Json(SpecBody {
        spec: state.logging.spec(),
    })
}

pub async fn put_spec(State(state): State<AdminState>, Json(body): Json<SpecBody>) -> Response {
    match state.logging.activate_spec(&body.spec) {
        Ok(()) => {
            tracing::info!(spec = %state.logging.spec(), "Level spec activated via admin API");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected level spec");
            bad_request(e)
        }
    }
}

pub async fn get_loggers(State(state): State<AdminState>) -> Json<Vec<LoggerLevel>> {
    Json(state.logging.loggers())
}

/// Effective level for any valid name; does not register it.
pub async fn get_logger(State(state): State<AdminState>, Path(name): Path<String>) -> Response {
    match validate_logger_name(&name) {
        Ok(_) => Json(LoggerLevel {
            level: state.logging.level(&name),
            name,
        })
        .into_response(),
        Err(e) => bad_request(e),
    }
}
