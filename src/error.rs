//! Errors raised at the service boundary. The distance core itself cannot fail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use std::io;

use crate::units::UnknownUnit;

/// A request parameter that could not be bound.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("Missing '{0}' parameter")]
    Missing(&'static str),
    #[error("Invalid decimal for '{name}': '{value}'")]
    InvalidDecimal { name: &'static str, value: String },
    #[error(transparent)]
    UnknownUnit(#[from] UnknownUnit),
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),
}

impl ParamError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

impl IntoResponse for ParamError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self, "rejected request");
        let body = ApiErrorBody {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failures while starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("cannot bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
