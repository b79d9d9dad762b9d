use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::qa::QaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EmptyCorpus,
    BackendUnavailable,
    SynthesisFailed,
    SynthesisTimeout,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::InvalidRequest(_) => Self::bad_request(err.to_string()),
            QaError::EmptyCorpus => Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
                .with_code(ErrorCode::EmptyCorpus),
            QaError::BackendUnavailable { .. } => {
                tracing::error!("Search backend error: {}", err);
                Self::bad_gateway(err.to_string()).with_code(ErrorCode::BackendUnavailable)
            }
            QaError::Synthesis(_) => {
                tracing::error!("Answer synthesis error: {}", err);
                Self::bad_gateway(err.to_string()).with_code(ErrorCode::SynthesisFailed)
            }
            QaError::SynthesisTimeout(_) => Self::new(StatusCode::GATEWAY_TIMEOUT, err.to_string())
                .with_code(ErrorCode::SynthesisTimeout),
            QaError::Source(_) | QaError::Configuration(_) => {
                tracing::error!("Question answering failed: {}", err);
                Self::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn qa_errors_map_to_statuses() {
        let cases = [
            (QaError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (QaError::EmptyCorpus, StatusCode::SERVICE_UNAVAILABLE),
            (QaError::semantic_unavailable("down"), StatusCode::BAD_GATEWAY),
            (QaError::Synthesis("quota".into()), StatusCode::BAD_GATEWAY),
            (
                QaError::SynthesisTimeout(Duration::from_secs(1)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (QaError::Source("io".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
