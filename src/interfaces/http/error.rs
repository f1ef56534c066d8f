use crate::error::BookingError;
use crate::interfaces::http::dto::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

/// API error carrying the HTTP status and a stable machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: message.into(),
        }
    }

    fn internal() -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL",
            message: "internal error".to_string(),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let (status, code) = match &err {
            BookingError::InvalidDateRange(_) => (StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE"),
            BookingError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            BookingError::GatewayDeclined(_) => (StatusCode::BAD_REQUEST, "GATEWAY_DECLINED"),
            BookingError::DatesUnavailable => (StatusCode::CONFLICT, "DATES_UNAVAILABLE"),
            BookingError::DuplicateReference(_) => (StatusCode::CONFLICT, "DUPLICATE_REFERENCE"),
            BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            BookingError::GatewayUnreachable(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_UNREACHABLE"),
            BookingError::CsvError(_)
            | BookingError::IoError(_)
            | BookingError::StorageError(_) => {
                error!("internal error: {}", err);
                return ApiError::internal();
            }
        };
        ApiError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
