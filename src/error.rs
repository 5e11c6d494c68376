use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use thiserror::Error;

use crate::service::{attendance::AttendanceError, order::OrderError, salary::SalaryError};
use crate::store::StoreError;

/// Error type returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Request is well formed but violates a domain rule (double check-in and the like).
    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Store(e) => {
                tracing::error!(error = %e, "Storage failure");
                "Internal Server Error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Unexpected failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": message
        }))
    }
}

impl From<AttendanceError> for AppError {
    fn from(e: AttendanceError) -> Self {
        match e {
            AttendanceError::NoCheckInFound => AppError::NotFound(e.to_string()),
            AttendanceError::AlreadyCheckedIn | AttendanceError::AlreadyCheckedOut => {
                AppError::Conflict(e.to_string())
            }
        }
    }
}

impl From<SalaryError> for AppError {
    fn from(e: SalaryError) -> Self {
        match e {
            SalaryError::UserNotFound(_) => AppError::NotFound(e.to_string()),
            SalaryError::Overflow(_) => AppError::Internal(e.into()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::TableNotFound(_) | OrderError::MenuItemNotFound(_) | OrderError::LineNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            OrderError::EmptyOrder | OrderError::InvalidQuantity(_) => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Body extractor errors get the same JSON shape as handler errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("Invalid JSON body: {err}")).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::validation(format!("Invalid query: {err}")).into())
}
