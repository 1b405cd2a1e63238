use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::model::leave_request::LeaveStatus;
use crate::models::Notice;

/// Every failure the web front end can surface to the user.
///
/// Nothing here is retried: the error is turned into an error notice and the
/// caller keeps whatever state it had before the failed operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    /// Rejected before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("leave request is already {from} and cannot become {to}")]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// The backend refused the request itself (400 with an error envelope).
    #[error("{0}")]
    Rejected(String),

    /// The backend answered with `estado = "error"` or a non-success status.
    #[error("{0}")]
    Backend(String),

    /// The backend could not be reached or answered something unreadable.
    #[error("backend unavailable: {0}")]
    Transport(String),
}

impl AppError {
    /// Reclassifies a backend rejection as a conflict, leaving other errors untouched.
    pub fn rejected_as_conflict(self) -> Self {
        match self {
            AppError::Rejected(msg) => AppError::Conflict(msg),
            other => other,
        }
    }

    /// Reclassifies a backend rejection as a missing resource.
    pub fn rejected_as_not_found(self) -> Self {
        match self {
            AppError::Rejected(msg) => AppError::NotFound(msg),
            other => other,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Backend(_) | AppError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Notice::error(self.to_string()))
    }
}
