use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::api_structs::ApiErrorResponse;
use crate::moderation::{ModerationError, StoreError};

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Store(StoreError),
    Moderation(ModerationError),
    Session(String),
    Unauthorized,
    PermissionDenied(String),
    Validation(Vec<String>),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Store(e) => write!(f, "{e}"),
            AppError::Moderation(e) => write!(f, "{e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Unauthorized => write!(f, "Sign in required"),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::NoMatch(_) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn store_body(e: &StoreError) -> ApiErrorResponse {
    match e {
        StoreError::Rejected(failure) => ApiErrorResponse {
            error: failure.message.clone(),
            details: failure.details.clone(),
            code: failure.code.clone(),
            hint: failure.hint.clone(),
        },
        other => ApiErrorResponse::new(other.to_string()),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(e) => store_status(e),
            AppError::Moderation(ModerationError::InFlight(_)) => StatusCode::CONFLICT,
            AppError::Moderation(ModerationError::NotQueued(_)) => StatusCode::NOT_FOUND,
            AppError::Moderation(ModerationError::Store(e)) => store_status(e),
            AppError::Db(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(errors) => ApiErrorResponse {
                details: Some(errors.join("; ")),
                ..ApiErrorResponse::new("Validation failed")
            },
            AppError::Store(e) | AppError::Moderation(ModerationError::Store(e)) => {
                log::warn!("{self}");
                store_body(e)
            }
            AppError::Db(_) | AppError::Session(_) => {
                log::error!("{self}");
                ApiErrorResponse::new("Internal Server Error")
            }
            other => ApiErrorResponse::new(other.to_string()),
        };
        HttpResponse::build(status).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<ModerationError> for AppError {
    fn from(e: ModerationError) -> Self {
        AppError::Moderation(e)
    }
}
