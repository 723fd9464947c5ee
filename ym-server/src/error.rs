//! Handler-facing error
//!
//! Anything a handler can hit ends up here so it can use `?` throughout.
//! Client-facing failures (`AppError`) go out unchanged; storage and reset
//! failures are logged and reach the client only as their generic code.

use axum::response::{IntoResponse, Response};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::ranking::ResetError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    /// Already logged by the engine with its trigger
    #[error(transparent)]
    Reset(#[from] ResetError),
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(err) => err,
            ServiceError::Reset(err) => err.into(),
            ServiceError::Db(err) => {
                tracing::error!(error = %err, "Query failed");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
