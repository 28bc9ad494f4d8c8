use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::locations::stores::StoreError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error occurred".to_string(),
                    None,
                )
            }
            AppError::InvalidBounds(ref msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid bounds".to_string(),
                Some(vec![msg.clone()]),
            ),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
