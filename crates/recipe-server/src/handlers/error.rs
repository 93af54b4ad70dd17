//! Translation of store and form errors into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipe_core::StoreError;
use thiserror::Error;

use crate::form::FormError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Form(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::BackendUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::Serialization(_) | StoreError::Storage(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Form(e) => e.to_string(),
            ApiError::Store(StoreError::NotFound(_)) => "Recipe not found".to_string(),
            ApiError::Store(StoreError::AlreadyExists(_)) => "Recipe already exists".to_string(),
            ApiError::Store(_) => "Internal server error".to_string(),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, message).into_response()
    }
}
