//! HTTP handlers grouped by resource

pub mod credentials;
pub mod keywords;
pub mod logs;
pub mod status;

use axum::{http::StatusCode, response::Json};
use uuid::Uuid;

use crate::error::LookoutError;
use crate::server::types::{ApiError, BaseResponse};

/// Error half of every handler result
pub type ErrorResponse = (StatusCode, Json<BaseResponse<()>>);

pub fn status_for(error: &LookoutError) -> StatusCode {
  match error {
    LookoutError::MissingMetadata { .. } | LookoutError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
    LookoutError::DuplicateKeyword { .. } => StatusCode::CONFLICT,
    LookoutError::ExternalAuth { .. } | LookoutError::ExternalFetch { .. } => StatusCode::BAD_GATEWAY,
    LookoutError::Storage(_) | LookoutError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

pub fn error_response(error: &LookoutError, transaction_id: Uuid) -> ErrorResponse {
  reject(status_for(error), error.key(), &error.to_string(), transaction_id)
}

pub fn reject(status: StatusCode, key: &str, message: &str, transaction_id: Uuid) -> ErrorResponse {
  let error = ApiError::new(key, message);
  (status, Json(BaseResponse::<()>::error(vec![error], transaction_id)))
}
