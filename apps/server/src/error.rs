use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use screener_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::Database(DatabaseError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::errors::ValidationError;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::Core(CoreError::Validation(ValidationError::MissingField(
            "symbol".to_string(),
        )));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let not_found = ApiError::Core(CoreError::Database(DatabaseError::NotFound(
            "stock 1".to_string(),
        )));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let db = ApiError::Core(CoreError::Database(DatabaseError::QueryFailed(
            "locked".to_string(),
        )));
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::BadRequest("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
