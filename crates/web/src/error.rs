//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use learnhub_core::Error as CoreError;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Render(askama::Error),
    NotFound(String),
    Forbidden,
}

impl From<CoreError> for AppError {
    fn from(error: CoreError) -> Self {
        AppError::Core(error)
    }
}

impl From<askama::Error> for AppError {
    fn from(error: askama::Error) -> Self {
        AppError::Render(error)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Core(CoreError::InvalidImport(_)) | AppError::Core(CoreError::UnknownTheme(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Core(CoreError::NotFound(_)) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Core(CoreError::StorageUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Core(CoreError::ChatClosed) | AppError::Core(CoreError::ChatBusy) => {
                StatusCode::CONFLICT
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Core(_) | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Core(e) => e.to_string(),
            AppError::Render(e) => format!("Template error: {}", e),
            AppError::NotFound(what) => format!("Not found: {}", what),
            AppError::Forbidden => "Admin access required".to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{}", message);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", message);
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_is_service_unavailable() {
        let response =
            AppError::from(CoreError::StorageUnavailable("quota exceeded".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Core(CoreError::InvalidImport("bad".to_string())), StatusCode::BAD_REQUEST),
            (AppError::Core(CoreError::UnknownTheme("neon".to_string())), StatusCode::BAD_REQUEST),
            (AppError::Core(CoreError::NotFound("backup".to_string())), StatusCode::NOT_FOUND),
            (AppError::NotFound("course 9".to_string()), StatusCode::NOT_FOUND),
            (AppError::Core(CoreError::ChatClosed), StatusCode::CONFLICT),
            (AppError::Core(CoreError::ChatBusy), StatusCode::CONFLICT),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status);
        }
    }
}
