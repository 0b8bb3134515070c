use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagewright_core::PagewrightError;
use serde_json::json;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PagewrightError> for ApiError {
    fn from(err: PagewrightError) -> Self {
        match err {
            PagewrightError::Validation(msg) => ApiError::BadRequest(msg),
            PagewrightError::NotFound(_) => ApiError::NotFound("Page not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError = PagewrightError::Validation("find text must not be empty".into()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing: ApiError = PagewrightError::NotFound("about-us".into()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let storage: ApiError = PagewrightError::Storage("connection reset".into()).into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let response = ApiError::Internal("password authentication failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
