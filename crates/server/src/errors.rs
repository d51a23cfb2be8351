use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": title, "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.title, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let (status, title) = match &e {
            ServiceError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Invalid Argument"),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            ServiceError::Dispatch(_) => (StatusCode::BAD_GATEWAY, "Notification Failed"),
            ServiceError::Db(_) | ServiceError::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error"),
        };
        if status.is_server_error() {
            error!(code = e.code(), err = %e, "request failed");
        } else {
            warn!(code = e.code(), err = %e, "request rejected");
        }
        Self::new(status, title, Some(e.to_string()))
    }
}

// Extractor rejections keep axum's status but use the JSON error body.
impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        warn!(status = %r.status(), err = %r.body_text(), "request body rejected");
        Self::new(r.status(), "Invalid Request Body", Some(r.body_text()))
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self {
        warn!(status = %r.status(), err = %r.body_text(), "query rejected");
        Self::new(r.status(), "Invalid Query", Some(r.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        warn!(status = %r.status(), err = %r.body_text(), "path rejected");
        Self::new(r.status(), "Invalid Path", Some(r.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::notification::DispatchError;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::Dispatch(DispatchError::Disabled), StatusCode::BAD_GATEWAY),
            (ServiceError::Db("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(JsonApiError::from(err).status, expected);
        }
    }

    #[test]
    fn detail_carries_service_message() {
        let e = JsonApiError::from(ServiceError::NotFound("could not find promotion with id 3".into()));
        assert_eq!(e.title, "Not Found");
        assert!(e.detail.unwrap().contains("id 3"));
    }
}
