use crate::error::{ErrorKind, LectometroError};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Client sent something we refuse to evaluate.
    BadRequest(String),
    /// Audio payload could not be decoded; carries the underlying cause.
    Decode(String),
    /// Upload could not be read (malformed multipart, body too large).
    Upload { status: StatusCode, message: String },
    /// Server-side provisioning fault, such as a missing canonical text.
    Configuration(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            ApiError::Decode(detail) => write!(f, "Decode error: {detail}"),
            ApiError::Upload { status, message } => write!(f, "Upload error ({status}): {message}"),
            ApiError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Decode(detail) => (
                StatusCode::BAD_REQUEST,
                "Could not decode audio".to_string(),
                Some(detail),
            ),
            ApiError::Upload { status, message } => (status, message, None),
            ApiError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, detail })).into_response()
    }
}

impl From<LectometroError> for ApiError {
    fn from(err: LectometroError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput => ApiError::BadRequest(err.to_string()),
            ErrorKind::Decode => {
                ApiError::Decode(err.detail().map(str::to_string).unwrap_or_else(|| err.to_string()))
            }
            ErrorKind::MissingResource => ApiError::Configuration(err.to_string()),
            ErrorKind::Internal => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_form_is_bad_request() {
        let err: ApiError = LectometroError::InvalidForm {
            value: "3C".to_string(),
        }
        .into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid form '3C': expected 2A or 2B");
        assert!(json.get("detail").is_none());
    }

    #[tokio::test]
    async fn decode_error_carries_detail() {
        let err: ApiError = LectometroError::decode("Failed to parse WAV file: no RIFF tag").into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Could not decode audio");
        assert_eq!(json["detail"], "Failed to parse WAV file: no RIFF tag");
    }

    #[tokio::test]
    async fn missing_text_is_server_error() {
        let err: ApiError = LectometroError::MissingResource {
            resource: "texts/fluidez_2A.txt".to_string(),
        }
        .into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("fluidez_2A.txt"));
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let err: ApiError = LectometroError::Other("secret stack".to_string()).into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
    }
}
