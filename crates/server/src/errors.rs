use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::ServiceError;
use tracing::{error, warn};

pub const ERROR_METHOD_NOT_SUPPORTED: &str = "Only POST is supported";
pub const ERROR_PARSING_INPUT: &str = "Error parsing user input";
pub const ERROR_PROCESSING_INPUT: &str = "Error processing the users input";
pub const ERROR_ENCODING_INPUT: &str = "Error encoding the processed data";
pub const ERROR_DECODING_IMAGE: &str = "Error while extracting image";
pub const ERROR_ENCODING_IMAGE: &str = "Error while converting image";

/// Plain-text HTTP error. The body is a fixed client-facing message; the
/// underlying cause is only logged.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
    pub cause: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message, cause: None }
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, ERROR_METHOD_NOT_SUPPORTED)
    }

    fn with_cause(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let base = match &e {
            ServiceError::Parse(_) | ServiceError::Validation(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, ERROR_PARSING_INPUT)
            }
            ServiceError::Processing(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, ERROR_PROCESSING_INPUT)
            }
            ServiceError::Encoding(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, ERROR_ENCODING_INPUT)
            }
            ServiceError::ImageDecode(_) => ApiError::new(StatusCode::BAD_REQUEST, ERROR_DECODING_IMAGE),
            ServiceError::ImageEncode(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, ERROR_ENCODING_IMAGE)
            }
        };
        base.with_cause(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let cause = self.cause.as_deref().unwrap_or("");
        if self.status.is_server_error() {
            error!(status = %self.status, %cause, "request failed");
        } else {
            warn!(status = %self.status, %cause, "request rejected");
        }
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_and_message() {
        let cases = [
            (ServiceError::Parse("x".into()), StatusCode::BAD_REQUEST, ERROR_PARSING_INPUT),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST, ERROR_PARSING_INPUT),
            (ServiceError::Processing("x".into()), StatusCode::INTERNAL_SERVER_ERROR, ERROR_PROCESSING_INPUT),
            (ServiceError::Encoding("x".into()), StatusCode::INTERNAL_SERVER_ERROR, ERROR_ENCODING_INPUT),
            (ServiceError::ImageDecode("x".into()), StatusCode::BAD_REQUEST, ERROR_DECODING_IMAGE),
            (ServiceError::ImageEncode("x".into()), StatusCode::INTERNAL_SERVER_ERROR, ERROR_ENCODING_IMAGE),
        ];
        for (err, status, message) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
            assert!(api.cause.is_some());
        }
    }
}
