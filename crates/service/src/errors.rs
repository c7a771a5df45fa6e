use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("processing error: {0}")]
    Processing(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("image decode error: {0}")]
    ImageDecode(String),
    #[error("image encode error: {0}")]
    ImageEncode(String),
}

impl ServiceError {
    pub fn missing_fields(entity: &str) -> Self {
        Self::Validation(format!("the {} entity is missing required fields", entity))
    }
}
