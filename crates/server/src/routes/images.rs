use axum::{
    body::Bytes,
    http::header,
    response::{IntoResponse, Response},
};
use service::images::process_image;

use crate::errors::ApiError;

/// `POST /image`: convert a JPEG body into a PNG no larger than 256x256.
pub async fn handle_image_request(body: Bytes) -> Result<Response, ApiError> {
    let png = process_image(&body)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
