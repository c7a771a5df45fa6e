use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use service::users::{encode_outputs, UsersOutcome};
use tracing::debug;

use crate::errors::ApiError;
use crate::state::AppState;

/// `POST /user`: transform a JSON array of user records.
///
/// An empty body answers `204`. Bodies already transformed once are served
/// from the shared cache without re-parsing.
pub async fn handle_user_request(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let outputs = match state.users.handle(&body)? {
        UsersOutcome::Empty => return Ok(StatusCode::NO_CONTENT.into_response()),
        UsersOutcome::Transformed { outputs, cached } => {
            debug!(cached, records = outputs.len(), "user request transformed");
            outputs
        }
    };

    let json = encode_outputs(&outputs)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}
