//! Error taxonomy for the interaction pipeline.
//!
//! Authentication and payload failures surface as an HTTP status with a plain
//! text body. Command failures never leave the router as errors; they are
//! rendered into an ordinary channel message reply.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Invalid request signature")]
    InvalidSignature,

    #[error("Invalid request timestamp")]
    InvalidTimestamp,

    #[error("Stale request timestamp")]
    StaleRequest,
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthenticationError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("Bad Request")]
    BadRequest,
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("dice count must be non-negative, got {0}")]
    InvalidArgument(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidOptions(String),

    #[error("Something went wrong while rolling: {0}")]
    Dice(#[from] DiceError),
}

impl CommandError {
    pub fn invalid_options(message: impl Into<String>) -> Self {
        CommandError::InvalidOptions(message.into())
    }
}
