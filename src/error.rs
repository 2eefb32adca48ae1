use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(&'static str),
    #[error("Peer {peer} unreachable - Reason: {reason}")]
    PeerUnreachable { peer: String, reason: String },
    #[error("Peer {peer} reported an invalid chain - Reason: {reason}")]
    InvalidChain { peer: String, reason: String },
    #[error("Mining was cancelled before a proof was found")]
    MiningCancelled,
    #[error("Invalid configuration for {0}: {1}")]
    Config(&'static str, String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Error::MiningCancelled => StatusCode::SERVICE_UNAVAILABLE,
            Error::PeerUnreachable { .. } | Error::InvalidChain { .. } => StatusCode::BAD_GATEWAY,
            Error::InvariantViolation(_) | Error::Config(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}
