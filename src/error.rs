use jsonwebtoken::errors::Error as JwtError;
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use serde::Serialize;
use thiserror::Error;

use crate::model::candidate::CandidateId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("A token with this digest is already registered")]
    DuplicateToken,
    #[error("Voter {0} already has a token")]
    VoterAlreadyRegistered(String),
    #[error("Token is not registered")]
    UnknownToken,
    #[error("Token has already been used to vote")]
    TokenAlreadyUsed,
    #[error("Candidate {0} is not active")]
    CandidateNotActive(CandidateId),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Ledger unavailable, try again later: {0}")]
    Unavailable(String),
}

impl Error {
    /// Convenience constructor for an [`Error::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidInput(_) => Status::BadRequest,
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::DuplicateToken | Self::VoterAlreadyRegistered(_) | Self::TokenAlreadyUsed => {
                Status::Conflict
            }
            Self::UnknownToken | Self::NotFound(_) => Status::NotFound,
            Self::CandidateNotActive(_) => Status::UnprocessableEntity,
            Self::Unavailable(_) => Status::ServiceUnavailable,
        }
    }

    /// Whether the operation that produced this error may succeed if retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<JwtError> for Error {
    fn from(err: JwtError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// Seconds a client is asked to wait before retrying a retryable error.
pub const RETRY_AFTER_SECS: u32 = 1;

/// JSON body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let retryable = self.is_retryable();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        let mut response = (status, body).respond_to(req)?;
        if retryable {
            response.set_raw_header("Retry-After", RETRY_AFTER_SECS.to_string());
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use rocket::local::blocking::Client;

    use super::*;

    #[get("/busy")]
    fn busy() -> Result<()> {
        Err(Error::Unavailable("timed out waiting for the token vault".to_string()))
    }

    #[get("/used")]
    fn used() -> Result<()> {
        Err(Error::TokenAlreadyUsed)
    }

    #[test]
    fn only_unavailable_asks_for_retry() {
        let rocket = rocket::build().mount("/", routes![busy, used]);
        let client = Client::tracked(rocket).unwrap();

        let response = client.get("/busy").dispatch();
        assert_eq!(Status::ServiceUnavailable, response.status());
        assert_eq!(Some("1"), response.headers().get_one("Retry-After"));

        let response = client.get("/used").dispatch();
        assert_eq!(Status::Conflict, response.status());
        assert_eq!(None, response.headers().get_one("Retry-After"));
        let body: rocket::serde::json::Value = response.into_json().unwrap();
        assert_eq!(body["error"], "Token has already been used to vote");
    }

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(Error::Unavailable("lock".into()).is_retryable());
        assert!(!Error::TokenAlreadyUsed.is_retryable());
        assert!(!Error::CandidateNotActive(CandidateId(1)).is_retryable());
    }

    #[test]
    fn statuses() {
        assert_eq!(Error::DuplicateToken.status(), Status::Conflict);
        assert_eq!(
            Error::VoterAlreadyRegistered("V1".into()).status(),
            Status::Conflict
        );
        assert_eq!(Error::UnknownToken.status(), Status::NotFound);
        assert_eq!(
            Error::Unauthorized("expired".into()).status(),
            Status::Unauthorized
        );
        assert_eq!(
            Error::CandidateNotActive(CandidateId(3)).to_string(),
            "Candidate 3 is not active"
        );
    }
}
