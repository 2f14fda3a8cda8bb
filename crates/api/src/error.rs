use quiz_core::model::QuizError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by exam API adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("rejected by server: {0}")]
    Validation(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("request failed with status {0}")]
    HttpStatus(StatusCode),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error(transparent)]
    InvalidQuiz(#[from] QuizError),
}

impl ApiError {
    /// Maps a non-success status and its body to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let body = body.trim();
                if body.is_empty() {
                    Self::Validation(status.to_string())
                } else {
                    Self::Validation(body.to_owned())
                }
            }
            other => Self::HttpStatus(other),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
