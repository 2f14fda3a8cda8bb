use thiserror::Error;

use crate::model::{ParseIdError, QuizError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
