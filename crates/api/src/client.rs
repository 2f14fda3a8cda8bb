use async_trait::async_trait;
use quiz_core::model::{ExamQuiz, ExamSubmission, QuizId, SubmissionResult};

use crate::error::ApiError;

/// Remote operations an exam session depends on.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Fetch a quiz prepared for taking, with nested questions and options.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the quiz does not exist, `ApiError::InvalidQuiz`
    /// if it cannot be taken, or a transport error.
    async fn fetch_exam_quiz(&self, quiz_id: QuizId) -> Result<ExamQuiz, ApiError>;

    /// Submit collected answers and return the graded result.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for malformed answers, or a transport error.
    async fn submit_exam(&self, submission: &ExamSubmission) -> Result<SubmissionResult, ApiError>;
}
