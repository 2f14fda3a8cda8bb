mod countdown;
mod ids;
mod quiz;
mod result;
mod selection;
mod submission;

pub use countdown::{CountdownTick, RUNNING_LOW_SECS, SessionClock, format_mm_ss};
pub use ids::{AnswerId, ParseIdError, QuestionId, QuizId, SubmissionId, UserId};
pub use quiz::{ExamAnswerOption, ExamQuestion, ExamQuiz, QuizError};
pub use result::{QuestionResult, SubmissionResult};
pub use selection::AnswerSelection;
pub use submission::{ExamSubmission, SubmittedAnswer};
