#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    AnswerOptionView, CurrentQuestionView, ExamSession, ExamSessionService, Interaction,
    NavigatorEntry, QuestionStatus, RunnerConfig, SessionCommand, SessionEvent, SessionHandle,
    SessionPhase, SessionProgress, SessionSnapshot, SubmitDecision, SubmitOutcome, SubmitTrigger,
    TickOutcome,
};
