mod controller;
mod phase;
mod progress;
mod runner;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::ExamSession;
pub use phase::{Interaction, SessionPhase, SubmitDecision, SubmitTrigger, TickOutcome};
pub use progress::{NavigatorEntry, QuestionStatus, SessionProgress};
pub use runner::{RunnerConfig, SessionCommand, SessionEvent, SessionHandle};
pub use view::{AnswerOptionView, CurrentQuestionView, SessionSnapshot};
pub use workflow::{ExamSessionService, SubmitOutcome};
