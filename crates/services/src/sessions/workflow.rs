use chrono::{DateTime, Utc};
use std::sync::Arc;

use api::{ApiError, ExamApi};
use quiz_core::model::{ExamSubmission, QuizId, SubmissionResult, UserId};
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::SessionError;

use super::controller::ExamSession;
use super::phase::{SubmitDecision, SubmitTrigger};

/// Result of a submit request driven through the service.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Unanswered questions remain; the session is now waiting for confirm or cancel.
    ConfirmationRequired { unanswered: usize },
    /// Another submission holds the guard, or the session is done.
    Suppressed,
    Completed(SubmissionResult),
}

/// Orchestrates quiz loading and exam submission against an [`ExamApi`].
///
/// Owns the time source and the API handle; the `ExamSession` itself stays synchronous.
#[derive(Clone)]
pub struct ExamSessionService {
    clock: Clock,
    api: Arc<dyn ExamApi>,
}

impl ExamSessionService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn ExamApi>) -> Self {
        Self { clock, api }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn ExamApi> {
        Arc::clone(&self.api)
    }

    /// Fetch the quiz and start a session with a full countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` when the quiz cannot be fetched or is not takeable.
    pub async fn start_session(
        &self,
        quiz_id: QuizId,
        user_id: UserId,
    ) -> Result<ExamSession, SessionError> {
        let quiz = self.api.fetch_exam_quiz(quiz_id).await.map_err(|err| {
            warn!(%quiz_id, error = %err, "quiz load failed");
            SessionError::Load(err)
        })?;

        info!(
            %quiz_id,
            %user_id,
            questions = quiz.question_count(),
            minutes = quiz.duration_minutes(),
            "exam session started"
        );
        Ok(ExamSession::new(user_id, quiz, self.clock.now()))
    }

    /// Send a payload produced by the session guard.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` if the API rejects the submission.
    pub async fn send(
        &self,
        submission: &ExamSubmission,
        trigger: SubmitTrigger,
    ) -> Result<SubmissionResult, SessionError> {
        send_submission(self.api.as_ref(), submission, trigger)
            .await
            .map_err(SessionError::Submit)
    }

    /// Request a submit and, if the guard is granted, send it and apply the outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` on API failure; the session is then `Failed`
    /// and may be retried.
    pub async fn submit(
        &self,
        session: &mut ExamSession,
        force: bool,
    ) -> Result<SubmitOutcome, SessionError> {
        let decision = session.request_submit(force, self.clock.now());
        self.drive(session, decision, SubmitTrigger::Manual).await
    }

    /// Accept the confirmation prompt and submit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` on API failure.
    pub async fn confirm_submit(
        &self,
        session: &mut ExamSession,
    ) -> Result<SubmitOutcome, SessionError> {
        let decision = session.confirm_submit(self.clock.now());
        self.drive(session, decision, SubmitTrigger::Manual).await
    }

    /// Submit because time ran out, skipping the confirmation prompt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` on API failure.
    pub async fn submit_on_timeout(
        &self,
        session: &mut ExamSession,
    ) -> Result<SubmitOutcome, SessionError> {
        let decision = session.perform_submit(SubmitTrigger::Timeout, self.clock.now());
        self.drive(session, decision, SubmitTrigger::Timeout).await
    }

    async fn drive(
        &self,
        session: &mut ExamSession,
        decision: SubmitDecision,
        trigger: SubmitTrigger,
    ) -> Result<SubmitOutcome, SessionError> {
        let submission = match decision {
            SubmitDecision::Ready(submission) => submission,
            SubmitDecision::ConfirmationRequired { unanswered } => {
                return Ok(SubmitOutcome::ConfirmationRequired { unanswered });
            }
            SubmitDecision::Suppressed => {
                debug!(phase = ?session.phase(), "submit suppressed");
                return Ok(SubmitOutcome::Suppressed);
            }
        };

        match send_submission(self.api.as_ref(), &submission, trigger).await {
            Ok(result) => {
                let _ = session.finish_submit(Ok(result.clone()));
                Ok(SubmitOutcome::Completed(result))
            }
            Err(err) => {
                let _ = session.finish_submit(Err(err.clone()));
                Err(SessionError::Submit(err))
            }
        }
    }
}

/// Send one submission and log the outcome.
pub(crate) async fn send_submission(
    api: &dyn ExamApi,
    submission: &ExamSubmission,
    trigger: SubmitTrigger,
) -> Result<SubmissionResult, ApiError> {
    debug!(
        quiz_id = %submission.quiz_id,
        answers = submission.answers.len(),
        time_spent = submission.time_spent_secs,
        ?trigger,
        "submitting exam"
    );
    match api.submit_exam(submission).await {
        Ok(result) => {
            info!(
                quiz_id = %submission.quiz_id,
                percentage = result.percentage,
                passed = result.passed,
                "exam submitted"
            );
            Ok(result)
        }
        Err(err) => {
            warn!(quiz_id = %submission.quiz_id, error = %err, ?trigger, "exam submission failed");
            Err(err)
        }
    }
}
