//! Task that owns one `ExamSession` and drives it from commands and a one-second ticker.
//!
//! All state changes happen on this task. Submissions run on spawned tasks and report
//! back through a channel, so the countdown and input keep being served while a request
//! is in flight.

use std::sync::Arc;
use std::time::Duration;

use api::{ApiError, ExamApi};
use quiz_core::model::{AnswerId, QuestionId, QuizId, SubmissionResult, UserId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::error::SessionError;

use super::controller::ExamSession;
use super::phase::{Interaction, SessionPhase, SubmitDecision, SubmitTrigger, TickOutcome};
use super::view::SessionSnapshot;
use super::workflow::{ExamSessionService, send_submission};

/// Runner tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Wall-clock period of one countdown second.
    pub tick: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

/// Input accepted by a running session.
#[derive(Debug)]
pub enum SessionCommand {
    SelectAnswer {
        question_id: QuestionId,
        answer_id: AnswerId,
    },
    Next,
    Previous,
    JumpTo(usize),
    Submit {
        force: bool,
    },
    ConfirmSubmit,
    CancelSubmit,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    /// Stop the runner. A submission already in flight is awaited and reported first.
    Close,
}

/// Notifications emitted by a running session, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Loaded(SessionSnapshot),
    /// The quiz could not be loaded; the runner stops after this.
    LoadFailed(SessionError),
    /// Selection, navigation or prompt state changed.
    Changed(SessionSnapshot),
    Tick {
        remaining_secs: u32,
        running_low: bool,
    },
    ConfirmationRequired {
        unanswered: usize,
    },
    Submitting {
        trigger: SubmitTrigger,
    },
    Completed(SubmissionResult),
    SubmitFailed {
        trigger: SubmitTrigger,
        error: ApiError,
    },
    Closed,
}

/// Handle to a session task. Dropping it stops the task.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Load `quiz_id` and run the session on a new task.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn spawn(
        service: ExamSessionService,
        quiz_id: QuizId,
        user_id: UserId,
        config: RunnerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(service, quiz_id, user_id, config, command_rx, events));
        (Self { commands, task }, event_rx)
    }

    pub fn select_answer(&self, question_id: QuestionId, answer_id: AnswerId) {
        self.send(SessionCommand::SelectAnswer {
            question_id,
            answer_id,
        });
    }

    pub fn next(&self) {
        self.send(SessionCommand::Next);
    }

    pub fn previous(&self) {
        self.send(SessionCommand::Previous);
    }

    pub fn jump_to(&self, index: usize) {
        self.send(SessionCommand::JumpTo(index));
    }

    pub fn submit(&self, force: bool) {
        self.send(SessionCommand::Submit { force });
    }

    pub fn confirm_submit(&self) {
        self.send(SessionCommand::ConfirmSubmit);
    }

    pub fn cancel_submit(&self) {
        self.send(SessionCommand::CancelSubmit);
    }

    pub fn close(&self) {
        self.send(SessionCommand::Close);
    }

    /// Current state of the session. Waits until the quiz is loaded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RunnerStopped` if the task has ended.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Snapshot(tx))
            .map_err(|_| SessionError::RunnerStopped)?;
        rx.await.map_err(|_| SessionError::RunnerStopped)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    fn send(&self, command: SessionCommand) {
        if let Err(err) = self.commands.send(command) {
            debug!(command = ?err.0, "session runner stopped; command dropped");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

struct Runner {
    session: ExamSession,
    service: ExamSessionService,
    api: Arc<dyn ExamApi>,
    events: mpsc::UnboundedSender<SessionEvent>,
    completions: mpsc::UnboundedSender<Result<SubmissionResult, ApiError>>,
    ticker: Option<Interval>,
    period: Duration,
}

async fn run(
    service: ExamSessionService,
    quiz_id: QuizId,
    user_id: UserId,
    config: RunnerConfig,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let session = match service.start_session(quiz_id, user_id).await {
        Ok(session) => session,
        Err(err) => {
            let _ = events.send(SessionEvent::LoadFailed(err));
            return;
        }
    };

    let (completions, mut completion_rx) = mpsc::unbounded_channel();
    let mut runner = Runner {
        api: service.api(),
        session,
        service,
        events,
        completions,
        ticker: None,
        period: config.tick,
    };
    runner.emit(SessionEvent::Loaded(runner.session.snapshot()));
    runner.sync_ticker();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                None | Some(SessionCommand::Close) => break,
                Some(command) => runner.handle(command),
            },
            Some(outcome) = completion_rx.recv() => runner.complete(outcome),
            () = next_tick(&mut runner.ticker) => runner.tick(),
        }
        runner.sync_ticker();
    }

    if matches!(runner.session.phase(), SessionPhase::Submitting { .. }) {
        warn!(
            quiz_id = %runner.session.quiz().id(),
            "closing with a submission in flight; awaiting its outcome"
        );
        if let Some(outcome) = completion_rx.recv().await {
            runner.complete(outcome);
        }
    }

    debug!(quiz_id = %runner.session.quiz().id(), "session runner closed");
    runner.emit(SessionEvent::Closed);
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

impl Runner {
    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn changed(&self) {
        self.emit(SessionEvent::Changed(self.session.snapshot()));
    }

    /// Arm the ticker while the countdown runs, drop it otherwise.
    fn sync_ticker(&mut self) {
        match (self.session.is_ticking(), self.ticker.is_some()) {
            (true, false) => {
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(interval);
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    fn handle(&mut self, command: SessionCommand) {
        let interaction = match command {
            SessionCommand::SelectAnswer {
                question_id,
                answer_id,
            } => self.session.select_answer(question_id, answer_id),
            SessionCommand::Next => self.session.go_next(),
            SessionCommand::Previous => self.session.go_previous(),
            SessionCommand::JumpTo(index) => self.session.jump_to(index),
            SessionCommand::CancelSubmit => self.session.cancel_submit(),
            SessionCommand::Submit { force } => {
                let decision = self.session.request_submit(force, self.service.now());
                self.dispatch(decision, SubmitTrigger::Manual);
                return;
            }
            SessionCommand::ConfirmSubmit => {
                let decision = self.session.confirm_submit(self.service.now());
                self.dispatch(decision, SubmitTrigger::Manual);
                return;
            }
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
                return;
            }
            SessionCommand::Close => return,
        };

        match interaction {
            Interaction::Applied => self.changed(),
            Interaction::Unchanged => {}
            Interaction::Rejected => {
                debug!(phase = ?self.session.phase(), "command rejected");
            }
        }
    }

    fn tick(&mut self) {
        match self.session.tick(self.service.now()) {
            TickOutcome::Idle => {}
            TickOutcome::Running { remaining_secs } => self.emit(SessionEvent::Tick {
                remaining_secs,
                running_low: self.session.countdown().is_running_low(),
            }),
            TickOutcome::Expired(decision) => {
                info!(quiz_id = %self.session.quiz().id(), "time is up");
                self.emit(SessionEvent::Tick {
                    remaining_secs: 0,
                    running_low: true,
                });
                self.dispatch(decision, SubmitTrigger::Timeout);
            }
        }
    }

    fn dispatch(&mut self, decision: SubmitDecision, trigger: SubmitTrigger) {
        match decision {
            SubmitDecision::Ready(submission) => {
                self.emit(SessionEvent::Submitting { trigger });
                self.changed();

                let api = Arc::clone(&self.api);
                let completions = self.completions.clone();
                tokio::spawn(async move {
                    let outcome = send_submission(api.as_ref(), &submission, trigger).await;
                    let _ = completions.send(outcome);
                });
            }
            SubmitDecision::ConfirmationRequired { unanswered } => {
                self.emit(SessionEvent::ConfirmationRequired { unanswered });
                self.changed();
            }
            SubmitDecision::Suppressed => {
                debug!(?trigger, phase = ?self.session.phase(), "submit suppressed");
            }
        }
    }

    fn complete(&mut self, outcome: Result<SubmissionResult, ApiError>) {
        if !self.session.finish_submit(outcome).is_applied() {
            warn!("submission outcome arrived with nothing in flight");
            return;
        }

        match self.session.phase() {
            SessionPhase::Completed => {
                if let Some(result) = self.session.result() {
                    self.emit(SessionEvent::Completed(result.clone()));
                }
            }
            SessionPhase::Failed { trigger, error } => self.emit(SessionEvent::SubmitFailed {
                trigger: *trigger,
                error: error.clone(),
            }),
            _ => {}
        }
        self.changed();
    }
}
