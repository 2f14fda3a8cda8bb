use chrono::{DateTime, Utc};
use std::fmt;

use api::ApiError;
use quiz_core::model::{
    AnswerId, AnswerSelection, CountdownTick, ExamQuiz, ExamSubmission, QuestionId, SessionClock,
    SubmissionResult, UserId,
};
use quiz_core::time::elapsed_secs;

use super::phase::{Interaction, SessionPhase, SubmitDecision, SubmitTrigger, TickOutcome};
use super::progress::{NavigatorEntry, QuestionStatus, SessionProgress};
use super::view::{CurrentQuestionView, SessionSnapshot};

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one learner's timed attempt at a quiz.
///
/// Every method is synchronous and runs to completion; the only suspending step, the
/// network submit, happens outside between [`ExamSession::perform_submit`] and
/// [`ExamSession::finish_submit`]. The `has_submitted` guard is taken inside
/// `perform_submit`, before any payload leaves the session, so a second trigger
/// (manual click racing the countdown) sees it and is suppressed.
pub struct ExamSession {
    user_id: UserId,
    quiz: ExamQuiz,
    current: usize,
    selection: AnswerSelection,
    countdown: SessionClock,
    phase: SessionPhase,
    has_submitted: bool,
    expiry_fired: bool,
    attempts: u32,
    started_at: DateTime<Utc>,
    result: Option<SubmissionResult>,
}

impl ExamSession {
    /// Start a session on a loaded quiz.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    #[must_use]
    pub fn new(user_id: UserId, quiz: ExamQuiz, started_at: DateTime<Utc>) -> Self {
        let countdown = SessionClock::from_minutes(quiz.duration_minutes());
        Self {
            user_id,
            quiz,
            current: 0,
            selection: AnswerSelection::new(),
            countdown,
            phase: SessionPhase::InProgress,
            has_submitted: false,
            expiry_fired: false,
            attempts: 0,
            started_at,
            result: None,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn quiz(&self) -> &ExamQuiz {
        &self.quiz
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn selection(&self) -> &AnswerSelection {
        &self.selection
    }

    #[must_use]
    pub fn countdown(&self) -> &SessionClock {
        &self.countdown
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Number of submissions sent so far, including failed ones.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn has_submitted(&self) -> bool {
        self.has_submitted
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selection.answered_count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.quiz
            .question_count()
            .saturating_sub(self.answered_count())
    }

    /// The countdown should be running: not submitting, not done, time left.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::InProgress
                | SessionPhase::ConfirmationPending { .. }
                | SessionPhase::Failed { .. }
        ) && !self.countdown.is_expired()
    }

    /// Gate for learner input. Leaving `Failed` through any accepted input is the
    /// Failed → `InProgress` transition.
    fn begin_input(&mut self) -> bool {
        if !self.phase.accepts_input() {
            return false;
        }
        if matches!(self.phase, SessionPhase::Failed { .. }) {
            self.phase = SessionPhase::InProgress;
        }
        true
    }

    //
    // ─── SELECTION ─────────────────────────────────────────────────────────────
    //

    /// Record `answer_id` as the only selection for `question_id`.
    pub fn select_answer(&mut self, question_id: QuestionId, answer_id: AnswerId) -> Interaction {
        if self.quiz.find_question(question_id).is_none() || !self.begin_input() {
            return Interaction::Rejected;
        }
        if self.selection.select_single(question_id, answer_id) {
            Interaction::Applied
        } else {
            Interaction::Unchanged
        }
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    pub fn go_next(&mut self) -> Interaction {
        let last = self.quiz.question_count() - 1;
        if self.current >= last {
            return self.move_to(self.current);
        }
        self.move_to(self.current + 1)
    }

    pub fn go_previous(&mut self) -> Interaction {
        self.move_to(self.current.saturating_sub(1))
    }

    /// Jump straight to a question, as from the navigator.
    pub fn jump_to(&mut self, index: usize) -> Interaction {
        if index >= self.quiz.question_count() {
            return Interaction::Rejected;
        }
        self.move_to(index)
    }

    fn move_to(&mut self, index: usize) -> Interaction {
        if !self.begin_input() {
            return Interaction::Rejected;
        }
        if index == self.current {
            return Interaction::Unchanged;
        }
        self.current = index;
        Interaction::Applied
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Learner asked to submit.
    ///
    /// Without `force`, unanswered questions open the confirmation prompt instead.
    /// With `force` (or while the prompt is open and `force` is given), submits.
    pub fn request_submit(&mut self, force: bool, now: DateTime<Utc>) -> SubmitDecision {
        match self.phase {
            SessionPhase::ConfirmationPending { unanswered } => {
                if force {
                    self.perform_submit(SubmitTrigger::Manual, now)
                } else {
                    SubmitDecision::ConfirmationRequired { unanswered }
                }
            }
            _ => {
                if !self.begin_input() {
                    return SubmitDecision::Suppressed;
                }
                let unanswered = self.unanswered_count();
                if unanswered > 0 && !force {
                    self.phase = SessionPhase::ConfirmationPending { unanswered };
                    return SubmitDecision::ConfirmationRequired { unanswered };
                }
                self.perform_submit(SubmitTrigger::Manual, now)
            }
        }
    }

    /// Learner accepted the confirmation prompt.
    pub fn confirm_submit(&mut self, now: DateTime<Utc>) -> SubmitDecision {
        if !matches!(self.phase, SessionPhase::ConfirmationPending { .. }) {
            return SubmitDecision::Suppressed;
        }
        self.perform_submit(SubmitTrigger::Manual, now)
    }

    /// Learner dismissed the confirmation prompt.
    pub fn cancel_submit(&mut self) -> Interaction {
        if !matches!(self.phase, SessionPhase::ConfirmationPending { .. }) {
            return Interaction::Rejected;
        }
        self.phase = SessionPhase::InProgress;
        Interaction::Applied
    }

    /// Take the submission guard and build the payload. First caller wins.
    ///
    /// Bypasses the unanswered-questions prompt; callers decide whether that is wanted.
    pub fn perform_submit(&mut self, trigger: SubmitTrigger, now: DateTime<Utc>) -> SubmitDecision {
        if self.has_submitted
            || matches!(
                self.phase,
                SessionPhase::Submitting { .. } | SessionPhase::Completed
            )
        {
            return SubmitDecision::Suppressed;
        }

        self.has_submitted = true;
        self.attempts = self.attempts.saturating_add(1);
        self.phase = SessionPhase::Submitting { trigger };

        SubmitDecision::Ready(ExamSubmission::from_selection(
            self.user_id,
            &self.quiz,
            &self.selection,
            elapsed_secs(self.started_at, now),
        ))
    }

    /// Apply the outcome of the in-flight submission.
    ///
    /// Success is terminal. Failure releases the guard so one more trigger can retry.
    /// Outcomes arriving when nothing is in flight are rejected.
    pub fn finish_submit(&mut self, outcome: Result<SubmissionResult, ApiError>) -> Interaction {
        let SessionPhase::Submitting { trigger } = self.phase else {
            return Interaction::Rejected;
        };

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = SessionPhase::Completed;
            }
            Err(error) => {
                self.has_submitted = false;
                self.phase = SessionPhase::Failed { trigger, error };
            }
        }
        Interaction::Applied
    }

    //
    // ─── COUNTDOWN ─────────────────────────────────────────────────────────────
    //

    /// Advance the countdown by one second.
    ///
    /// The tick that reaches zero forces a submit, once per session. A failed timeout
    /// submission is not retried from here.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.is_ticking() {
            return TickOutcome::Idle;
        }

        match self.countdown.tick() {
            CountdownTick::Running { remaining_secs } => TickOutcome::Running { remaining_secs },
            CountdownTick::Expired | CountdownTick::Exhausted => {
                if self.expiry_fired {
                    return TickOutcome::Idle;
                }
                self.expiry_fired = true;
                TickOutcome::Expired(self.perform_submit(SubmitTrigger::Timeout, now))
            }
        }
    }

    //
    // ─── VIEWS ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(
            self.answered_count(),
            self.quiz.question_count(),
            self.current,
            &self.countdown,
        )
    }

    #[must_use]
    pub fn navigator(&self) -> Vec<NavigatorEntry> {
        self.quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answered = self.selection.is_answered(question.id());
                let status = if index == self.current {
                    QuestionStatus::Current
                } else if answered {
                    QuestionStatus::Answered
                } else {
                    QuestionStatus::Unanswered
                };
                NavigatorEntry {
                    index,
                    question_id: question.id(),
                    status,
                    answered,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn current_question(&self) -> CurrentQuestionView {
        CurrentQuestionView::new(&self.quiz, self.current, &self.selection)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            quiz_title: self.quiz.title().to_owned(),
            phase: self.phase.clone(),
            progress: self.progress(),
            current: self.current_question(),
            navigator: self.navigator(),
            result: self.result.clone(),
        }
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("quiz_id", &self.quiz.id())
            .field("questions", &self.quiz.question_count())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("remaining_secs", &self.countdown.remaining_secs())
            .field("phase", &self.phase)
            .field("has_submitted", &self.has_submitted)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{ExamAnswerOption, ExamQuestion, QuizId, SubmissionId};
    use quiz_core::time::fixed_now;

    fn build_quiz(questions: usize, minutes: u32) -> ExamQuiz {
        let questions = (0..questions)
            .map(|i| {
                ExamQuestion::new(
                    QuestionId::random(),
                    format!("Question {i}"),
                    vec![
                        ExamAnswerOption::new(AnswerId::random(), "A"),
                        ExamAnswerOption::new(AnswerId::random(), "B"),
                        ExamAnswerOption::new(AnswerId::random(), "C"),
                    ],
                )
            })
            .collect();
        ExamQuiz::new(QuizId::random(), "Test Quiz", minutes, questions).unwrap()
    }

    fn build_session(questions: usize, minutes: u32) -> ExamSession {
        ExamSession::new(UserId::random(), build_quiz(questions, minutes), fixed_now())
    }

    fn answer(session: &mut ExamSession, index: usize, option: usize) {
        let question = &session.quiz().questions()[index];
        let (q, a) = (question.id(), question.answers()[option].id());
        assert_eq!(session.select_answer(q, a), Interaction::Applied);
    }

    fn result() -> SubmissionResult {
        SubmissionResult {
            submission_id: SubmissionId::random(),
            quiz_title: "Test Quiz".into(),
            total_questions: 2,
            correct_answers: 1,
            total_score: 2.0,
            earned_score: 1.0,
            percentage: 50.0,
            passed: true,
            submitted_at: fixed_now(),
            question_results: Vec::new(),
        }
    }

    fn expect_ready(decision: SubmitDecision) -> ExamSubmission {
        match decision {
            SubmitDecision::Ready(payload) => payload,
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn new_session_starts_in_progress_with_full_clock() {
        let session = build_session(3, 2);
        assert_eq!(session.phase(), &SessionPhase::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.remaining_secs(), 120);
        assert!(session.is_ticking());
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn selection_overwrites_previous_answer() {
        let mut session = build_session(2, 1);
        answer(&mut session, 0, 0);
        answer(&mut session, 0, 2);
        answer(&mut session, 0, 1);

        let question = &session.quiz().questions()[0];
        let selected = session.selection().selected(question.id()).unwrap();
        assert_eq!(selected.len(), 1);
        assert!(selected.contains(&question.answers()[1].id()));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn selecting_unknown_question_is_rejected() {
        let mut session = build_session(1, 1);
        assert_eq!(
            session.select_answer(QuestionId::random(), AnswerId::random()),
            Interaction::Rejected
        );
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn navigation_is_clamped_to_question_range() {
        let mut session = build_session(3, 1);
        assert_eq!(session.go_previous(), Interaction::Unchanged);
        assert_eq!(session.current_index(), 0);

        for _ in 0..5 {
            let _ = session.go_next();
            assert!(session.current_index() <= 2);
        }
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.go_next(), Interaction::Unchanged);

        assert_eq!(session.jump_to(3), Interaction::Rejected);
        assert_eq!(session.jump_to(1), Interaction::Applied);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.go_previous(), Interaction::Applied);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn single_question_quiz_never_moves() {
        let mut session = build_session(1, 1);
        assert_eq!(session.go_next(), Interaction::Unchanged);
        assert_eq!(session.go_previous(), Interaction::Unchanged);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn submit_with_unanswered_requires_confirmation() {
        let mut session = build_session(3, 1);
        answer(&mut session, 0, 0);

        assert_eq!(
            session.request_submit(false, fixed_now()),
            SubmitDecision::ConfirmationRequired { unanswered: 2 }
        );
        assert_eq!(
            session.phase(),
            &SessionPhase::ConfirmationPending { unanswered: 2 }
        );
        assert!(!session.has_submitted());
    }

    #[test]
    fn prompt_blocks_navigation_and_selection_until_cancelled() {
        let mut session = build_session(2, 1);
        let _ = session.request_submit(false, fixed_now());

        assert_eq!(session.go_next(), Interaction::Rejected);
        assert_eq!(session.jump_to(1), Interaction::Rejected);
        let question = &session.quiz().questions()[0];
        let (q, a) = (question.id(), question.answers()[0].id());
        assert_eq!(session.select_answer(q, a), Interaction::Rejected);

        assert_eq!(session.cancel_submit(), Interaction::Applied);
        assert_eq!(session.phase(), &SessionPhase::InProgress);
        assert_eq!(session.go_next(), Interaction::Applied);
        assert_eq!(session.cancel_submit(), Interaction::Rejected);
    }

    #[test]
    fn confirming_prompt_submits_partial_answers() {
        let mut session = build_session(2, 1);
        answer(&mut session, 1, 2);
        let _ = session.request_submit(false, fixed_now());

        let payload = expect_ready(session.confirm_submit(fixed_now() + Duration::seconds(12)));
        assert_eq!(payload.answers.len(), 1);
        assert_eq!(payload.time_spent_secs, 12);
        assert_eq!(
            session.phase(),
            &SessionPhase::Submitting {
                trigger: SubmitTrigger::Manual
            }
        );
    }

    #[test]
    fn submit_with_all_answered_goes_straight_to_submitting() {
        let mut session = build_session(2, 1);
        answer(&mut session, 0, 0);
        answer(&mut session, 1, 1);

        let payload = expect_ready(session.request_submit(false, fixed_now()));
        assert_eq!(payload.answers.len(), 2);
        assert_eq!(payload.quiz_id, session.quiz().id());
        assert!(session.has_submitted());
        assert!(!session.is_ticking());
    }

    #[test]
    fn forced_submit_skips_prompt() {
        let mut session = build_session(3, 1);
        let payload = expect_ready(session.request_submit(true, fixed_now()));
        assert!(payload.answers.is_empty());
    }

    #[test]
    fn second_trigger_is_suppressed_while_in_flight() {
        let mut session = build_session(1, 1);
        answer(&mut session, 0, 0);

        let _ = expect_ready(session.perform_submit(SubmitTrigger::Manual, fixed_now()));
        assert_eq!(
            session.perform_submit(SubmitTrigger::Timeout, fixed_now()),
            SubmitDecision::Suppressed
        );
        assert_eq!(
            session.request_submit(true, fixed_now()),
            SubmitDecision::Suppressed
        );
        assert_eq!(session.go_previous(), Interaction::Rejected);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn success_is_terminal_and_rejects_stale_input() {
        let mut session = build_session(1, 1);
        answer(&mut session, 0, 0);
        let _ = expect_ready(session.request_submit(false, fixed_now()));

        assert_eq!(session.finish_submit(Ok(result())), Interaction::Applied);
        assert!(session.is_complete());
        assert_eq!(session.result().unwrap().percentage, 50.0);

        let question = &session.quiz().questions()[0];
        let (q, a) = (question.id(), question.answers()[1].id());
        assert_eq!(session.select_answer(q, a), Interaction::Rejected);
        assert_eq!(session.go_next(), Interaction::Rejected);
        assert_eq!(
            session.request_submit(true, fixed_now()),
            SubmitDecision::Suppressed
        );
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        assert_eq!(session.finish_submit(Ok(result())), Interaction::Rejected);
    }

    #[test]
    fn failure_releases_guard_for_one_retry() {
        let mut session = build_session(1, 1);
        answer(&mut session, 0, 0);
        let _ = expect_ready(session.request_submit(false, fixed_now()));

        let error = ApiError::Network("offline".into());
        assert_eq!(
            session.finish_submit(Err(error.clone())),
            Interaction::Applied
        );
        assert_eq!(
            session.phase(),
            &SessionPhase::Failed {
                trigger: SubmitTrigger::Manual,
                error
            }
        );
        assert!(!session.has_submitted());
        assert!(session.is_ticking());

        let _ = expect_ready(session.request_submit(false, fixed_now()));
        assert_eq!(
            session.request_submit(false, fixed_now()),
            SubmitDecision::Suppressed
        );
        assert_eq!(session.finish_submit(Ok(result())), Interaction::Applied);
        assert_eq!(session.attempts(), 2);
        assert!(session.is_complete());
    }

    #[test]
    fn input_after_failure_returns_to_in_progress() {
        let mut session = build_session(2, 1);
        let _ = expect_ready(session.request_submit(true, fixed_now()));
        let _ = session.finish_submit(Err(ApiError::Validation("bad".into())));

        assert_eq!(session.go_next(), Interaction::Applied);
        assert_eq!(session.phase(), &SessionPhase::InProgress);
    }

    #[test]
    fn countdown_expires_after_exact_duration_and_forces_submit_once() {
        let mut session = build_session(2, 1);
        answer(&mut session, 0, 1);

        for _ in 0..59 {
            assert!(matches!(
                session.tick(fixed_now()),
                TickOutcome::Running { .. }
            ));
        }
        assert_eq!(session.remaining_secs(), 1);

        let TickOutcome::Expired(decision) = session.tick(fixed_now() + Duration::seconds(60))
        else {
            panic!("expected expiry on the 60th tick");
        };
        let payload = expect_ready(decision);
        assert_eq!(payload.answers.len(), 1);
        assert_eq!(payload.time_spent_secs, 60);
        assert_eq!(
            session.phase(),
            &SessionPhase::Submitting {
                trigger: SubmitTrigger::Timeout
            }
        );
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
    }

    #[test]
    fn expiry_during_prompt_submits_without_confirmation() {
        let mut session = build_session(2, 1);
        let _ = session.request_submit(false, fixed_now());

        for _ in 0..59 {
            let _ = session.tick(fixed_now());
        }
        let outcome = session.tick(fixed_now());
        assert!(matches!(
            outcome,
            TickOutcome::Expired(SubmitDecision::Ready(_))
        ));
        assert_eq!(
            session.phase(),
            &SessionPhase::Submitting {
                trigger: SubmitTrigger::Timeout
            }
        );
    }

    #[test]
    fn failed_timeout_submission_is_not_retried_by_the_clock() {
        let mut session = build_session(1, 1);
        for _ in 0..60 {
            let _ = session.tick(fixed_now());
        }
        let _ = session.finish_submit(Err(ApiError::Network("offline".into())));

        assert!(!session.is_ticking());
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);

        let _ = expect_ready(session.request_submit(true, fixed_now()));
        assert_eq!(session.attempts(), 2);
    }

    #[test]
    fn manual_submit_in_flight_suppresses_timeout_path() {
        let mut session = build_session(1, 1);
        for _ in 0..59 {
            let _ = session.tick(fixed_now());
        }
        let _ = expect_ready(session.request_submit(true, fixed_now()));

        assert_eq!(
            session.perform_submit(SubmitTrigger::Timeout, fixed_now()),
            SubmitDecision::Suppressed
        );
        assert_eq!(session.tick(fixed_now()), TickOutcome::Idle);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn navigator_marks_current_and_answered() {
        let mut session = build_session(3, 1);
        answer(&mut session, 0, 0);
        answer(&mut session, 2, 0);
        let _ = session.jump_to(2);

        let statuses: Vec<_> = session.navigator().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                QuestionStatus::Answered,
                QuestionStatus::Unanswered,
                QuestionStatus::Current
            ]
        );
        assert!(session.navigator()[2].answered);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut session = build_session(2, 1);
        answer(&mut session, 0, 1);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.quiz_title, "Test Quiz");
        assert_eq!(snapshot.progress.answered, 1);
        assert_eq!(snapshot.progress.total, 2);
        assert_eq!(snapshot.progress.percent_complete, 50);
        assert_eq!(snapshot.progress.remaining_display, "01:00");
        assert!(snapshot.current.options[1].selected);
        assert!(snapshot.result.is_none());
    }

    #[test]
    fn last_question_reads_complete_with_nothing_answered() {
        let mut session = build_session(4, 1);
        assert_eq!(session.jump_to(3), Interaction::Applied);

        let progress = session.progress();
        assert_eq!(progress.position, 4);
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.percent_complete, 100);
    }

    #[test]
    fn submit_from_failed_state_is_accepted() {
        let mut session = build_session(2, 1);
        let _ = expect_ready(session.request_submit(true, fixed_now()));
        let _ = session.finish_submit(Err(ApiError::Network("offline".into())));

        assert_eq!(
            session.request_submit(false, fixed_now()),
            SubmitDecision::ConfirmationRequired { unanswered: 2 }
        );
        assert_eq!(
            session.phase(),
            &SessionPhase::ConfirmationPending { unanswered: 2 }
        );
    }
}
