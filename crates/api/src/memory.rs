use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::{
    AnswerId, ExamQuiz, ExamSubmission, QuestionId, QuestionResult, QuizId, SubmissionId,
    SubmissionResult,
};
use tokio::sync::Semaphore;

use crate::client::ExamApi;
use crate::error::ApiError;

/// Default pass mark, in percent.
pub const DEFAULT_PASS_MARK: f64 = 50.0;

/// Grading data for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerKey {
    pub correct: BTreeSet<AnswerId>,
    pub score: f64,
}

impl AnswerKey {
    #[must_use]
    pub fn single(correct: AnswerId, score: f64) -> Self {
        Self {
            correct: BTreeSet::from([correct]),
            score,
        }
    }
}

struct StoredQuiz {
    quiz: ExamQuiz,
    keys: HashMap<QuestionId, AnswerKey>,
}

#[derive(Default)]
struct State {
    quizzes: HashMap<QuizId, StoredQuiz>,
    submissions: Vec<ExamSubmission>,
    fetch_failures: VecDeque<ApiError>,
    submit_failures: VecDeque<ApiError>,
}

/// In-memory exam backend for tests and offline demos.
///
/// Grades the way the quiz service does and records every submission it receives,
/// including ones answered with a scripted failure.
#[derive(Clone)]
pub struct InMemoryExamApi {
    state: Arc<Mutex<State>>,
    gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
    clock: Clock,
    pass_mark: f64,
}

impl Default for InMemoryExamApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryExamApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            gate: Arc::new(Mutex::new(None)),
            clock: Clock::default(),
            pass_mark: DEFAULT_PASS_MARK,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_pass_mark(mut self, pass_mark: f64) -> Self {
        self.pass_mark = pass_mark;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Store a quiz with its grading keys. Questions without a key score zero.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the internal lock is poisoned.
    pub fn insert_quiz(
        &self,
        quiz: ExamQuiz,
        keys: impl IntoIterator<Item = (QuestionId, AnswerKey)>,
    ) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        let stored = StoredQuiz {
            keys: keys.into_iter().collect(),
            quiz,
        };
        state.quizzes.insert(stored.quiz.id(), stored);
        Ok(())
    }

    /// Queue an error for the next fetch call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the internal lock is poisoned.
    pub fn fail_next_fetch(&self, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.fetch_failures.push_back(error);
        Ok(())
    }

    /// Queue an error for the next submit call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the internal lock is poisoned.
    pub fn fail_next_submit(&self, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.submit_failures.push_back(error);
        Ok(())
    }

    /// Every submission received so far, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the internal lock is poisoned.
    pub fn submissions(&self) -> Result<Vec<ExamSubmission>, ApiError> {
        Ok(self.lock()?.submissions.clone())
    }

    /// Number of submit calls received so far.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the internal lock is poisoned.
    pub fn submit_count(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.submissions.len())
    }

    /// Park submit calls after they are recorded until [`Self::release_submissions`].
    pub fn hold_submissions(&self) {
        if let Ok(mut gate) = self.gate.lock() {
            *gate = Some(Arc::new(Semaphore::new(0)));
        }
    }

    /// Let parked and future submit calls finish.
    pub fn release_submissions(&self) {
        let released = self.gate.lock().ok().and_then(|mut gate| gate.take());
        if let Some(semaphore) = released {
            semaphore.close();
        }
    }

    fn grade(&self, stored: &StoredQuiz, submission: &ExamSubmission) -> SubmissionResult {
        let submitted: HashMap<QuestionId, BTreeSet<AnswerId>> = submission
            .answers
            .iter()
            .map(|a| {
                (
                    a.question_id,
                    a.selected_answer_ids.iter().copied().collect(),
                )
            })
            .collect();

        let mut total_score = 0.0;
        let mut earned_score = 0.0;
        let mut correct_answers = 0_u32;
        let question_results: Vec<QuestionResult> = stored
            .quiz
            .questions()
            .iter()
            .map(|question| {
                let key = stored.keys.get(&question.id());
                let score = key.map_or(0.0, |k| k.score);
                let correct = key.map(|k| k.correct.clone()).unwrap_or_default();
                let chosen = submitted.get(&question.id()).cloned().unwrap_or_default();
                let is_correct = !chosen.is_empty() && chosen == correct;

                total_score += score;
                if is_correct {
                    earned_score += score;
                    correct_answers = correct_answers.saturating_add(1);
                }

                QuestionResult {
                    question_id: question.id(),
                    question_content: question.content().to_owned(),
                    question_score: score,
                    is_correct,
                    submitted_answer_ids: chosen.into_iter().collect(),
                    correct_answer_ids: correct.into_iter().collect(),
                }
            })
            .collect();

        let percentage = if total_score > 0.0 {
            earned_score / total_score * 100.0
        } else {
            0.0
        };

        SubmissionResult {
            submission_id: SubmissionId::random(),
            quiz_title: stored.quiz.title().to_owned(),
            total_questions: u32::try_from(question_results.len()).unwrap_or(u32::MAX),
            correct_answers,
            total_score,
            earned_score,
            percentage,
            passed: percentage >= self.pass_mark,
            submitted_at: self.clock.now(),
            question_results,
        }
    }
}

fn validate(stored: &StoredQuiz, submission: &ExamSubmission) -> Result<(), ApiError> {
    for answer in &submission.answers {
        let question = stored
            .quiz
            .find_question(answer.question_id)
            .ok_or_else(|| {
                ApiError::Validation(format!("unknown question {}", answer.question_id))
            })?;
        if let Some(bad) = answer
            .selected_answer_ids
            .iter()
            .find(|id| !question.has_answer(**id))
        {
            return Err(ApiError::Validation(format!(
                "answer {bad} does not belong to question {}",
                answer.question_id
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl ExamApi for InMemoryExamApi {
    async fn fetch_exam_quiz(&self, quiz_id: QuizId) -> Result<ExamQuiz, ApiError> {
        let mut state = self.lock()?;
        if let Some(error) = state.fetch_failures.pop_front() {
            return Err(error);
        }
        state
            .quizzes
            .get(&quiz_id)
            .map(|stored| stored.quiz.clone())
            .ok_or(ApiError::NotFound)
    }

    async fn submit_exam(&self, submission: &ExamSubmission) -> Result<SubmissionResult, ApiError> {
        self.lock()?.submissions.push(submission.clone());

        let gate = self.gate.lock().ok().and_then(|g| g.clone());
        if let Some(semaphore) = gate {
            // Closing the semaphore is the release signal.
            let _ = semaphore.acquire().await;
        }

        let mut state = self.lock()?;
        if let Some(error) = state.submit_failures.pop_front() {
            return Err(error);
        }
        let stored = state.quizzes.get(&submission.quiz_id).ok_or_else(|| {
            ApiError::Validation(format!("unknown quiz {}", submission.quiz_id))
        })?;
        validate(stored, submission)?;
        Ok(self.grade(stored, submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ExamAnswerOption, ExamQuestion, SubmittedAnswer, UserId};
    use quiz_core::time::fixed_clock;

    struct Fixture {
        api: InMemoryExamApi,
        quiz: ExamQuiz,
        right: Vec<AnswerId>,
        wrong: Vec<AnswerId>,
    }

    fn fixture() -> Fixture {
        let mut right = Vec::new();
        let mut wrong = Vec::new();
        let mut questions = Vec::new();
        for i in 0..2 {
            let (r, w) = (AnswerId::random(), AnswerId::random());
            right.push(r);
            wrong.push(w);
            questions.push(
                ExamQuestion::new(
                    QuestionId::random(),
                    format!("Q{i}"),
                    vec![ExamAnswerOption::new(r, "right"), ExamAnswerOption::new(w, "wrong")],
                ),
            );
        }
        let quiz = ExamQuiz::new(QuizId::random(), "Fixture", 1, questions).unwrap();
        let keys: Vec<_> = quiz
            .questions()
            .iter()
            .zip(&right)
            .enumerate()
            .map(|(i, (q, r))| (q.id(), AnswerKey::single(*r, (i + 1) as f64)))
            .collect();
        let api = InMemoryExamApi::new().with_clock(fixed_clock());
        api.insert_quiz(quiz.clone(), keys).unwrap();
        Fixture {
            api,
            quiz,
            right,
            wrong,
        }
    }

    fn submission(quiz: &ExamQuiz, picks: &[(usize, AnswerId)]) -> ExamSubmission {
        ExamSubmission {
            user_id: UserId::random(),
            quiz_id: quiz.id(),
            answers: picks
                .iter()
                .map(|(i, a)| SubmittedAnswer {
                    question_id: quiz.questions()[*i].id(),
                    selected_answer_ids: vec![*a],
                })
                .collect(),
            time_spent_secs: 10,
        }
    }

    #[tokio::test]
    async fn fetch_returns_stored_quiz_or_not_found() {
        let f = fixture();
        assert_eq!(f.api.fetch_exam_quiz(f.quiz.id()).await.unwrap(), f.quiz);
        assert_eq!(
            f.api.fetch_exam_quiz(QuizId::random()).await.unwrap_err(),
            ApiError::NotFound
        );
    }

    #[tokio::test]
    async fn grades_weighted_scores() {
        let f = fixture();
        let result = f
            .api
            .submit_exam(&submission(&f.quiz, &[(0, f.wrong[0]), (1, f.right[1])]))
            .await
            .unwrap();

        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_answers, 1);
        assert!((result.total_score - 3.0).abs() < f64::EPSILON);
        assert!((result.earned_score - 2.0).abs() < f64::EPSILON);
        assert!(result.passed);
        let first = result.question(f.quiz.questions()[0].id()).unwrap();
        assert!(!first.is_correct);
        assert_eq!(first.correct_answer_ids, vec![f.right[0]]);
        assert!(result.question(QuestionId::random()).is_none());
    }

    #[tokio::test]
    async fn pass_mark_is_configurable() {
        let f = fixture();
        let strict = InMemoryExamApi::new()
            .with_clock(fixed_clock())
            .with_pass_mark(70.0);
        let keys: Vec<_> = f
            .quiz
            .questions()
            .iter()
            .zip(&f.right)
            .enumerate()
            .map(|(i, (q, r))| (q.id(), AnswerKey::single(*r, (i + 1) as f64)))
            .collect();
        strict.insert_quiz(f.quiz.clone(), keys).unwrap();

        let picks = [(0, f.wrong[0]), (1, f.right[1])];
        let lenient = f.api.submit_exam(&submission(&f.quiz, &picks)).await.unwrap();
        let graded = strict.submit_exam(&submission(&f.quiz, &picks)).await.unwrap();

        assert!(lenient.passed);
        assert!(!graded.passed);
        assert!((graded.percentage - lenient.percentage).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unanswered_questions_count_as_incorrect() {
        let f = fixture();
        let result = f
            .api
            .submit_exam(&submission(&f.quiz, &[(0, f.right[0])]))
            .await
            .unwrap();

        assert_eq!(result.correct_answers, 1);
        assert!(!result.passed);
        assert!(result.question_results[1].submitted_answer_ids.is_empty());
    }

    #[tokio::test]
    async fn rejects_foreign_answer_ids() {
        let f = fixture();
        let err = f
            .api
            .submit_exam(&submission(&f.quiz, &[(0, f.right[1])]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_once_and_still_recorded() {
        let f = fixture();
        f.api
            .fail_next_submit(ApiError::Network("offline".into()))
            .unwrap();
        let payload = submission(&f.quiz, &[(0, f.right[0])]);

        assert!(f.api.submit_exam(&payload).await.is_err());
        assert!(f.api.submit_exam(&payload).await.is_ok());
        assert_eq!(f.api.submit_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn held_submissions_finish_after_release() {
        let f = fixture();
        f.api.hold_submissions();
        let api = f.api.clone();
        let payload = submission(&f.quiz, &[(0, f.right[0])]);
        let pending = tokio::spawn(async move { api.submit_exam(&payload).await });

        while f.api.submit_count().unwrap() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(!pending.is_finished());

        f.api.release_submissions();
        assert!(pending.await.unwrap().is_ok());
    }
}
