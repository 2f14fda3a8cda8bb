use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{AnswerId, QuestionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("quiz duration must be > 0 minutes")]
    InvalidDuration,

    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),

    #[error("answer option {0} appears more than once")]
    DuplicateAnswer(AnswerId),
}

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One selectable option of an exam question. Carries no correctness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamAnswerOption {
    id: AnswerId,
    content: String,
}

impl ExamAnswerOption {
    #[must_use]
    pub fn new(id: AnswerId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> AnswerId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question as presented during an exam, with its options in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamQuestion {
    id: QuestionId,
    content: String,
    answers: Vec<ExamAnswerOption>,
}

impl ExamQuestion {
    /// A question may arrive without options; it then simply stays unanswered.
    #[must_use]
    pub fn new(
        id: QuestionId,
        content: impl Into<String>,
        answers: Vec<ExamAnswerOption>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            answers,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn answers(&self) -> &[ExamAnswerOption] {
        &self.answers
    }

    #[must_use]
    pub fn has_answer(&self, answer_id: AnswerId) -> bool {
        self.answers.iter().any(|a| a.id == answer_id)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A quiz loaded for taking: immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamQuiz {
    id: QuizId,
    title: String,
    duration_minutes: u32,
    questions: Vec<ExamQuestion>,
}

impl ExamQuiz {
    /// Validate and build a quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the duration is zero, there are no questions, or
    /// question/answer identifiers repeat. A blank title is accepted as delivered.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        duration_minutes: u32,
        questions: Vec<ExamQuestion>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if duration_minutes == 0 {
            return Err(QuizError::InvalidDuration);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let mut seen_questions = HashSet::with_capacity(questions.len());
        let mut seen_answers = HashSet::new();
        for question in &questions {
            if !seen_questions.insert(question.id) {
                return Err(QuizError::DuplicateQuestion(question.id));
            }
            for answer in &question.answers {
                if !seen_answers.insert(answer.id) {
                    return Err(QuizError::DuplicateAnswer(answer.id));
                }
            }
        }

        Ok(Self {
            id,
            title,
            duration_minutes,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Total allotted time in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn questions(&self) -> &[ExamQuestion] {
        &self.questions
    }

    /// Number of questions; always at least one.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&ExamQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn find_question(&self, id: QuestionId) -> Option<&ExamQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }
}
