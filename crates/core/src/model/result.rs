use chrono::{DateTime, Utc};

use crate::model::ids::{AnswerId, QuestionId, SubmissionId};

/// Grading outcome for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub question_content: String,
    pub question_score: f64,
    pub is_correct: bool,
    pub submitted_answer_ids: Vec<AnswerId>,
    pub correct_answer_ids: Vec<AnswerId>,
}

/// Scored result returned by the submit operation. Terminal for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub submission_id: SubmissionId,
    pub quiz_title: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_score: f64,
    pub earned_score: f64,
    pub percentage: f64,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
    pub question_results: Vec<QuestionResult>,
}

impl SubmissionResult {
    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.total_questions.saturating_sub(self.correct_answers)
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&QuestionResult> {
        self.question_results.iter().find(|r| r.question_id == id)
    }
}
