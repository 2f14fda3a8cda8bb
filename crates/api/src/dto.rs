//! JSON shapes exchanged with the exam HTTP API.
//!
//! These mirror the wire format so the domain types in `quiz_core` stay free of
//! serialization concerns.

use chrono::{DateTime, NaiveDateTime, Utc};
use quiz_core::model::{
    AnswerId, ExamAnswerOption, ExamQuestion, ExamQuiz, ExamSubmission, QuestionId, QuestionResult,
    QuizError, QuizId, SubmissionId, SubmissionResult, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

//
// ─── QUIZ FOR EXAM ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuizDto {
    pub id: QuizId,
    pub title: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub questions: Vec<ExamQuestionDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestionDto {
    pub id: QuestionId,
    pub content: String,
    #[serde(default)]
    pub answers: Vec<ExamAnswerDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnswerDto {
    pub id: AnswerId,
    pub content: String,
}

impl ExamQuizDto {
    /// Convert the payload into a validated domain quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the quiz cannot be taken as delivered.
    pub fn into_quiz(self) -> Result<ExamQuiz, QuizError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| {
                let answers = q
                    .answers
                    .into_iter()
                    .map(|a| ExamAnswerOption::new(a.id, a.content))
                    .collect();
                ExamQuestion::new(q.id, q.content, answers)
            })
            .collect();
        ExamQuiz::new(self.id, self.title, self.duration_minutes, questions)
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamRequest {
    pub user_id: UserId,
    pub quiz_id: QuizId,
    pub answers: Vec<SubmittedAnswerDto>,
    pub time_spent: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswerDto {
    pub question_id: QuestionId,
    pub selected_answer_ids: Vec<AnswerId>,
}

impl SubmitExamRequest {
    #[must_use]
    pub fn from_submission(submission: &ExamSubmission) -> Self {
        Self {
            user_id: submission.user_id,
            quiz_id: submission.quiz_id,
            answers: submission
                .answers
                .iter()
                .map(|a| SubmittedAnswerDto {
                    question_id: a.question_id,
                    selected_answer_ids: a.selected_answer_ids.clone(),
                })
                .collect(),
            time_spent: submission.time_spent_secs,
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResultDto {
    pub submission_id: SubmissionId,
    pub quiz_title: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_score: f64,
    pub earned_score: f64,
    pub percentage: f64,
    pub passed: bool,
    pub submission_time: String,
    #[serde(default)]
    pub question_results: Vec<QuestionResultDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResultDto {
    pub question_id: QuestionId,
    pub question_content: String,
    pub question_score: f64,
    pub is_correct: bool,
    #[serde(default)]
    pub submitted_answer_ids: Vec<AnswerId>,
    #[serde(default)]
    pub correct_answer_ids: Vec<AnswerId>,
}

impl SubmissionResultDto {
    /// `received_at` stands in for `submissionTime` when the server sends a value
    /// that cannot be read; the submission was accepted either way.
    #[must_use]
    pub fn into_result(self, received_at: DateTime<Utc>) -> SubmissionResult {
        let submitted_at = parse_timestamp(&self.submission_time).unwrap_or_else(|| {
            warn!(raw = %self.submission_time, "unreadable submissionTime; using receive time");
            received_at
        });
        SubmissionResult {
            submission_id: self.submission_id,
            quiz_title: self.quiz_title,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            total_score: self.total_score,
            earned_score: self.earned_score,
            percentage: self.percentage,
            passed: self.passed,
            submitted_at,
            question_results: self
                .question_results
                .into_iter()
                .map(|r| QuestionResult {
                    question_id: r.question_id,
                    question_content: r.question_content,
                    question_score: r.question_score,
                    is_correct: r.is_correct,
                    submitted_answer_ids: r.submitted_answer_ids,
                    correct_answer_ids: r.correct_answer_ids,
                })
                .collect(),
        }
    }
}

/// Accepts RFC 3339 or an offset-less local timestamp, which is read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::SubmittedAnswer;
    use quiz_core::time::fixed_now;

    const QUIZ_JSON: &str = r#"{
        "id": "11111111-1111-4111-8111-111111111111",
        "title": "Ownership",
        "description": "ignored",
        "durationMinutes": 10,
        "questions": [{
            "id": "22222222-2222-4222-8222-222222222222",
            "content": "Who owns a moved value?",
            "score": 1,
            "answers": [
                { "id": "33333333-3333-4333-8333-333333333333", "content": "The caller" },
                { "id": "44444444-4444-4444-8444-444444444444", "content": "The callee" }
            ]
        }]
    }"#;

    #[test]
    fn quiz_payload_converts_to_domain() {
        let dto: ExamQuizDto = serde_json::from_str(QUIZ_JSON).unwrap();
        let quiz = dto.into_quiz().unwrap();

        assert_eq!(quiz.title(), "Ownership");
        assert_eq!(quiz.duration_secs(), 600);
        assert_eq!(quiz.question_count(), 1);
        assert_eq!(quiz.questions()[0].answers()[1].content(), "The callee");
    }

    #[test]
    fn quiz_without_questions_is_rejected() {
        let dto: ExamQuizDto = serde_json::from_str(
            r#"{"id":"11111111-1111-4111-8111-111111111111","title":"Empty","durationMinutes":5}"#,
        )
        .unwrap();
        assert_eq!(dto.into_quiz().unwrap_err(), QuizError::NoQuestions);
    }

    #[test]
    fn request_uses_camel_case_keys() {
        let question_id = QuestionId::random();
        let answer_id = AnswerId::random();
        let submission = ExamSubmission {
            user_id: UserId::random(),
            quiz_id: QuizId::random(),
            answers: vec![SubmittedAnswer {
                question_id,
                selected_answer_ids: vec![answer_id],
            }],
            time_spent_secs: 37,
        };

        let json = serde_json::to_value(SubmitExamRequest::from_submission(&submission)).unwrap();

        assert_eq!(json["timeSpent"], 37);
        assert_eq!(json["userId"], submission.user_id.to_string());
        assert_eq!(json["answers"][0]["questionId"], question_id.to_string());
        assert_eq!(
            json["answers"][0]["selectedAnswerIds"][0],
            answer_id.to_string()
        );
    }

    #[test]
    fn result_accepts_local_and_offset_timestamps() {
        let body = |time: &str| {
            format!(
                r#"{{
                    "submissionId": "55555555-5555-4555-8555-555555555555",
                    "quizTitle": "Ownership",
                    "totalQuestions": 2,
                    "correctAnswers": 1,
                    "totalScore": 2,
                    "earnedScore": 1,
                    "percentage": 50.0,
                    "passed": true,
                    "submissionTime": "{time}",
                    "questionResults": []
                }}"#
            )
        };

        let local: SubmissionResultDto =
            serde_json::from_str(&body("2024-03-01T10:15:30.123")).unwrap();
        let offset: SubmissionResultDto =
            serde_json::from_str(&body("2024-03-01T12:15:30.123+02:00")).unwrap();

        let local = local.into_result(fixed_now());
        let offset = offset.into_result(fixed_now());
        assert_eq!(local.submitted_at, offset.submitted_at);
        assert_eq!(local.incorrect_answers(), 1);
    }

    fn result_dto(time: &str) -> SubmissionResultDto {
        SubmissionResultDto {
            submission_id: SubmissionId::random(),
            quiz_title: "T".into(),
            total_questions: 1,
            correct_answers: 1,
            total_score: 1.0,
            earned_score: 1.0,
            percentage: 100.0,
            passed: true,
            submission_time: time.into(),
            question_results: Vec::new(),
        }
    }

    #[test]
    fn space_separated_timestamp_is_read_as_utc() {
        let result = result_dto("2024-05-01 09:30:00").into_result(fixed_now());
        let expected = NaiveDateTime::parse_from_str("2024-05-01T09:30:00", "%Y-%m-%dT%H:%M:%S")
            .unwrap()
            .and_utc();
        assert_eq!(result.submitted_at, expected);
    }

    #[test]
    fn unreadable_timestamp_keeps_accepted_result() {
        let result = result_dto("yesterday").into_result(fixed_now());
        assert!(result.passed);
        assert_eq!(result.submitted_at, fixed_now());
    }
}
