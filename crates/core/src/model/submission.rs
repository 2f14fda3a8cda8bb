use crate::model::ids::{AnswerId, QuestionId, QuizId, UserId};
use crate::model::quiz::ExamQuiz;
use crate::model::selection::AnswerSelection;

/// Answer ids chosen for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub selected_answer_ids: Vec<AnswerId>,
}

/// Payload handed to the submit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSubmission {
    pub user_id: UserId,
    pub quiz_id: QuizId,
    pub answers: Vec<SubmittedAnswer>,
    pub time_spent_secs: u64,
}

impl ExamSubmission {
    /// Collect the selection in question order, skipping unanswered questions.
    #[must_use]
    pub fn from_selection(
        user_id: UserId,
        quiz: &ExamQuiz,
        selection: &AnswerSelection,
        time_spent_secs: u64,
    ) -> Self {
        let answers = quiz
            .questions()
            .iter()
            .filter_map(|question| {
                selection
                    .selected(question.id())
                    .map(|ids| SubmittedAnswer {
                        question_id: question.id(),
                        selected_answer_ids: ids.iter().copied().collect(),
                    })
            })
            .collect();

        Self {
            user_id,
            quiz_id: quiz.id(),
            answers,
            time_spent_secs,
        }
    }
}
