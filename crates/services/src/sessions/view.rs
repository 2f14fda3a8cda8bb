use quiz_core::model::{AnswerId, AnswerSelection, ExamQuiz, QuestionId, SubmissionResult};

use super::phase::SessionPhase;
use super::progress::{NavigatorEntry, SessionProgress};

/// Presentation-agnostic view of one answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOptionView {
    pub answer_id: AnswerId,
    /// `A`, `B`, `C`, ... in display order.
    pub label: char,
    pub content: String,
    pub selected: bool,
}

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentQuestionView {
    pub index: usize,
    pub number: usize,
    pub question_id: QuestionId,
    pub content: String,
    pub options: Vec<AnswerOptionView>,
    pub is_first: bool,
    pub is_last: bool,
}

impl CurrentQuestionView {
    /// Build the view for `index`, clamped to the quiz.
    #[must_use]
    pub fn new(quiz: &ExamQuiz, index: usize, selection: &AnswerSelection) -> Self {
        let last = quiz.question_count().saturating_sub(1);
        let index = index.min(last);
        let question = &quiz.questions()[index];

        let options = question
            .answers()
            .iter()
            .enumerate()
            .map(|(i, option)| AnswerOptionView {
                answer_id: option.id(),
                label: option_label(i),
                content: option.content().to_owned(),
                selected: selection.is_selected(question.id(), option.id()),
            })
            .collect();

        Self {
            index,
            number: index + 1,
            question_id: question.id(),
            content: question.content().to_owned(),
            options,
            is_first: index == 0,
            is_last: index == last,
        }
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&AnswerOptionView> {
        self.options.iter().find(|o| o.selected)
    }

    /// Option for a letter label, case-insensitive.
    #[must_use]
    pub fn option_by_label(&self, label: char) -> Option<&AnswerOptionView> {
        let label = label.to_ascii_uppercase();
        self.options.iter().find(|o| o.label == label)
    }
}

/// Letter label for an option position; falls back to `?` past `Z`.
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

/// Everything a front end needs to render the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub quiz_title: String,
    pub phase: SessionPhase,
    pub progress: SessionProgress,
    pub current: CurrentQuestionView,
    pub navigator: Vec<NavigatorEntry>,
    pub result: Option<SubmissionResult>,
}
