use std::collections::{BTreeSet, HashMap};

use crate::model::ids::{AnswerId, QuestionId};

/// Answers picked by the learner, keyed by question.
///
/// Values are sets so multi-select questions fit without a model change; the
/// session currently only writes singletons through [`AnswerSelection::select_single`].
/// Unanswered questions have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSelection {
    entries: HashMap<QuestionId, BTreeSet<AnswerId>>,
}

impl AnswerSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was selected for `question_id` with `{answer_id}`.
    ///
    /// Returns `false` when the same single answer was already selected.
    pub fn select_single(&mut self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        let next = BTreeSet::from([answer_id]);
        match self.entries.insert(question_id, next) {
            Some(previous) => !(previous.len() == 1 && previous.contains(&answer_id)),
            None => true,
        }
    }

    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<&BTreeSet<AnswerId>> {
        self.entries.get(&question_id)
    }

    #[must_use]
    pub fn is_selected(&self, question_id: QuestionId, answer_id: AnswerId) -> bool {
        self.entries
            .get(&question_id)
            .is_some_and(|ids| ids.contains(&answer_id))
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.entries.contains_key(&question_id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
