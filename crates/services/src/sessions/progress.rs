use quiz_core::model::{QuestionId, SessionClock, format_mm_ss};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
    /// `position / total` as a whole percentage, rounded half up.
    pub percent_complete: u8,
    /// One-based position of the current question.
    pub position: usize,
    pub remaining_secs: u32,
    /// Remaining time as `mm:ss`.
    pub remaining_display: String,
    /// Less than a minute left.
    pub running_low: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn new(answered: usize, total: usize, current: usize, countdown: &SessionClock) -> Self {
        let remaining_secs = countdown.remaining_secs();
        let position = current + 1;
        Self {
            answered,
            total,
            percent_complete: percent(position, total),
            position,
            remaining_secs,
            remaining_display: format_mm_ss(remaining_secs),
            running_low: countdown.is_running_low(),
        }
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}

fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total);
    let rounded = (part * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Navigator cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Unanswered,
}

/// One entry of the question navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorEntry {
    pub index: usize,
    pub question_id: QuestionId,
    pub status: QuestionStatus,
    /// Answered, even when `status` is `Current`.
    pub answered: bool,
}

impl NavigatorEntry {
    /// One-based number shown to the learner.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}
