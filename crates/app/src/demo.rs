use api::{AnswerKey, ApiError, InMemoryExamApi};
use quiz_core::model::{AnswerId, ExamAnswerOption, ExamQuestion, ExamQuiz, QuestionId, QuizId};

const QUESTIONS: &[(&str, &[&str], usize)] = &[
    (
        "Which keyword moves ownership of captured variables into a closure?",
        &["ref", "move", "static", "own"],
        1,
    ),
    (
        "What does the `?` operator do on an `Err` value?",
        &[
            "Panics with the error",
            "Ignores it",
            "Returns it early from the function",
            "Converts it to `None`",
        ],
        2,
    ),
    (
        "Which trait must a type implement to be sent to another thread?",
        &["Sync", "Copy", "Send", "Unpin"],
        2,
    ),
    (
        "What is the type of a string literal?",
        &["String", "&'static str", "&mut str", "Box<str>"],
        1,
    ),
];

/// Offline backend seeded with a short Rust quiz.
pub fn backend(duration_minutes: u32) -> Result<(InMemoryExamApi, QuizId), ApiError> {
    let mut questions = Vec::with_capacity(QUESTIONS.len());
    let mut keys = Vec::with_capacity(QUESTIONS.len());

    for (content, options, correct) in QUESTIONS {
        let answers: Vec<_> = options
            .iter()
            .map(|option| ExamAnswerOption::new(AnswerId::random(), *option))
            .collect();
        let key = AnswerKey::single(answers[*correct].id(), 1.0);
        let question = ExamQuestion::new(QuestionId::random(), *content, answers);
        keys.push((question.id(), key));
        questions.push(question);
    }

    let quiz = ExamQuiz::new(QuizId::random(), "Rust basics", duration_minutes, questions)?;
    let quiz_id = quiz.id();
    let api = InMemoryExamApi::new();
    api.insert_quiz(quiz, keys)?;
    Ok((api, quiz_id))
}
