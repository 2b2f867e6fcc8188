use thiserror::Error;

pub type ContentResult<T> = std::result::Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("course has no units")]
    EmptyCourse,
    #[error("unit `{unit}` has no lessons")]
    EmptyUnit { unit: String },
    #[error("lesson `{lesson}` has no questions")]
    EmptyLesson { lesson: String },
    #[error("duplicate lesson id `{0}`")]
    DuplicateLesson(String),
    #[error("duplicate question id `{0}`")]
    DuplicateQuestion(String),
    #[error("question `{question}` must be worth at least one point")]
    ZeroPoints { question: String },
    #[error("question `{question}` has no options")]
    MissingOptions { question: String },
    #[error("question `{question}`: correct answer `{answer}` is not one of the options")]
    AnswerNotInOptions { question: String, answer: String },
    #[error("question `{question}` has an empty correct answer")]
    EmptyAnswer { question: String },
    #[error("lesson `{lesson}` has an invalid default lock state (unlocked: {unlocked})")]
    DefaultLockState { lesson: String, unlocked: bool },
}
