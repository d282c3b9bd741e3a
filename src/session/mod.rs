pub mod quiz;
pub mod summary;

pub use quiz::{AnswerOutcome, IgnoreReason, QuizSession, RestartMode};
pub use summary::PassSummary;
