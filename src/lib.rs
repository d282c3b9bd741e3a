// Quiz core: question bank, filtering/shuffling, and the per-user session
// state machine. The terminal front end in main.rs drives these modules;
// integration tests and benches import them as `milestone_quiz::*`.

pub mod bank;
pub mod config;
pub mod engine;
pub mod logging;
pub mod session;

pub use bank::{BankError, Question, QuestionBank, QuestionId};
pub use engine::filter::TagFilter;
pub use session::{AnswerOutcome, PassSummary, QuizSession, RestartMode};
