pub mod answered_question;
pub mod mastery;
pub mod quiz;
pub mod snippet;
pub use answered_question::{AnsweredQuestion, Correctness, GradedAnswer};
pub use mastery::{MasteryScore, MAX_MASTERY};
pub use quiz::{Quiz, QuizStatus};
pub use snippet::{CandidatePool, Snippet, SnippetScope, Topic};
