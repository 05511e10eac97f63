pub mod history_repository;
pub mod quiz_repository;
pub mod snippet_repository;

pub use history_repository::{HistoryRepository, MongoHistoryRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use snippet_repository::{MongoSnippetRepository, SnippetRepository};
