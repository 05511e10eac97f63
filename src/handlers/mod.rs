pub mod graphql_handler;
pub mod health_handler;
pub mod progress_handler;
pub mod quiz_handler;

pub use graphql_handler::{graphql, graphiql};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use progress_handler::{get_course_progress, get_subject_mastery};
pub use quiz_handler::{attach_questions, create_quiz, get_quiz, list_user_quizzes, submit_quiz};
