pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::repositories::{
        history_repository::MockHistoryRepository, quiz_repository::MockQuizRepository,
        snippet_repository::MockSnippetRepository,
    };

    fn schema(quizzes: MockQuizRepository) -> Schema {
        create_schema(AppState::with_repositories(
            Config::test_config(),
            Arc::new(quizzes),
            Arc::new(MockHistoryRepository::new()),
            Arc::new(MockSnippetRepository::new()),
        ))
    }

    #[test]
    fn test_schema_exposes_operations() {
        let sdl = schema(MockQuizRepository::new()).sdl();

        for field in [
            "subjectProgress",
            "courseProgress",
            "quizQuestions",
            "createQuiz",
            "attachQuestions",
            "submitQuiz",
        ] {
            assert!(sdl.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_schema_never_exposes_answer_key() {
        let sdl = schema(MockQuizRepository::new()).sdl();

        assert!(!sdl.contains("correctChoice"));
        assert!(!sdl.contains("isCorrect"));
        assert!(!sdl.contains("type AnsweredQuestion"));
    }

    #[tokio::test]
    async fn test_missing_quiz_reports_error_code() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let response = schema(quizzes)
            .execute(r#"{ quiz(id: "nope") { id } }"#)
            .await;

        assert_eq!(response.errors.len(), 1);
        let code = response.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("NOT_FOUND")));
    }
}
