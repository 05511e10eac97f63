use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use chrono::Utc;

use crate::{
    app_state::AppState,
    models::dto::{
        request::{AttachQuestionsRequest, CreateQuizRequest, SubmitQuizRequest},
        response::{CreateQuizResponse, QuestionForTaking, QuizResult},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_quiz(
        &self,
        ctx: &Context<'_>,
        input: CreateQuizRequest,
    ) -> Result<CreateQuizResponse> {
        let state = ctx.data::<AppState>()?;

        state
            .quiz_service
            .create_quiz(input, Utc::now())
            .await
            .map_err(|e| e.extend())
    }

    async fn attach_questions(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
        input: AttachQuestionsRequest,
    ) -> Result<Vec<QuestionForTaking>> {
        let state = ctx.data::<AppState>()?;

        let questions = state
            .quiz_service
            .attach_questions(&quiz_id, input)
            .await
            .map_err(|e| e.extend())?;

        Ok(questions.into_iter().map(QuestionForTaking::from).collect())
    }

    async fn submit_quiz(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
        input: SubmitQuizRequest,
    ) -> Result<QuizResult> {
        let state = ctx.data::<AppState>()?;

        state
            .quiz_service
            .submit_quiz(&quiz_id, input, Utc::now())
            .await
            .map_err(|e| e.extend())
    }
}
