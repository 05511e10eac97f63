use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use chrono::Utc;

use crate::{
    app_state::AppState,
    graphql::helpers::page_bounds,
    models::{
        domain::Quiz,
        dto::response::{CourseProgress, PaginatedResponse, QuestionForTaking, SubjectProgress},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Topic mastery, snippet average and sampling weight for one subject.
    async fn subject_progress(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        subject_id: ID,
    ) -> Result<SubjectProgress> {
        let state = ctx.data::<AppState>()?;

        state
            .progress_service
            .subject_progress(&user_id, &subject_id, Utc::now())
            .await
            .map_err(|e| e.extend())
    }

    async fn course_progress(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        course_id: ID,
    ) -> Result<CourseProgress> {
        let state = ctx.data::<AppState>()?;

        state
            .progress_service
            .course_progress(&user_id, &course_id, Utc::now())
            .await
            .map_err(|e| e.extend())
    }

    async fn quiz(&self, ctx: &Context<'_>, id: ID) -> Result<Quiz> {
        let state = ctx.data::<AppState>()?;
        state.quiz_service.get_quiz(&id).await.map_err(|e| e.extend())
    }

    async fn quizzes(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PaginatedResponse<Quiz>> {
        let state = ctx.data::<AppState>()?;
        let (offset, limit) = page_bounds(offset, limit);

        let (items, total) = state
            .quiz_service
            .list_quizzes_for_user(&user_id, offset, limit)
            .await
            .map_err(|e| e.extend())?;

        Ok(PaginatedResponse {
            items,
            total,
            offset,
            limit,
        })
    }

    /// Questions without their answer key.
    async fn quiz_questions(&self, ctx: &Context<'_>, quiz_id: ID) -> Result<Vec<QuestionForTaking>> {
        let state = ctx.data::<AppState>()?;

        let questions = state
            .quiz_service
            .questions_for_quiz(&quiz_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(questions.into_iter().map(QuestionForTaking::from).collect())
    }
}
