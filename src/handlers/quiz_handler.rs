use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{AttachQuestionsRequest, CreateQuizRequest, PaginationParams, SubmitQuizRequest},
        response::{PaginatedResponse, QuestionForTaking},
    },
};

#[post("/api/quizzes")]
pub async fn create_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .create_quiz(request.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    let questions: Vec<QuestionForTaking> = state
        .quiz_service
        .questions_for_quiz(&id)
        .await?
        .into_iter()
        .map(QuestionForTaking::from)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "quiz": quiz,
        "questions": questions,
    })))
}

#[get("/api/users/{user_id}/quizzes")]
pub async fn list_user_quizzes(
    state: web::Data<Arc<AppState>>,
    user_id: web::Path<String>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    let (items, total) = state
        .quiz_service
        .list_quizzes_for_user(&user_id, pagination.offset(), pagination.limit())
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        total,
        offset: pagination.offset(),
        limit: pagination.limit(),
    }))
}

#[post("/api/quizzes/{id}/questions")]
pub async fn attach_questions(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<AttachQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let questions: Vec<QuestionForTaking> = state
        .quiz_service
        .attach_questions(&id, request.into_inner())
        .await?
        .into_iter()
        .map(QuestionForTaking::from)
        .collect();
    Ok(HttpResponse::Created().json(questions))
}

#[post("/api/quizzes/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_service
        .submit_quiz(&id, request.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
