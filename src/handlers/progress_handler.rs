use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::{app_state::AppState, errors::AppError};

#[get("/api/users/{user_id}/subjects/{subject_id}/mastery")]
pub async fn get_subject_mastery(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, subject_id) = path.into_inner();

    let progress = state
        .progress_service
        .subject_progress(&user_id, &subject_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[get("/api/users/{user_id}/courses/{course_id}/progress")]
pub async fn get_course_progress(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, course_id) = path.into_inner();

    let progress = state
        .progress_service
        .course_progress(&user_id, &course_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}
