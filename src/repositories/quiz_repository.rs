use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::{FindOptions, IndexOptions},
    ClientSession, Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{AnsweredQuestion, GradedAnswer, Quiz, QuizStatus},
};

use super::history_repository::QUESTIONS_COLLECTION;

pub const QUIZZES_COLLECTION: &str = "quizzes";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)>;
    /// Stores generated questions and moves a `Pending` quiz to `Ready`, all or nothing.
    async fn attach_questions(&self, quiz_id: &str, questions: Vec<AnsweredQuestion>) -> AppResult<()>;
    /// Writes every graded answer and the completion timestamp, all or nothing.
    async fn apply_submission(
        &self,
        quiz_id: &str,
        answers: Vec<GradedAnswer>,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    db: Database,
    quizzes: Collection<Quiz>,
    questions: Collection<AnsweredQuestion>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            quizzes: db.get_collection(QUIZZES_COLLECTION),
            questions: db.get_collection(QUESTIONS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("user_created".to_string()).build())
            .build();

        self.quizzes.create_index(id_index).await?;
        self.quizzes.create_index(user_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }

    async fn attach_in_session(
        &self,
        session: &mut ClientSession,
        quiz_id: &str,
        questions: &[AnsweredQuestion],
    ) -> AppResult<()> {
        let result = self
            .quizzes
            .update_one(
                doc! { "id": quiz_id, "status": QuizStatus::Pending.as_str() },
                doc! { "$set": { "status": QuizStatus::Ready.as_str() } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' is not waiting for questions",
                quiz_id
            )));
        }

        if !questions.is_empty() {
            self.questions
                .insert_many(questions)
                .session(&mut *session)
                .await?;
        }
        Ok(())
    }

    async fn submit_in_session(
        &self,
        session: &mut ClientSession,
        quiz_id: &str,
        answers: &[GradedAnswer],
        completed_at: &Bson,
    ) -> AppResult<()> {
        let result = self
            .quizzes
            .update_one(
                doc! {
                    "id": quiz_id,
                    "status": QuizStatus::Ready.as_str(),
                    "completed_at": Bson::Null,
                },
                doc! { "$set": {
                    "status": QuizStatus::Complete.as_str(),
                    "completed_at": completed_at.clone(),
                } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' is not open for submission",
                quiz_id
            )));
        }

        for answer in answers {
            let result = self
                .questions
                .update_one(
                    doc! {
                        "id": &answer.question_id,
                        "quiz_id": quiz_id,
                        "is_correct": Bson::Null,
                    },
                    doc! { "$set": {
                        "chosen_choice": answer.chosen_choice as i32,
                        "is_correct": answer.is_correct,
                        "quiz_completed_at": completed_at.clone(),
                    } },
                )
                .session(&mut *session)
                .await?;

            if result.matched_count != 1 {
                return Err(AppError::SubmissionMismatch(format!(
                    "Question '{}' is not an open question of quiz '{}'",
                    answer.question_id, quiz_id
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.quizzes.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.quizzes.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        let filter = doc! { "user_id": user_id };

        let total = self.quizzes.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.quizzes.find(filter).with_options(find_options).await?;
        let items: Vec<Quiz> = cursor.try_collect().await?;

        Ok((items, total))
    }

    async fn attach_questions(&self, quiz_id: &str, questions: Vec<AnsweredQuestion>) -> AppResult<()> {
        let mut session = self.db.start_session().await?;
        session.start_transaction().await?;

        match self.attach_in_session(&mut session, quiz_id, &questions).await {
            Ok(()) => {
                session.commit_transaction().await?;
                Ok(())
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    log::error!("Failed to abort question attachment for quiz {}: {}", quiz_id, abort_err);
                }
                Err(err)
            }
        }
    }

    async fn apply_submission(
        &self,
        quiz_id: &str,
        answers: Vec<GradedAnswer>,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let completed_at = to_bson(&completed_at)?;

        let mut session = self.db.start_session().await?;
        session.start_transaction().await?;

        match self
            .submit_in_session(&mut session, quiz_id, &answers, &completed_at)
            .await
        {
            Ok(()) => {
                session.commit_transaction().await?;
                Ok(())
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    log::error!("Failed to abort submission for quiz {}: {}", quiz_id, abort_err);
                }
                Err(err)
            }
        }
    }
}
