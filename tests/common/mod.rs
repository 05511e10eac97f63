#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use tokio::sync::RwLock;

use mastery_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        AnsweredQuestion, CandidatePool, GradedAnswer, Quiz, QuizStatus, Snippet, SnippetScope,
        Topic,
    },
    repositories::{HistoryRepository, QuizRepository, SnippetRepository},
};

/// One in-memory backing store behind all three repository traits, so answers
/// written through the quiz repository show up in the history source.
#[derive(Default)]
pub struct InMemoryStore {
    quizzes: RwLock<HashMap<String, Quiz>>,
    questions: RwLock<Vec<AnsweredQuestion>>,
    snippets: RwLock<Vec<Snippet>>,
    topics: RwLock<Vec<Topic>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn add_topic(&self, id: &str, name: &str, course_id: &str) {
        self.topics.write().await.push(Topic {
            id: id.to_string(),
            name: name.to_string(),
            course_id: course_id.to_string(),
        });
    }

    pub async fn add_snippet(&self, id: &str, course_id: &str, material_id: &str, topic_id: &str) {
        self.snippets.write().await.push(Snippet {
            id: id.to_string(),
            material_id: material_id.to_string(),
            course_id: course_id.to_string(),
            topic_id: topic_id.to_string(),
            text: format!("Text of {}", id),
        });
    }

    pub async fn add_question(&self, question: AnsweredQuestion) {
        self.questions.write().await.push(question);
    }

    pub async fn questions(&self) -> Vec<AnsweredQuestion> {
        self.questions.read().await.clone()
    }

    pub async fn quiz(&self, id: &str) -> Option<Quiz> {
        self.quizzes.read().await.get(id).cloned()
    }
}

#[async_trait]
impl QuizRepository for InMemoryStore {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::Conflict(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }

        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &str, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = items.len() as i64;
        let start = offset.max(0) as usize;
        let end = (start + limit.max(0) as usize).min(items.len());

        let page = if start >= items.len() {
            vec![]
        } else {
            items[start..end].to_vec()
        };

        Ok((page, total))
    }

    async fn attach_questions(&self, quiz_id: &str, questions: Vec<AnsweredQuestion>) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        let mut stored = self.questions.write().await;

        let quiz = quizzes
            .get_mut(quiz_id)
            .filter(|q| q.status == QuizStatus::Pending)
            .ok_or_else(|| {
                AppError::Conflict(format!("Quiz '{}' is not waiting for questions", quiz_id))
            })?;

        quiz.status = QuizStatus::Ready;
        stored.extend(questions);
        Ok(())
    }

    async fn apply_submission(
        &self,
        quiz_id: &str,
        answers: Vec<GradedAnswer>,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        let mut stored = self.questions.write().await;

        let quiz = quizzes
            .get_mut(quiz_id)
            .filter(|q| q.status == QuizStatus::Ready && q.completed_at.is_none())
            .ok_or_else(|| {
                AppError::Conflict(format!("Quiz '{}' is not open for submission", quiz_id))
            })?;

        // Validate everything before touching anything
        let mut positions = Vec::with_capacity(answers.len());
        for answer in &answers {
            let position = stored
                .iter()
                .position(|q| {
                    q.id == answer.question_id && q.quiz_id == quiz_id && q.is_correct.is_none()
                })
                .ok_or_else(|| {
                    AppError::SubmissionMismatch(format!(
                        "Question '{}' is not an open question of quiz '{}'",
                        answer.question_id, quiz_id
                    ))
                })?;
            positions.push(position);
        }

        for (answer, position) in answers.iter().zip(positions) {
            let question = &mut stored[position];
            question.chosen_choice = Some(answer.chosen_choice);
            question.is_correct = Some(answer.is_correct);
            question.quiz_completed_at = Some(completed_at);
        }
        quiz.status = QuizStatus::Complete;
        quiz.completed_at = Some(completed_at);
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn find_answered_for_topic(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> AppResult<Vec<AnsweredQuestion>> {
        let topic_snippet_ids: HashSet<String> = self
            .snippets
            .read()
            .await
            .iter()
            .filter(|s| s.topic_id == topic_id)
            .map(|s| s.id.clone())
            .collect();

        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| q.user_id == user_id && q.quiz_completed_at.is_some())
            .filter(|q| q.links_to_topic(topic_id, &topic_snippet_ids))
            .cloned()
            .collect())
    }

    async fn find_answered_for_snippet(
        &self,
        user_id: &str,
        snippet_id: &str,
    ) -> AppResult<Vec<AnsweredQuestion>> {
        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| {
                q.user_id == user_id
                    && q.quiz_completed_at.is_some()
                    && q.snippet_id.as_deref() == Some(snippet_id)
            })
            .cloned()
            .collect())
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<AnsweredQuestion>> {
        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SnippetRepository for InMemoryStore {
    async fn find_candidate_pool(&self, scope: &SnippetScope) -> AppResult<CandidatePool> {
        let mut snippets: Vec<Snippet> = self
            .snippets
            .read()
            .await
            .iter()
            .filter(|s| scope.admits(s))
            .cloned()
            .collect();
        snippets.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(CandidatePool {
            snippets,
            optimize_learning: scope.optimize_learning(),
        })
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Snippet>> {
        let snippets = self.snippets.read().await;
        Ok(snippets
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn find_by_topic(&self, topic_id: &str) -> AppResult<Vec<Snippet>> {
        let snippets = self.snippets.read().await;
        Ok(snippets
            .iter()
            .filter(|s| s.topic_id == topic_id)
            .cloned()
            .collect())
    }

    async fn find_topic(&self, topic_id: &str) -> AppResult<Option<Topic>> {
        let topics = self.topics.read().await;
        Ok(topics.iter().find(|t| t.id == topic_id).cloned())
    }

    async fn find_topics_by_course(&self, course_id: &str) -> AppResult<Vec<Topic>> {
        let mut topics: Vec<Topic> = self
            .topics
            .read()
            .await
            .iter()
            .filter(|t| t.course_id == course_id)
            .cloned()
            .collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(topics)
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
        mongo_db_name: "mastery-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        default_quiz_length: 20,
        default_options_per_question: 4,
        sampler_seed: Some(7),
    }
}

pub fn app_state(store: &Arc<InMemoryStore>) -> AppState {
    AppState::with_repositories(test_config(), store.clone(), store.clone(), store.clone())
}

/// A legacy answered question linked to its topic directly, with no snippet.
pub fn legacy_answer(
    user_id: &str,
    topic_id: &str,
    is_correct: bool,
    days_ago: i64,
    now: DateTime<Utc>,
) -> AnsweredQuestion {
    AnsweredQuestion {
        id: uuid::Uuid::new_v4().to_string(),
        quiz_id: "legacy-quiz".to_string(),
        user_id: user_id.to_string(),
        snippet_id: None,
        topic_id: Some(topic_id.to_string()),
        prompt: "Legacy question".to_string(),
        choices: vec!["A".to_string(), "B".to_string()],
        correct_choice: 0,
        chosen_choice: Some(if is_correct { 0 } else { 1 }),
        is_correct: Some(is_correct),
        quiz_completed_at: Some(now - Duration::days(days_ago)),
        created_at: Some(now - Duration::days(days_ago)),
    }
}

/// An answered question linked through a snippet.
pub fn snippet_answer(
    user_id: &str,
    snippet_id: &str,
    topic_id: &str,
    is_correct: bool,
    days_ago: i64,
    now: DateTime<Utc>,
) -> AnsweredQuestion {
    AnsweredQuestion {
        snippet_id: Some(snippet_id.to_string()),
        ..legacy_answer(user_id, topic_id, is_correct, days_ago, now)
    }
}
