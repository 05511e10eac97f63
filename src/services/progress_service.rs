use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Topic,
        dto::response::{CourseProgress, SubjectProgress},
    },
    repositories::SnippetRepository,
    services::{adaptive_sampler::weight_for, mastery_engine::MasteryEngine},
};

pub struct ProgressService {
    engine: Arc<MasteryEngine>,
    snippets: Arc<dyn SnippetRepository>,
}

impl ProgressService {
    pub fn new(engine: Arc<MasteryEngine>, snippets: Arc<dyn SnippetRepository>) -> Self {
        Self { engine, snippets }
    }

    pub async fn subject_progress(
        &self,
        user_id: &str,
        topic_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<SubjectProgress> {
        let topic = self
            .snippets
            .find_topic(topic_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject with id '{}' not found", topic_id)))?;

        self.progress_for_topic(user_id, topic, now).await
    }

    pub async fn course_progress(
        &self,
        user_id: &str,
        course_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<CourseProgress> {
        let topics = self.snippets.find_topics_by_course(course_id).await?;

        let subjects = try_join_all(
            topics
                .into_iter()
                .map(|topic| self.progress_for_topic(user_id, topic, now)),
        )
        .await?;

        Ok(CourseProgress {
            course_id: course_id.to_string(),
            subjects,
        })
    }

    async fn progress_for_topic(
        &self,
        user_id: &str,
        topic: Topic,
        now: DateTime<Utc>,
    ) -> AppResult<SubjectProgress> {
        let report = self.engine.topic_mastery(user_id, &topic.id, now).await?;
        let mastery = report.score.value();

        let snippets = self.snippets.find_by_topic(&topic.id).await?;
        let snippet_scores = try_join_all(
            snippets
                .iter()
                .map(|s| self.engine.compute_snippet_mastery(user_id, &s.id, now)),
        )
        .await?;

        let average_snippet_mastery = if snippet_scores.is_empty() {
            0.0
        } else {
            snippet_scores.iter().map(|s| s.value()).sum::<f64>() / snippet_scores.len() as f64
        };

        Ok(SubjectProgress {
            topic_id: topic.id,
            topic_name: topic.name,
            mastery,
            average_snippet_mastery,
            sampling_weight: weight_for(mastery),
            answered_questions: report.answered as i64,
        })
    }
}
