use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{AnsweredQuestion, Correctness, MasteryScore},
    repositories::HistoryRepository,
};

/// Each day since completion removes this much of an answer's contribution.
pub const DECAY_PER_DAY: f64 = 0.01;

/// Linear recency discount, reaching zero after 100 whole days.
/// Completion times in the future count as zero days.
pub fn decay_factor(completed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days_elapsed = (now - completed_at).num_days().max(0);
    (1.0 - DECAY_PER_DAY * days_elapsed as f64).max(0.0)
}

/// Sums `+decay` per correct and `-decay` per incorrect answer, then clamps.
/// Unanswered questions and questions of unfinished quizzes carry no signal.
pub fn accumulate_mastery(records: &[AnsweredQuestion], now: DateTime<Utc>) -> MasteryScore {
    let sum: f64 = records
        .iter()
        .filter_map(|record| {
            let completed_at = record.quiz_completed_at?;
            let decay = decay_factor(completed_at, now);
            match record.correctness() {
                Correctness::Correct => Some(decay),
                Correctness::Incorrect => Some(-decay),
                Correctness::Unanswered => None,
            }
        })
        .sum();

    MasteryScore::from_raw(sum)
}

fn require_identity(kind: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} id must not be empty", kind)));
    }
    Ok(())
}

/// A topic's mastery together with how many graded answers it was built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopicMastery {
    pub score: MasteryScore,
    pub answered: usize,
}

pub struct MasteryEngine {
    history: Arc<dyn HistoryRepository>,
}

impl MasteryEngine {
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    pub async fn compute_mastery(
        &self,
        user_id: &str,
        topic_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<MasteryScore> {
        Ok(self.topic_mastery(user_id, topic_id, now).await?.score)
    }

    pub async fn topic_mastery(
        &self,
        user_id: &str,
        topic_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<TopicMastery> {
        require_identity("User", user_id)?;
        require_identity("Topic", topic_id)?;

        let records = self.history.find_answered_for_topic(user_id, topic_id).await?;
        let score = accumulate_mastery(&records, now);
        let answered = records
            .iter()
            .filter(|r| r.quiz_completed_at.is_some() && r.correctness() != Correctness::Unanswered)
            .count();

        log::debug!(
            "Mastery for user {} on topic {}: {:.3} from {} answers",
            user_id,
            topic_id,
            score.value(),
            answered
        );
        Ok(TopicMastery { score, answered })
    }

    pub async fn compute_snippet_mastery(
        &self,
        user_id: &str,
        snippet_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<MasteryScore> {
        require_identity("User", user_id)?;
        require_identity("Snippet", snippet_id)?;

        let records = self
            .history
            .find_answered_for_snippet(user_id, snippet_id)
            .await?;
        Ok(accumulate_mastery(&records, now))
    }
}
