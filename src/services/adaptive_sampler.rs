use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use rand::Rng;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Snippet,
    services::mastery_engine::MasteryEngine,
};

/// Sampling weight for a topic's mastery. Always positive, so no topic is ever
/// excluded from future quizzes.
///
/// Mastery produced by [`MasteryEngine`] is never negative; the second branch
/// serves mastery sources that are not clamped at zero.
pub fn weight_for(mastery: f64) -> f64 {
    if mastery >= 0.0 {
        1.0 / (1.0 + mastery)
    } else {
        1.0 + mastery.abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutcome {
    /// Selected snippets in draw order, no duplicates.
    pub snippets: Vec<Snippet>,
    /// More snippets were requested than the pool holds.
    pub truncated: bool,
}

impl SampleOutcome {
    fn empty() -> Self {
        Self {
            snippets: Vec::new(),
            truncated: false,
        }
    }
}

/// Draws `count` items without replacement, each draw proportional to the
/// weights of the items still remaining.
pub fn draw_without_replacement<T, R>(mut remaining: Vec<(T, f64)>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let mut selected = Vec::with_capacity(count.min(remaining.len()));

    while selected.len() < count && !remaining.is_empty() {
        let total: f64 = remaining.iter().map(|(_, w)| w.max(0.0)).sum();

        let index = if total > 0.0 && total.is_finite() {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            remaining
                .iter()
                .position(|(_, w)| {
                    cumulative += w.max(0.0);
                    target < cumulative
                })
                // Rounding can leave target just past the last bucket
                .unwrap_or(remaining.len() - 1)
        } else {
            rng.gen_range(0..remaining.len())
        };

        let (item, _) = remaining.swap_remove(index);
        selected.push(item);
    }

    selected
}

pub struct AdaptiveSampler {
    engine: Arc<MasteryEngine>,
}

impl AdaptiveSampler {
    pub fn new(engine: Arc<MasteryEngine>) -> Self {
        Self { engine }
    }

    /// Weight per distinct topic in the pool. Topics are independent, so their
    /// mastery is computed concurrently.
    pub async fn topic_weights(
        &self,
        pool: &[Snippet],
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<HashMap<String, f64>> {
        let topics: BTreeSet<&str> = pool.iter().map(|s| s.topic_id.as_str()).collect();

        let scores = try_join_all(topics.iter().map(|topic_id| async move {
            let score = self.engine.compute_mastery(user_id, topic_id, now).await?;
            Ok::<_, AppError>((topic_id.to_string(), weight_for(score.value())))
        }))
        .await?;

        Ok(scores.into_iter().collect())
    }

    /// Picks `quiz_length` distinct snippets from `pool`, biased toward topics the
    /// user has not mastered. With `optimize_learning` off every snippet weighs the same.
    pub async fn select_quiz_snippets<R>(
        &self,
        pool: Vec<Snippet>,
        user_id: &str,
        quiz_length: i64,
        optimize_learning: bool,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> AppResult<SampleOutcome>
    where
        R: Rng + Send + ?Sized,
    {
        if quiz_length <= 0 {
            return Ok(SampleOutcome::empty());
        }
        if pool.is_empty() {
            return Err(AppError::EmptyPool(format!(
                "No snippets available for a quiz of {} questions",
                quiz_length
            )));
        }
        if user_id.trim().is_empty() {
            return Err(AppError::ValidationError("User id must not be empty".to_string()));
        }

        let requested = quiz_length as usize;
        if requested >= pool.len() {
            let truncated = requested > pool.len();
            if truncated {
                log::warn!(
                    "Requested {} snippets but only {} available for user {}; using the whole pool",
                    requested,
                    pool.len(),
                    user_id
                );
            }
            return Ok(SampleOutcome {
                snippets: pool,
                truncated,
            });
        }

        let weighted: Vec<(Snippet, f64)> = if optimize_learning {
            let weights = self.topic_weights(&pool, user_id, now).await?;
            pool.into_iter()
                .map(|snippet| {
                    let weight = weights.get(&snippet.topic_id).copied().unwrap_or(1.0);
                    (snippet, weight)
                })
                .collect()
        } else {
            pool.into_iter().map(|snippet| (snippet, 1.0)).collect()
        };

        log::debug!(
            "Drawing {} of {} snippets for user {} (adaptive: {})",
            requested,
            weighted.len(),
            user_id,
            optimize_learning
        );

        Ok(SampleOutcome {
            snippets: draw_without_replacement(weighted, requested, rng),
            truncated: false,
        })
    }
}
