use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Snippet;

/// One generated quiz question and, once the quiz is submitted, the user's answer to it.
///
/// Rows written before snippets existed only carry `topic_id`; newer rows carry
/// `snippet_id` and a copy of the snippet's topic. See [`AnsweredQuestion::links_to_topic`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnsweredQuestion {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub snippet_id: Option<String>,
    pub topic_id: Option<String>,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_choice: i16,
    pub chosen_choice: Option<i16>,
    /// Unset until the owning quiz is submitted.
    pub is_correct: Option<bool>,
    /// Copy of the owning quiz's `completed_at`, written in the submission transaction.
    pub quiz_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A graded answer ready to be written by the submission sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: String,
    pub chosen_choice: i16,
    pub is_correct: bool,
}

/// Tri-state view of [`AnsweredQuestion::is_correct`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correctness {
    Correct,
    Incorrect,
    Unanswered,
}

impl AnsweredQuestion {
    pub fn for_snippet(
        quiz_id: &str,
        user_id: &str,
        snippet: &Snippet,
        prompt: &str,
        choices: Vec<String>,
        correct_choice: i16,
    ) -> Self {
        AnsweredQuestion {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            snippet_id: Some(snippet.id.clone()),
            topic_id: Some(snippet.topic_id.clone()),
            prompt: prompt.to_string(),
            choices,
            correct_choice,
            chosen_choice: None,
            is_correct: None,
            quiz_completed_at: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn correctness(&self) -> Correctness {
        match self.is_correct {
            Some(true) => Correctness::Correct,
            Some(false) => Correctness::Incorrect,
            None => Correctness::Unanswered,
        }
    }

    /// Snippet linkage wins whenever the question carries a snippet id. The direct
    /// topic id is only consulted for rows that have no snippet id at all.
    pub fn links_to_topic(&self, topic_id: &str, topic_snippet_ids: &HashSet<String>) -> bool {
        match &self.snippet_id {
            Some(snippet_id) => topic_snippet_ids.contains(snippet_id),
            None => self.topic_id.as_deref() == Some(topic_id),
        }
    }

    pub fn is_choice_in_range(&self, choice: i16) -> bool {
        choice >= 0 && (choice as usize) < self.choices.len()
    }
}
