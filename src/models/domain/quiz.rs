use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Quiz {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub name: String,
    pub subject_ids: Vec<String>,
    pub material_ids: Vec<String>,
    pub snippet_ids: Vec<String>, // Selected by the sampler, in draw order
    pub quiz_length: i64,
    pub options_per_question: i16,
    pub optimize_learning: bool,
    pub status: QuizStatus,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
pub enum QuizStatus {
    Pending,  // Snippets sampled, waiting for generated questions
    Ready,    // Questions attached, can be taken
    Complete, // Submitted, immutable
}

impl QuizStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizStatus::Pending => "Pending",
            QuizStatus::Ready => "Ready",
            QuizStatus::Complete => "Complete",
        }
    }
}

pub struct NewQuiz<'a> {
    pub user_id: &'a str,
    pub course_id: &'a str,
    pub name: &'a str,
    pub subject_ids: Vec<String>,
    pub material_ids: Vec<String>,
    pub quiz_length: i64,
    pub options_per_question: i16,
}

impl Quiz {
    pub fn new_pending(
        new: NewQuiz<'_>,
        snippet_ids: Vec<String>,
        optimize_learning: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id.to_string(),
            course_id: new.course_id.to_string(),
            name: new.name.to_string(),
            subject_ids: new.subject_ids,
            material_ids: new.material_ids,
            snippet_ids,
            quiz_length: new.quiz_length,
            options_per_question: new.options_per_question,
            optimize_learning,
            status: QuizStatus::Pending,
            completed_at: None,
            created_at: Some(now),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == QuizStatus::Complete || self.completed_at.is_some()
    }

    /// Questions exist once the quiz has left `Pending`.
    pub fn has_questions(&self) -> bool {
        matches!(self.status, QuizStatus::Ready | QuizStatus::Complete)
    }

    pub fn question_count(&self) -> usize {
        self.snippet_ids.len()
    }
}
