use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{AnsweredQuestion, Quiz, Snippet};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct CreateQuizResponse {
    pub quiz: Quiz,
    pub snippets: Vec<Snippet>,
    /// The pool held fewer snippets than requested; the whole pool was used.
    pub truncated: bool,
}

/// A question as shown to the user taking the quiz, without the answer key.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionForTaking {
    pub id: String,
    pub snippet_id: Option<String>,
    pub prompt: String,
    pub choices: Vec<String>,
}

impl From<AnsweredQuestion> for QuestionForTaking {
    fn from(question: AnsweredQuestion) -> Self {
        QuestionForTaking {
            id: question.id,
            snippet_id: question.snippet_id,
            prompt: question.prompt,
            choices: question.choices,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizResult {
    pub quiz_id: String,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubjectProgress {
    pub topic_id: String,
    pub topic_name: String,
    pub mastery: f64,
    pub average_snippet_mastery: f64,
    pub sampling_weight: f64,
    pub answered_questions: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct CourseProgress {
    pub course_id: String,
    pub subjects: Vec<SubjectProgress>,
}

#[derive(Debug, Serialize, SimpleObject)]
#[graphql(concrete(name = "PaginatedQuizzes", params(Quiz)))]
pub struct PaginatedResponse<T: async_graphql::OutputType> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}
