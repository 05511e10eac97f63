use async_graphql::InputObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,

    #[validate(length(min = 1, max = 64))]
    pub course_id: String,

    #[validate(length(min = 1, max = 1000))]
    pub name: String,

    // Non-empty subjects switch adaptive weighting off
    #[serde(default)]
    #[graphql(default)]
    pub subject_ids: Vec<String>,

    #[serde(default)]
    #[graphql(default)]
    pub material_ids: Vec<String>,

    #[validate(range(min = 1, max = 200))]
    pub quiz_length: Option<i64>,

    #[validate(range(min = 2, max = 10))]
    pub options_per_question: Option<i16>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct GeneratedQuestionInput {
    #[validate(length(min = 1))]
    pub snippet_id: String,

    #[validate(length(min = 1, max = 3000))]
    pub prompt: String,

    #[validate(length(min = 2, max = 10))]
    pub choices: Vec<String>,

    pub correct_choice: i16,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AttachQuestionsRequest {
    #[validate(length(min = 1), nested)]
    pub questions: Vec<GeneratedQuestionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AnswerInput {
    #[validate(length(min = 1))]
    pub question_id: String,
    pub chosen_answer_index: i16,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitQuizRequest {
    #[validate(nested)]
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
