use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::NewQuiz, AnsweredQuestion, GradedAnswer, Quiz, QuizStatus, Snippet, SnippetScope,
        },
        dto::{
            request::{AnswerInput, AttachQuestionsRequest, CreateQuizRequest, SubmitQuizRequest},
            response::{CreateQuizResponse, QuizResult},
        },
    },
    repositories::{HistoryRepository, QuizRepository, SnippetRepository},
    services::adaptive_sampler::AdaptiveSampler,
};

#[derive(Clone, Copy, Debug)]
pub struct QuizDefaults {
    pub quiz_length: i64,
    pub options_per_question: i16,
    pub sampler_seed: Option<u64>,
}

impl Default for QuizDefaults {
    fn default() -> Self {
        Self {
            quiz_length: 20,
            options_per_question: 4,
            sampler_seed: None,
        }
    }
}

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    history: Arc<dyn HistoryRepository>,
    snippets: Arc<dyn SnippetRepository>,
    sampler: Arc<AdaptiveSampler>,
    defaults: QuizDefaults,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        history: Arc<dyn HistoryRepository>,
        snippets: Arc<dyn SnippetRepository>,
        sampler: Arc<AdaptiveSampler>,
        defaults: QuizDefaults,
    ) -> Self {
        Self {
            quizzes,
            history,
            snippets,
            sampler,
            defaults,
        }
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.defaults.sampler_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        let quiz = self
            .quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        Ok(quiz)
    }

    pub async fn list_quizzes_for_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        self.quizzes.list_by_user(user_id, offset, limit).await
    }

    /// Questions of a quiz that has left `Pending`.
    pub async fn questions_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<AnsweredQuestion>> {
        let quiz = self.get_quiz(quiz_id).await?;
        if !quiz.has_questions() {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' is still waiting for its questions",
                quiz_id
            )));
        }
        self.history.find_by_quiz(quiz_id).await
    }

    /// Samples snippets for a new quiz and stores it as `Pending`.
    pub async fn create_quiz(
        &self,
        request: CreateQuizRequest,
        now: DateTime<Utc>,
    ) -> AppResult<CreateQuizResponse> {
        request.validate()?;

        let quiz_length = request.quiz_length.unwrap_or(self.defaults.quiz_length);
        let options_per_question = request
            .options_per_question
            .unwrap_or(self.defaults.options_per_question);

        let scope = SnippetScope::resolve(
            &request.course_id,
            &request.subject_ids,
            &request.material_ids,
        );
        let pool = self.snippets.find_candidate_pool(&scope).await?;
        let optimize_learning = pool.optimize_learning;

        let mut rng = self.rng();
        let outcome = self
            .sampler
            .select_quiz_snippets(
                pool.snippets,
                &request.user_id,
                quiz_length,
                optimize_learning,
                now,
                &mut rng,
            )
            .await?;

        let snippet_ids = outcome.snippets.iter().map(|s| s.id.clone()).collect();
        let quiz = Quiz::new_pending(
            NewQuiz {
                user_id: &request.user_id,
                course_id: &request.course_id,
                name: &request.name,
                subject_ids: request.subject_ids.clone(),
                material_ids: request.material_ids.clone(),
                quiz_length,
                options_per_question,
            },
            snippet_ids,
            optimize_learning,
            now,
        );
        let quiz = self.quizzes.create(quiz).await?;

        log::info!(
            "Created quiz {} for user {} with {} snippets (adaptive: {})",
            quiz.id,
            quiz.user_id,
            quiz.snippet_ids.len(),
            quiz.optimize_learning
        );

        Ok(CreateQuizResponse {
            quiz,
            snippets: outcome.snippets,
            truncated: outcome.truncated,
        })
    }

    /// Accepts the generated questions for a `Pending` quiz. Every question
    /// must come from a snippet the sampler selected for this quiz.
    pub async fn attach_questions(
        &self,
        quiz_id: &str,
        request: AttachQuestionsRequest,
    ) -> AppResult<Vec<AnsweredQuestion>> {
        request.validate()?;
        let quiz = self.get_quiz(quiz_id).await?;

        if quiz.status != QuizStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' already has questions",
                quiz_id
            )));
        }

        let selected: HashSet<&str> = quiz.snippet_ids.iter().map(String::as_str).collect();
        let snippets: HashMap<String, Snippet> = self
            .snippets
            .find_by_ids(&quiz.snippet_ids)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        let mut questions = Vec::with_capacity(request.questions.len());
        for input in request.questions {
            if !selected.contains(input.snippet_id.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Snippet '{}' was not selected for quiz '{}'",
                    input.snippet_id, quiz_id
                )));
            }
            if input.choices.len() != quiz.options_per_question as usize {
                return Err(AppError::ValidationError(format!(
                    "Quiz '{}' expects {} choices per question, got {}",
                    quiz_id,
                    quiz.options_per_question,
                    input.choices.len()
                )));
            }
            let snippet = snippets.get(&input.snippet_id).ok_or_else(|| {
                AppError::NotFound(format!("Snippet '{}' not found", input.snippet_id))
            })?;

            let question = AnsweredQuestion::for_snippet(
                &quiz.id,
                &quiz.user_id,
                snippet,
                &input.prompt,
                input.choices,
                input.correct_choice,
            );
            if !question.is_choice_in_range(question.correct_choice) {
                return Err(AppError::ValidationError(format!(
                    "Correct choice {} is out of range for a question with {} choices",
                    question.correct_choice,
                    question.choices.len()
                )));
            }
            questions.push(question);
        }

        self.quizzes
            .attach_questions(quiz_id, questions.clone())
            .await?;

        log::info!("Attached {} questions to quiz {}", questions.len(), quiz_id);
        Ok(questions)
    }

    /// Grades a submission and records it as a single all-or-nothing update.
    pub async fn submit_quiz(
        &self,
        quiz_id: &str,
        request: SubmitQuizRequest,
        now: DateTime<Utc>,
    ) -> AppResult<QuizResult> {
        request.validate()?;
        let quiz = self.get_quiz(quiz_id).await?;

        if quiz.is_complete() {
            return Err(AppError::Conflict(format!("Quiz '{}' was already submitted", quiz_id)));
        }
        if quiz.status != QuizStatus::Ready {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' has no questions yet",
                quiz_id
            )));
        }

        let questions = self.history.find_by_quiz(quiz_id).await?;
        let graded = grade_submission(&questions, &request.answers).inspect_err(|err| {
            log::warn!("Rejected submission for quiz {}: {}", quiz_id, err);
        })?;

        let correct_answers = graded.iter().filter(|a| a.is_correct).count() as i64;
        let total_questions = graded.len() as i64;

        self.quizzes.apply_submission(quiz_id, graded, now).await?;

        log::info!(
            "Quiz {} submitted: {}/{} correct",
            quiz_id,
            correct_answers,
            total_questions
        );

        Ok(QuizResult {
            quiz_id: quiz_id.to_string(),
            total_questions,
            correct_answers,
            completed_at: now,
        })
    }
}

/// Checks a submission against the quiz's questions and grades every answer.
/// Any problem rejects the whole submission.
pub fn grade_submission(
    questions: &[AnsweredQuestion],
    answers: &[AnswerInput],
) -> AppResult<Vec<GradedAnswer>> {
    if answers.len() != questions.len() {
        return Err(AppError::SubmissionMismatch(format!(
            "Expected {} answers, got {}",
            questions.len(),
            answers.len()
        )));
    }

    let by_id: HashMap<&str, &AnsweredQuestion> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let mut seen = HashSet::with_capacity(answers.len());

    answers
        .iter()
        .map(|answer| {
            let question = by_id.get(answer.question_id.as_str()).ok_or_else(|| {
                AppError::SubmissionMismatch(format!(
                    "Question '{}' does not belong to this quiz",
                    answer.question_id
                ))
            })?;

            if !seen.insert(answer.question_id.as_str()) {
                return Err(AppError::SubmissionMismatch(format!(
                    "Question '{}' answered more than once",
                    answer.question_id
                )));
            }
            if !question.is_choice_in_range(answer.chosen_answer_index) {
                return Err(AppError::ValidationError(format!(
                    "Answer index {} is out of range for question '{}'",
                    answer.chosen_answer_index, answer.question_id
                )));
            }

            Ok(GradedAnswer {
                question_id: answer.question_id.clone(),
                chosen_choice: answer.chosen_answer_index,
                is_correct: answer.chosen_answer_index == question.correct_choice,
            })
        })
        .collect()
}
