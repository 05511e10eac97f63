use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        HistoryRepository, MongoHistoryRepository, MongoQuizRepository, MongoSnippetRepository,
        QuizRepository, SnippetRepository,
    },
    services::{
        adaptive_sampler::AdaptiveSampler,
        mastery_engine::MasteryEngine,
        progress_service::ProgressService,
        quiz_service::{QuizDefaults, QuizService},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub progress_service: Arc<ProgressService>,
    pub mastery_engine: Arc<MasteryEngine>,
    /// `None` when the state is built over non-Mongo repositories.
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let history_repository = Arc::new(MongoHistoryRepository::new(&db));
        history_repository.ensure_indexes().await?;

        let snippet_repository = Arc::new(MongoSnippetRepository::new(&db));
        snippet_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let mut state = Self::with_repositories(
            config,
            quiz_repository,
            history_repository,
            snippet_repository,
        );
        state.db = Some(db);
        Ok(state)
    }

    /// Wires the services over any repository implementations.
    pub fn with_repositories(
        config: Config,
        quizzes: Arc<dyn QuizRepository>,
        history: Arc<dyn HistoryRepository>,
        snippets: Arc<dyn SnippetRepository>,
    ) -> Self {
        let mastery_engine = Arc::new(MasteryEngine::new(history.clone()));
        let sampler = Arc::new(AdaptiveSampler::new(mastery_engine.clone()));

        let defaults = QuizDefaults {
            quiz_length: config.default_quiz_length,
            options_per_question: config.default_options_per_question,
            sampler_seed: config.sampler_seed,
        };

        let quiz_service = Arc::new(QuizService::new(
            quizzes,
            history,
            snippets.clone(),
            sampler,
            defaults,
        ));
        let progress_service = Arc::new(ProgressService::new(mastery_engine.clone(), snippets));

        Self {
            quiz_service,
            progress_service,
            mastery_engine,
            db: None,
            config: Arc::new(config),
        }
    }
}
