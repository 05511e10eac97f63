pub mod adaptive_sampler;
pub mod mastery_engine;
pub mod progress_service;
pub mod quiz_service;

pub use adaptive_sampler::{AdaptiveSampler, SampleOutcome};
pub use mastery_engine::{MasteryEngine, TopicMastery};
pub use progress_service::ProgressService;
pub use quiz_service::{QuizDefaults, QuizService};
