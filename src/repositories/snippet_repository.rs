use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::Document, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{CandidatePool, Snippet, SnippetScope, Topic},
};

pub const SNIPPETS_COLLECTION: &str = "snippets";
pub const TOPICS_COLLECTION: &str = "topics";

/// Read-only access to ingested snippets and topics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    async fn find_candidate_pool(&self, scope: &SnippetScope) -> AppResult<CandidatePool>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Snippet>>;
    async fn find_by_topic(&self, topic_id: &str) -> AppResult<Vec<Snippet>>;
    async fn find_topic(&self, topic_id: &str) -> AppResult<Option<Topic>>;
    async fn find_topics_by_course(&self, course_id: &str) -> AppResult<Vec<Topic>>;
}

pub fn scope_filter(scope: &SnippetScope) -> Document {
    match scope {
        SnippetScope::Subjects {
            course_id,
            subject_ids,
        } => doc! {
            "course_id": course_id,
            "topic_id": { "$in": subject_ids.clone() },
        },
        SnippetScope::Materials { material_ids } => doc! {
            "material_id": { "$in": material_ids.clone() },
        },
        SnippetScope::Course { course_id } => doc! { "course_id": course_id },
    }
}

pub struct MongoSnippetRepository {
    snippets: Collection<Snippet>,
    topics: Collection<Topic>,
}

impl MongoSnippetRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            snippets: db.get_collection(SNIPPETS_COLLECTION),
            topics: db.get_collection(TOPICS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for snippets and topics collections");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let course_topic_index = IndexModel::builder()
            .keys(doc! { "course_id": 1, "topic_id": 1 })
            .options(IndexOptions::builder().name("course_topic".to_string()).build())
            .build();

        let material_index = IndexModel::builder()
            .keys(doc! { "material_id": 1 })
            .options(IndexOptions::builder().name("material_id".to_string()).build())
            .build();

        let topic_course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(IndexOptions::builder().name("course_id".to_string()).build())
            .build();

        self.snippets.create_index(id_index.clone()).await?;
        self.snippets.create_index(course_topic_index).await?;
        self.snippets.create_index(material_index).await?;
        self.topics.create_index(id_index).await?;
        self.topics.create_index(topic_course_index).await?;

        log::info!("Successfully created indexes for snippets and topics collections");
        Ok(())
    }
}

#[async_trait]
impl SnippetRepository for MongoSnippetRepository {
    async fn find_candidate_pool(&self, scope: &SnippetScope) -> AppResult<CandidatePool> {
        let snippets: Vec<Snippet> = self
            .snippets
            .find(scope_filter(scope))
            .sort(doc! { "id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(CandidatePool {
            snippets,
            optimize_learning: scope.optimize_learning(),
        })
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Snippet>> {
        let snippets = self
            .snippets
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(snippets)
    }

    async fn find_by_topic(&self, topic_id: &str) -> AppResult<Vec<Snippet>> {
        let snippets = self
            .snippets
            .find(doc! { "topic_id": topic_id })
            .await?
            .try_collect()
            .await?;
        Ok(snippets)
    }

    async fn find_topic(&self, topic_id: &str) -> AppResult<Option<Topic>> {
        let topic = self.topics.find_one(doc! { "id": topic_id }).await?;
        Ok(topic)
    }

    async fn find_topics_by_course(&self, course_id: &str) -> AppResult<Vec<Topic>> {
        let topics = self
            .topics
            .find(doc! { "course_id": course_id })
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(topics)
    }
}
