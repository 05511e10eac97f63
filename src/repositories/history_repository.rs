use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{AnsweredQuestion, Snippet},
};

pub const QUESTIONS_COLLECTION: &str = "questions";

/// Source of a user's answer history. Only questions whose quiz has been
/// completed are returned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn find_answered_for_topic(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> AppResult<Vec<AnsweredQuestion>>;
    async fn find_answered_for_snippet(
        &self,
        user_id: &str,
        snippet_id: &str,
    ) -> AppResult<Vec<AnsweredQuestion>>;
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<AnsweredQuestion>>;
}

/// Filter mirroring [`AnsweredQuestion::links_to_topic`]: rows carrying a snippet id
/// match through the topic's snippets, rows without one match on the direct topic id.
pub fn topic_history_filter(user_id: &str, topic_id: &str, topic_snippet_ids: &[String]) -> Document {
    doc! {
        "user_id": user_id,
        "quiz_completed_at": { "$ne": Bson::Null },
        "$or": [
            { "snippet_id": { "$in": topic_snippet_ids.to_vec() } },
            { "snippet_id": Bson::Null, "topic_id": topic_id },
        ],
    }
}

pub struct MongoHistoryRepository {
    questions: Collection<AnsweredQuestion>,
    snippets: Collection<Snippet>,
}

impl MongoHistoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            questions: db.get_collection(QUESTIONS_COLLECTION),
            snippets: db.get_collection(super::snippet_repository::SNIPPETS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_snippet_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "snippet_id": 1 })
            .options(IndexOptions::builder().name("user_snippet".to_string()).build())
            .build();

        let user_topic_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "topic_id": 1 })
            .options(IndexOptions::builder().name("user_topic".to_string()).build())
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        self.questions.create_index(id_index).await?;
        self.questions.create_index(user_snippet_index).await?;
        self.questions.create_index(user_topic_index).await?;
        self.questions.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }

    async fn snippet_ids_for_topic(&self, topic_id: &str) -> AppResult<Vec<String>> {
        let ids = self
            .snippets
            .distinct("id", doc! { "topic_id": topic_id })
            .await?;

        Ok(ids
            .into_iter()
            .filter_map(|id| match id {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }
}

#[async_trait]
impl HistoryRepository for MongoHistoryRepository {
    async fn find_answered_for_topic(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> AppResult<Vec<AnsweredQuestion>> {
        let snippet_ids = self.snippet_ids_for_topic(topic_id).await?;
        let filter = topic_history_filter(user_id, topic_id, &snippet_ids);

        let questions = self.questions.find(filter).await?.try_collect().await?;
        Ok(questions)
    }

    async fn find_answered_for_snippet(
        &self,
        user_id: &str,
        snippet_id: &str,
    ) -> AppResult<Vec<AnsweredQuestion>> {
        let questions = self
            .questions
            .find(doc! {
                "user_id": user_id,
                "snippet_id": snippet_id,
                "quiz_completed_at": { "$ne": Bson::Null },
            })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<AnsweredQuestion>> {
        let questions = self
            .questions
            .find(doc! { "quiz_id": quiz_id })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_filter_scopes_to_user_and_completed_quizzes() {
        let filter = topic_history_filter("user-1", "trees", &["s1".to_string()]);

        assert_eq!(filter.get_str("user_id").ok(), Some("user-1"));
        let completed = filter
            .get_document("quiz_completed_at")
            .expect("completion clause");
        assert_eq!(completed.get("$ne"), Some(&Bson::Null));
    }

    #[test]
    fn topic_filter_has_both_linkage_branches() {
        let filter = topic_history_filter(
            "user-1",
            "trees",
            &["s1".to_string(), "s2".to_string()],
        );
        let branches = filter.get_array("$or").expect("linkage branches");
        assert_eq!(branches.len(), 2);

        let via_snippet = branches[0].as_document().expect("snippet branch");
        let in_list = via_snippet
            .get_document("snippet_id")
            .and_then(|d| d.get_array("$in"))
            .expect("snippet id list");
        assert_eq!(in_list.len(), 2);

        let direct = branches[1].as_document().expect("direct branch");
        assert_eq!(direct.get("snippet_id"), Some(&Bson::Null));
        assert_eq!(direct.get_str("topic_id").ok(), Some("trees"));
    }
}
