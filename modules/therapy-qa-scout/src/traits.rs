// Trait seams for the collection driver.
//
// ForumSource wraps the Reddit client; RecordStore wraps the Postgres store.
// Both have in-memory doubles in `testing`, so the driver can be exercised
// with no network and no database.

use anyhow::Result;
use async_trait::async_trait;
use reddit_client::{Comment, ListingSort, Post, RedditClient};
use therapy_qa_common::QaRecord;
use therapy_qa_store::{InsertOutcome, QaStore};

// ---------------------------------------------------------------------------
// ForumSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ForumSource: Send + Sync {
    /// Up to `limit` posts from one listing view, in listing order.
    async fn listing(&self, forum: &str, sort: ListingSort, limit: u32) -> Result<Vec<Post>>;

    /// Top-level comments of a post, highest score first, placeholders resolved once.
    async fn comments(&self, post: &Post) -> Result<Vec<Comment>>;
}

#[async_trait]
impl ForumSource for RedditClient {
    async fn listing(&self, forum: &str, sort: ListingSort, limit: u32) -> Result<Vec<Post>> {
        Ok(self.listing(forum, sort, limit).await?)
    }

    async fn comments(&self, post: &Post) -> Result<Vec<Comment>> {
        Ok(self.top_level_comments(post).await?)
    }
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn exists(&self, question_id: &str) -> Result<bool>;

    /// Idempotent insert keyed by `question_id`.
    async fn insert_if_absent(&self, record: &QaRecord) -> Result<InsertOutcome>;

    /// Every stored document, without storage bookkeeping.
    async fn documents(&self) -> Result<Vec<serde_json::Value>>;
}

#[async_trait]
impl RecordStore for QaStore {
    async fn exists(&self, question_id: &str) -> Result<bool> {
        Ok(self.exists(question_id).await?)
    }

    async fn insert_if_absent(&self, record: &QaRecord) -> Result<InsertOutcome> {
        Ok(self.insert_if_absent(record).await?)
    }

    async fn documents(&self) -> Result<Vec<serde_json::Value>> {
        Ok(self.all_documents().await?)
    }
}
