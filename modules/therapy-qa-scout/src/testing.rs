// Test doubles for the collection driver.
//
// - MockForum (ForumSource): HashMap-based listings and comment lists
// - MemoryStore (RecordStore): in-memory store with a uniqueness guard
//
// Plus builders for posts, comments and a zero-delay ScrapeConfig.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reddit_client::{Comment, ListingSort, Post, RedditError};
use therapy_qa_common::{QaRecord, ScrapeConfig};
use therapy_qa_store::InsertOutcome;

use crate::traits::{ForumSource, RecordStore};

/// Default creation time for test posts (2023-11-14T22:13:20Z).
pub const TEST_CREATED_UTC: f64 = 1_700_000_000.0;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A post in r/therapy with a handful of comments.
pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        selftext: String::new(),
        stickied: false,
        num_comments: 5,
        subreddit: "therapy".to_string(),
        created_utc: TEST_CREATED_UTC,
        permalink: format!("/r/therapy/comments/{id}/"),
    }
}

/// A top-level comment on whichever post it is registered for.
pub fn comment(id: &str, body: &str, score: i64) -> Comment {
    Comment {
        id: id.to_string(),
        body: Some(body.to_string()),
        score,
        parent_id: String::new(),
    }
}

/// Default run parameters with no delays, over the given forums.
pub fn test_config(forums: &[&str], target_count: usize) -> ScrapeConfig {
    ScrapeConfig {
        subreddits: forums.iter().map(|f| f.to_string()).collect(),
        target_count,
        category_delay: Duration::ZERO,
        forum_delay: Duration::ZERO,
        ..ScrapeConfig::default()
    }
}

// ---------------------------------------------------------------------------
// MockForum
// ---------------------------------------------------------------------------

/// Unregistered listings and comment lists come back empty. Every call is
/// logged as `listing:<forum>:<sort>:<limit>` or `comments:<post_id>`.
pub struct MockForum {
    listings: HashMap<(String, ListingSort), Vec<Post>>,
    comments: HashMap<String, Vec<Comment>>,
    failing_listings: HashSet<(String, ListingSort)>,
    failing_comments: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockForum {
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
            comments: HashMap::new(),
            failing_listings: HashSet::new(),
            failing_comments: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn on_listing(mut self, forum: &str, sort: ListingSort, posts: Vec<Post>) -> Self {
        self.listings.insert((forum.to_string(), sort), posts);
        self
    }

    pub fn on_comments(mut self, post_id: &str, comments: Vec<Comment>) -> Self {
        self.comments.insert(post_id.to_string(), comments);
        self
    }

    /// Make a listing fail with a 503 from the API.
    pub fn fail_listing(mut self, forum: &str, sort: ListingSort) -> Self {
        self.failing_listings.insert((forum.to_string(), sort));
        self
    }

    /// Make a comment fetch fail with a non-API error.
    pub fn fail_comments(mut self, post_id: &str) -> Self {
        self.failing_comments.insert(post_id.to_string());
        self
    }

    /// Shared handle on the call log; grab it before handing the mock away.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockForum {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForumSource for MockForum {
    async fn listing(&self, forum: &str, sort: ListingSort, limit: u32) -> Result<Vec<Post>> {
        self.record_call(format!("listing:{forum}:{sort}:{limit}"));

        let key = (forum.to_string(), sort);
        if self.failing_listings.contains(&key) {
            return Err(RedditError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            }
            .into());
        }

        let mut posts = self.listings.get(&key).cloned().unwrap_or_default();
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn comments(&self, post: &Post) -> Result<Vec<Comment>> {
        self.record_call(format!("comments:{}", post.id));

        if self.failing_comments.contains(&post.id) {
            bail!("MockForum: comment tree for {} is unreadable", post.id);
        }

        let mut comments = self.comments.get(&post.id).cloned().unwrap_or_default();
        for c in &mut comments {
            c.parent_id = post.fullname();
        }
        comments.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(comments)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Insertion-ordered in-memory store. Enforces question_id uniqueness the way
/// the Postgres primary key does.
pub struct MemoryStore {
    records: Mutex<Vec<QaRecord>>,
    failing_inserts: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failing_inserts: HashSet::new(),
        }
    }

    /// Make inserts of this key fail.
    pub fn fail_insert(mut self, question_id: &str) -> Self {
        self.failing_inserts.insert(question_id.to_string());
        self
    }

    pub fn ids(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.question_id.clone())
            .collect()
    }

    pub fn records(&self) -> Vec<QaRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn exists(&self, question_id: &str) -> Result<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.question_id == question_id))
    }

    async fn insert_if_absent(&self, record: &QaRecord) -> Result<InsertOutcome> {
        if self.failing_inserts.contains(&record.question_id) {
            bail!("MemoryStore: insert of {} rejected", record.question_id);
        }

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.question_id == record.question_id) {
            return Ok(InsertOutcome::Duplicate);
        }
        records.push(record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn documents(&self) -> Result<Vec<serde_json::Value>> {
        let records = self.records.lock().unwrap().clone();
        records
            .iter()
            .map(|r| Ok(serde_json::to_value(r)?))
            .collect()
    }
}
