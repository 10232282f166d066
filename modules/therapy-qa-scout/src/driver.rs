// Collection driver: walk each configured forum's listings, filter comments
// into question/answer pairs, and store them idempotently.
//
// Errors are scoped: a forum failure ends that forum only (partial counts are
// kept), and a failed insert drops that record only.

use std::sync::Arc;

use anyhow::Result;
use reddit_client::{Comment, ListingSort, Post, RedditError, TimeWindow};
use therapy_qa_common::{is_valid_qa, QaRecord, ScrapeConfig, Taxonomy};
use therapy_qa_store::InsertOutcome;
use tracing::{debug, error, info, warn};

use crate::builder::{build_record, record_categories};
use crate::traits::{ForumSource, RecordStore};

/// Listing views walked for every forum, in order.
pub const LISTING_SORTS: [ListingSort; 3] = [
    ListingSort::Hot,
    ListingSort::Top(TimeWindow::Year),
    ListingSort::New,
];

/// Counters for one forum.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForumReport {
    pub forum: String,
    pub posts_seen: usize,
    pub posts_skipped: usize,
    pub comments_rejected: usize,
    /// Pairs that passed every filter, including ones already stored.
    pub collected: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed_inserts: usize,
    /// Set when the forum was cut short; counters above still hold.
    pub error: Option<String>,
}

impl ForumReport {
    fn new(forum: &str) -> Self {
        Self {
            forum: forum.to_string(),
            ..Default::default()
        }
    }
}

/// Stats from a collection run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub forums: Vec<ForumReport>,
    pub total_collected: usize,
}

impl RunReport {
    pub fn total_inserted(&self) -> usize {
        self.forums.iter().map(|f| f.inserted).sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.forums.iter().map(|f| f.duplicates).sum()
    }

    pub fn failed_forums(&self) -> usize {
        self.forums.iter().filter(|f| f.error.is_some()).count()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Collection Run Complete ===")?;
        writeln!(f, "Forums scraped:   {}", self.forums.len())?;
        writeln!(f, "Forums failed:    {}", self.failed_forums())?;
        writeln!(f, "Pairs collected:  {}", self.total_collected)?;
        writeln!(f, "Pairs inserted:   {}", self.total_inserted())?;
        writeln!(f, "Duplicates:       {}", self.total_duplicates())?;
        writeln!(f, "\nBy forum:")?;
        for forum in &self.forums {
            write!(
                f,
                "  r/{}: {} collected, {} inserted, {} duplicate",
                forum.forum, forum.collected, forum.inserted, forum.duplicates
            )?;
            if let Some(ref err) = forum.error {
                write!(f, " (stopped: {err})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct Collector {
    source: Arc<dyn ForumSource>,
    store: Arc<dyn RecordStore>,
    config: ScrapeConfig,
    taxonomy: &'static Taxonomy,
}

impl Collector {
    pub fn new(
        source: Arc<dyn ForumSource>,
        store: Arc<dyn RecordStore>,
        config: ScrapeConfig,
        taxonomy: &'static Taxonomy,
    ) -> Self {
        Self {
            source,
            store,
            config,
            taxonomy,
        }
    }

    /// Scrape every configured forum in order until the target is reached.
    /// Never fails: forum-level errors are logged and recorded in the report.
    pub async fn run(&self) -> RunReport {
        let quota = self.config.per_forum_quota();
        let mut report = RunReport::default();
        let forums = &self.config.subreddits;

        for (i, forum) in forums.iter().enumerate() {
            let forum_report = self.scrape_forum(forum, quota).await;
            report.total_collected += forum_report.collected;
            report.forums.push(forum_report);

            info!(
                forum = forum.as_str(),
                total = report.total_collected,
                "Completed scraping r/{forum}"
            );

            if report.total_collected >= self.config.target_count {
                info!(target = self.config.target_count, "Target count reached");
                break;
            }

            if i + 1 < forums.len() {
                tokio::time::sleep(self.config.forum_delay).await;
            }
        }

        info!(total = report.total_collected, "Scraping completed");
        report
    }

    /// Scrape one forum. `quota` is split evenly across the listing views.
    pub async fn scrape_forum(&self, forum: &str, quota: usize) -> ForumReport {
        info!(forum, quota, "Scraping from r/{forum}");
        let mut report = ForumReport::new(forum);

        if let Err(e) = self.scrape_forum_inner(forum, quota, &mut report).await {
            if let Some(api) = e.downcast_ref::<RedditError>() {
                error!(forum, error = %api, "Reddit API error while scraping r/{forum}");
            } else {
                error!(forum, error = %e, "Unexpected error while scraping r/{forum}");
            }
            report.error = Some(e.to_string());
        }

        report
    }

    async fn scrape_forum_inner(
        &self,
        forum: &str,
        quota: usize,
        report: &mut ForumReport,
    ) -> Result<()> {
        let limit = u32::try_from(quota / LISTING_SORTS.len()).unwrap_or(u32::MAX);

        for sort in LISTING_SORTS {
            let posts = self.source.listing(forum, sort, limit).await?;
            debug!(forum, %sort, count = posts.len(), "Listing received");

            for post in &posts {
                self.process_post(forum, post, report).await?;
            }

            tokio::time::sleep(self.config.category_delay).await;
        }

        Ok(())
    }

    async fn process_post(&self, forum: &str, post: &Post, report: &mut ForumReport) -> Result<()> {
        report.posts_seen += 1;
        if post.stickied || post.num_comments <= 0 {
            report.posts_skipped += 1;
            return Ok(());
        }

        let comments = self.source.comments(post).await?;
        for comment in &comments {
            if !self.is_admissible(post, comment) {
                report.comments_rejected += 1;
                continue;
            }

            let record = build_record(post, comment, self.taxonomy);
            debug!(
                question_id = record.question_id.as_str(),
                categories = ?record_categories(&record, self.taxonomy),
                "Built QA record"
            );

            report.collected += 1;
            self.persist(&record, report).await;

            if self.config.progress_every > 0 && report.collected % self.config.progress_every == 0 {
                info!(forum, collected = report.collected, "Collected {} Q&A pairs from r/{forum}", report.collected);
            }
        }

        Ok(())
    }

    /// Comment-level filters: a real body, enough score, enough length, and a
    /// valid question/answer shape.
    fn is_admissible(&self, post: &Post, comment: &Comment) -> bool {
        let Some(body) = comment.body.as_deref() else {
            return false;
        };

        comment.score > self.config.min_comment_score
            && body.chars().count() >= self.config.min_comment_chars
            && is_valid_qa(&post.title, &post.selftext, body)
    }

    /// Store a record once. The existence check only saves a write; the
    /// store's uniqueness constraint decides.
    async fn persist(&self, record: &QaRecord, report: &mut ForumReport) {
        let id = record.question_id.as_str();

        match self.store.exists(id).await {
            Ok(true) => {
                report.duplicates += 1;
                info!(question_id = id, "Skipping duplicate question with ID: {id}");
                return;
            }
            Ok(false) => {}
            Err(e) => warn!(question_id = id, error = %e, "Existence check failed, attempting insert"),
        }

        match self.store.insert_if_absent(record).await {
            Ok(InsertOutcome::Inserted) => report.inserted += 1,
            Ok(InsertOutcome::Duplicate) => {
                report.duplicates += 1;
                info!(question_id = id, "Skipping duplicate question with ID: {id}");
            }
            Err(e) => {
                report.failed_inserts += 1;
                error!(question_id = id, error = %e, "Error saving QA record");
            }
        }
    }
}
