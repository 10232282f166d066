pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{
    Comment, CommentNode, Credentials, Listing, ListingData, ListingSort, MoreChildren, Post,
    TimeWindow,
};

use std::future::Future;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use types::{AccessToken, MoreChildrenResponse, PostThing, TokenResponse};

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Largest page Reddit serves for a listing request.
const MAX_PAGE_SIZE: u32 = 100;

/// `/api/morechildren` rejects requests naming more than this many ids.
const MAX_MORE_CHILDREN: usize = 100;

/// Comment ordering for both the tree fetch and placeholder resolution.
const COMMENT_SORT: &str = "top";

pub struct RedditClient {
    client: reqwest::Client,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Build a client and eagerly fetch an app-only token, so bad credentials
    /// surface at startup rather than on the first listing.
    pub async fn connect(credentials: Credentials) -> Result<Self> {
        let client = Self::new(credentials);
        client.bearer().await?;
        Ok(client)
    }

    /// Current bearer token, refreshed when it is about to expire.
    async fn bearer(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let resp = self
            .client
            .post(AUTH_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = resp.json().await?;
        if let Some(err) = token.error {
            return Err(RedditError::Auth(err));
        }
        let value = token
            .access_token
            .ok_or_else(|| RedditError::Auth("response carried no access_token".to_string()))?;
        let expires_in = token.expires_in.unwrap_or(3600);
        tracing::debug!(expires_in, "Obtained Reddit access token");

        Ok(AccessToken {
            value,
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in),
        })
    }

    /// GET an OAuth endpoint and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.bearer().await?;
        let url = format!("{}{}", API_BASE, path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Page through a subreddit listing until `limit` posts have been returned
    /// or the listing runs out. Posts come back in listing order.
    pub async fn listing(&self, subreddit: &str, sort: ListingSort, limit: u32) -> Result<Vec<Post>> {
        tracing::info!(subreddit, %sort, limit, "Fetching subreddit listing");

        let path = format!("/r/{}/{}", subreddit, sort.path());
        let path = path.as_str();
        let posts = collect_pages(limit, |page_size, after| {
            let mut query = vec![
                ("limit", page_size.to_string()),
                ("raw_json", "1".to_string()),
            ];
            if let ListingSort::Top(window) = sort {
                query.push(("t", window.as_str().to_string()));
            }
            if let Some(cursor) = after {
                query.push(("after", cursor));
            }
            async move {
                self.get_json::<Listing<PostThing>>(path, &query)
                    .await
                    .map(|page| page.data)
            }
        })
        .await?;

        tracing::debug!(subreddit, %sort, count = posts.len(), "Listing fetched");
        Ok(posts)
    }

    /// Fetch the top-level comment listing of a post, placeholders included.
    pub async fn comments(&self, post_id: &str) -> Result<Vec<CommentNode>> {
        let path = format!("/comments/{}", post_id);
        let query = [
            ("sort", COMMENT_SORT.to_string()),
            ("raw_json", "1".to_string()),
        ];

        // The response is a two-element array: the post listing, then the comment listing.
        let (_post, comments): (serde_json::Value, Listing<CommentNode>) =
            self.get_json(&path, &query).await?;
        Ok(comments.data.children)
    }

    /// Expand "load more comments" placeholders. Only the first
    /// `MAX_MORE_CHILDREN` ids are requested; the rest are dropped.
    pub async fn more_children(
        &self,
        link_fullname: &str,
        children: &[String],
    ) -> Result<Vec<CommentNode>> {
        if children.is_empty() {
            return Ok(Vec::new());
        }
        let ids = children
            .iter()
            .take(MAX_MORE_CHILDREN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let query = [
            ("api_type", "json".to_string()),
            ("link_id", link_fullname.to_string()),
            ("children", ids),
            ("sort", COMMENT_SORT.to_string()),
            ("raw_json", "1".to_string()),
        ];

        let resp: MoreChildrenResponse = self.get_json("/api/morechildren", &query).await?;
        if !resp.json.errors.is_empty() {
            return Err(RedditError::Api {
                status: 200,
                message: serde_json::Value::Array(resp.json.errors).to_string(),
            });
        }
        Ok(resp.json.data.map(|d| d.things).unwrap_or_default())
    }

    /// Top-level comments of a post sorted by score descending, with one pass
    /// of placeholder resolution. Replies nested below the top level and
    /// placeholders returned by the resolution pass are discarded.
    pub async fn top_level_comments(&self, post: &Post) -> Result<Vec<Comment>> {
        let link = post.fullname();
        let nodes = self.comments(&post.id).await?;
        let (mut comments, pending) = split_placeholders(nodes);

        if !pending.is_empty() {
            tracing::debug!(post_id = %post.id, count = pending.len(), "Resolving comment placeholders");
            let resolved = self.more_children(&link, &pending).await?;
            comments.extend(top_level_only(&link, resolved));
        }

        sort_by_score(&mut comments);
        Ok(comments)
    }
}

/// Drive `fetch_page(page_size, after)` until `limit` posts are collected,
/// a page comes back empty, or the listing has no further cursor.
async fn collect_pages<F, Fut>(limit: u32, mut fetch_page: F) -> Result<Vec<Post>>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: Future<Output = Result<ListingData<PostThing>>>,
{
    let mut posts = Vec::new();
    let mut after: Option<String> = None;

    while (posts.len() as u32) < limit {
        let page_size = (limit - posts.len() as u32).min(MAX_PAGE_SIZE);
        let page = fetch_page(page_size, after.take()).await?;
        if page.children.is_empty() {
            break;
        }
        posts.extend(page.children.into_iter().map(|thing| thing.data));

        match page.after {
            Some(cursor) => after = Some(cursor),
            None => break,
        }
    }

    posts.truncate(limit as usize);
    Ok(posts)
}

/// Separate real comments from the ids hidden behind "more" placeholders.
fn split_placeholders(nodes: Vec<CommentNode>) -> (Vec<Comment>, Vec<String>) {
    let mut comments = Vec::new();
    let mut pending = Vec::new();
    for node in nodes {
        match node {
            CommentNode::Comment(c) => comments.push(c),
            CommentNode::More(more) => pending.extend(more.children),
        }
    }
    (comments, pending)
}

/// Comments replying directly to the post; nested replies and any further
/// placeholders are dropped.
fn top_level_only(link_fullname: &str, nodes: Vec<CommentNode>) -> Vec<Comment> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            CommentNode::Comment(c) if c.parent_id == link_fullname => Some(c),
            _ => None,
        })
        .collect()
}

/// Highest score first; ties keep their original order.
fn sort_by_score(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.score.cmp(&a.score));
}
