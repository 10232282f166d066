use chrono::{DateTime, Utc};
use serde::Deserialize;

/// App-only OAuth credentials for a Reddit "script" or "web" application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Response from the `/api/v1/access_token` endpoint.
/// Reddit answers some auth failures with status 200 and an `error` field.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Treat the token as expired a minute early so a request never races the deadline.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(60) < self.expires_at
    }
}

/// Top-by-score window for the `top` listing. Only the yearly window is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Year,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Year => "year",
        }
    }
}

/// Subreddit listing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingSort {
    Hot,
    Top(TimeWindow),
    New,
}

impl ListingSort {
    pub fn path(&self) -> &'static str {
        match self {
            ListingSort::Hot => "hot",
            ListingSort::Top(_) => "top",
            ListingSort::New => "new",
        }
    }
}

impl std::fmt::Display for ListingSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingSort::Top(window) => write!(f, "top/{}", window.as_str()),
            other => f.write_str(other.path()),
        }
    }
}

/// Generic Reddit listing envelope: `{"kind": "Listing", "data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    pub after: Option<String>,
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
}

/// A `t3` wrapper. The kind is implied by the listing it came from.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostThing {
    pub data: Post,
}

/// A submission (`t3`).
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub num_comments: i64,
    pub subreddit: String,
    pub created_utc: f64,
    pub permalink: String,
}

impl Post {
    /// Reddit "fullname" used for `link_id` parameters and comment `parent_id`s.
    pub fn fullname(&self) -> String {
        format!("t3_{}", self.id)
    }
}

/// A comment (`t1`). `body` is absent on some placeholder rows.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub parent_id: String,
}

/// A "load more comments" placeholder; only the hidden ids are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildren {
    #[serde(default)]
    pub children: Vec<String>,
}

/// One entry in a comment tree listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentNode {
    #[serde(rename = "t1")]
    Comment(Comment),
    #[serde(rename = "more")]
    More(MoreChildren),
}

/// Envelope for `/api/morechildren?api_type=json`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MoreChildrenResponse {
    pub json: MoreChildrenJson,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MoreChildrenJson {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    pub data: Option<MoreChildrenData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<CommentNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_post_listing() {
        let raw = json!({
            "kind": "Listing",
            "data": {
                "after": "t3_abc",
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "abc",
                        "title": "Why does my therapist keep asking about my childhood?",
                        "selftext": "",
                        "score": 42,
                        "stickied": false,
                        "num_comments": 7,
                        "subreddit": "therapy",
                        "created_utc": 1700000000.0,
                        "permalink": "/r/therapy/comments/abc/why_does/"
                    }
                }]
            }
        });
        let listing: Listing<PostThing> = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t3_abc"));
        let post = &listing.data.children[0].data;
        assert_eq!(post.fullname(), "t3_abc");
        assert_eq!(post.num_comments, 7);
        assert!(!post.stickied);
    }

    #[test]
    fn parses_comments_and_placeholders() {
        let raw = json!({
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [
                    {"kind": "t1", "data": {"id": "c1", "body": "hello", "score": 5, "parent_id": "t3_abc"}},
                    {"kind": "more", "data": {"id": "m1", "count": 2, "parent_id": "t3_abc", "children": ["c2", "c3"]}}
                ]
            }
        });
        let listing: Listing<CommentNode> = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.data.children.len(), 2);
        match &listing.data.children[1] {
            CommentNode::More(more) => assert_eq!(more.children, vec!["c2", "c3"]),
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn comment_without_body_parses() {
        let raw = json!({"kind": "t1", "data": {"id": "c9", "score": 1, "parent_id": "t3_abc"}});
        let node: CommentNode = serde_json::from_value(raw).unwrap();
        match node {
            CommentNode::Comment(c) => assert!(c.body.is_none()),
            other => panic!("expected comment, got {other:?}"),
        }
    }

    #[test]
    fn listing_sort_display() {
        assert_eq!(ListingSort::Hot.to_string(), "hot");
        assert_eq!(ListingSort::Top(TimeWindow::Year).to_string(), "top/year");
    }

    #[test]
    fn token_freshness_has_margin() {
        let now = Utc::now();
        let token = AccessToken {
            value: "t".into(),
            expires_at: now + chrono::Duration::seconds(30),
        };
        assert!(!token.is_fresh(now));
        let token = AccessToken {
            value: "t".into(),
            expires_at: now + chrono::Duration::seconds(3600),
        };
        assert!(token.is_fresh(now));
    }
}
