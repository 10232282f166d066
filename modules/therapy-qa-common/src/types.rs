use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance label stamped on every record collected from Reddit.
pub const SOURCE_REDDIT: &str = "reddit";

/// Coarse length tier of a question/answer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "Low",
            ComplexityLevel::Medium => "Medium",
            ComplexityLevel::High => "High",
        }
    }
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question/answer pair as persisted in the document store.
///
/// Built once from a post and one of its comments and never mutated.
/// `question_id` is `"<post_id>_<comment_id>"` and is the idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question_id: String,
    pub therapeutic_modality: String,
    pub question_text: String,
    pub answer_text: String,
    pub metadata: QaMetadata,
    pub more: QaProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaMetadata {
    pub topic_or_issue: String,
    pub complexity_level: ComplexityLevel,
    pub modality_specific_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaProvenance {
    pub subreddit: String,
    pub source: String,
    /// Post creation time; serialized as an RFC 3339 string.
    pub created_utc: DateTime<Utc>,
    pub url: String,
}

/// Compose the idempotency key for a post/comment pair.
pub fn question_id(post_id: &str, comment_id: &str) -> String {
    format!("{post_id}_{comment_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_joins_with_underscore() {
        assert_eq!(question_id("abc", "xyz"), "abc_xyz");
    }

    #[test]
    fn record_serializes_to_document_shape() {
        let record = QaRecord {
            question_id: "p1_c1".into(),
            therapeutic_modality: "CBT".into(),
            question_text: "How do I stop ruminating?".into(),
            answer_text: "Try scheduling worry time.".into(),
            metadata: QaMetadata {
                topic_or_issue: "CBT".into(),
                complexity_level: ComplexityLevel::Low,
                modality_specific_tag: "None".into(),
            },
            more: QaProvenance {
                subreddit: "CBT".into(),
                source: SOURCE_REDDIT.into(),
                created_utc: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
                url: "https://reddit.com/r/CBT/comments/p1/".into(),
            },
        };

        let doc = serde_json::to_value(&record).unwrap();
        assert_eq!(doc["metadata"]["complexity_level"], "Low");
        assert_eq!(doc["more"]["source"], "reddit");
        assert_eq!(doc["more"]["created_utc"], "2023-11-14T22:13:20Z");

        let back: QaRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(back, record);
    }
}
