use chrono::{DateTime, Utc};
use reddit_client::{Comment, Post};
use therapy_qa_common::{
    clean_text, question_id, QaMetadata, QaProvenance, QaRecord, Taxonomy, SOURCE_REDDIT,
};

const PERMALINK_BASE: &str = "https://reddit.com";

/// Raw question text: the title, followed by the body when there is one.
pub fn raw_question(post: &Post) -> String {
    if post.selftext.is_empty() {
        post.title.clone()
    } else {
        format!("{}\n\n{}", post.title, post.selftext)
    }
}

/// Compose a record from a post and one of its comments. Deterministic: the
/// same inputs always give the same record.
pub fn build_record(post: &Post, comment: &Comment, taxonomy: &Taxonomy) -> QaRecord {
    let question_text = clean_text(&raw_question(post));
    let answer_text = clean_text(comment.body.as_deref().unwrap_or_default());

    QaRecord {
        question_id: question_id(&post.id, &comment.id),
        therapeutic_modality: taxonomy.modality(&question_text, &answer_text).to_string(),
        metadata: QaMetadata {
            topic_or_issue: post.subreddit.clone(),
            complexity_level: taxonomy.complexity(&question_text, &answer_text),
            modality_specific_tag: taxonomy.modality_tag(&question_text, &answer_text).to_string(),
        },
        more: QaProvenance {
            subreddit: post.subreddit.clone(),
            source: SOURCE_REDDIT.to_string(),
            created_utc: epoch_to_utc(post.created_utc),
            url: format!("{PERMALINK_BASE}{}", post.permalink),
        },
        question_text,
        answer_text,
    }
}

/// Topic categories of a record's combined text.
pub fn record_categories(record: &QaRecord, taxonomy: &Taxonomy) -> Vec<&'static str> {
    taxonomy.categorize(&format!("{} {}", record.question_text, record.answer_text))
}

/// Reddit reports creation time as fractional epoch seconds. Out-of-range
/// values fall back to the epoch.
fn epoch_to_utc(secs: f64) -> DateTime<Utc> {
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole, nanos).unwrap_or(DateTime::UNIX_EPOCH)
}
