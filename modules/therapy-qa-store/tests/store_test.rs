//! Integration tests for the Postgres document store.
//!
//! Requirements: Docker (for Postgres via testcontainers)
//!
//! Run with: cargo test -p therapy-qa-store --features test-utils --test store_test

#![cfg(feature = "test-utils")]

use chrono::DateTime;
use therapy_qa_common::{ComplexityLevel, QaMetadata, QaProvenance, QaRecord, SOURCE_REDDIT};
use therapy_qa_store::{testutil::postgres_container, InsertOutcome};

fn record(question_id: &str, created: i64) -> QaRecord {
    QaRecord {
        question_id: question_id.to_string(),
        therapeutic_modality: "Unknown".into(),
        question_text: "Why does my therapist keep asking about my childhood?".into(),
        answer_text: "Early experiences shape a lot of patterns, so it is a common place to start."
            .into(),
        metadata: QaMetadata {
            topic_or_issue: "therapy".into(),
            complexity_level: ComplexityLevel::Low,
            modality_specific_tag: "None".into(),
        },
        more: QaProvenance {
            subreddit: "therapy".into(),
            source: SOURCE_REDDIT.into(),
            created_utc: DateTime::from_timestamp(created, 0).unwrap(),
            url: format!("https://reddit.com/r/therapy/comments/{question_id}/"),
        },
    }
}

#[tokio::test]
async fn insert_is_idempotent() {
    let (_container, store) = postgres_container().await;
    let rec = record("p1_c1", 1_700_000_000);

    assert!(!store.exists("p1_c1").await.unwrap());
    assert_eq!(store.insert_if_absent(&rec).await.unwrap(), InsertOutcome::Inserted);
    assert!(store.exists("p1_c1").await.unwrap());
    assert_eq!(store.insert_if_absent(&rec).await.unwrap(), InsertOutcome::Duplicate);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn documents_round_trip_in_creation_order() {
    let (_container, store) = postgres_container().await;
    let newer = record("p2_c1", 1_700_000_500);
    let older = record("p1_c1", 1_700_000_000);
    store.insert_if_absent(&newer).await.unwrap();
    store.insert_if_absent(&older).await.unwrap();

    let docs = store.all_documents().await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["question_id"], "p1_c1");
    assert!(docs[0].get("inserted_at").is_none());

    let back: QaRecord = serde_json::from_value(docs[1].clone()).unwrap();
    assert_eq!(back, newer);
}

#[tokio::test]
async fn migrations_are_rerunnable() {
    let (_container, store) = postgres_container().await;
    store.migrate().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);
}
