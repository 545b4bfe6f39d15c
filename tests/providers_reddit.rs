// tests/providers_reddit.rs
use topic_watch::ingest::providers::reddit::RedditProvider;
use topic_watch::ingest::TRUNCATION_MARKER;
use topic_watch::{Source, SourceAdapter};

const REDDIT_JSON: &str = include_str!("fixtures/reddit_search.json");

#[tokio::test]
async fn parses_reddit_fixture() {
    let p = RedditProvider::from_fixture(REDDIT_JSON);
    let items = p.fetch("AI automation").await.expect("reddit parse ok");

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.source == Source::Reddit));
    assert!(items
        .iter()
        .all(|i| i.link.starts_with("https://www.reddit.com/r/")));
    assert_eq!(items[0].date, "2024-05-01T12:00:00Z");
    assert_eq!(items[1].title, "Zapier vs n8n & friends");
    assert_eq!(items[1].summary, "");
    assert_eq!(items[2].summary, "Post your **workflows** here.");
}

#[tokio::test]
async fn long_selftext_is_truncated_to_budget() {
    let p = RedditProvider::from_fixture(REDDIT_JSON).with_summary_budget(120);
    let items = p.fetch("AI automation").await.unwrap();

    let summary = &items[0].summary;
    assert!(summary.ends_with(TRUNCATION_MARKER), "{summary}");
    assert!(summary.chars().count() <= 120 + TRUNCATION_MARKER.len());
    assert!(summary.starts_with("Automation pipelines that glue"));
}
