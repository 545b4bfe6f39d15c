// tests/pipeline_e2e.rs
mod common;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use common::{FailingAdapter, StaticAdapter};
use topic_watch::ingest::providers::hacker_news::HackerNewsProvider;
use topic_watch::ingest::providers::reddit::RedditProvider;
use topic_watch::ingest::TRUNCATION_MARKER;
use topic_watch::{run, Item, PipelineError, Registry, RunConfig, Source};

fn run_config(dataset: &Path, source: Option<&str>) -> RunConfig {
    RunConfig {
        keyword: "AI automation".to_string(),
        source: source.map(str::to_string),
        dataset: dataset.to_path_buf(),
    }
}

fn rows(path: &Path) -> Vec<Item> {
    let mut rdr = csv::Reader::from_path(path).expect("dataset exists");
    rdr.deserialize().collect::<Result<_, _>>().expect("rows parse")
}

#[tokio::test]
async fn partial_failure_still_persists_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let registry = Registry::new()
        .with(FailingAdapter(Source::Reddit))
        .with(StaticAdapter::new(Source::GoogleNews, &["https://g/1", "https://g/2"]))
        .with(StaticAdapter::new(
            Source::HackerNews,
            &["https://h/1", "https://h/2", "https://h/3"],
        ));

    let report = run(&run_config(&dataset, None), &registry).await.unwrap();
    assert_eq!(report.saved, 5);
    assert_eq!(report.failed_sources, vec![Source::Reddit]);
    assert_eq!(rows(&dataset).len(), 5);
}

#[tokio::test]
async fn second_run_is_idempotent_and_links_stay_unique() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let registry = Registry::new()
        .with(StaticAdapter::new(Source::Reddit, &["https://r/1", "https://shared/1"]))
        .with(StaticAdapter::new(Source::HackerNews, &["https://shared/1", "https://h/1"]));
    let rc = run_config(&dataset, None);

    let first = run(&rc, &registry).await.unwrap();
    assert_eq!(first.saved, 3);
    assert_eq!(first.skipped, 1);

    let second = run(&rc, &registry).await.unwrap();
    assert_eq!(second.previously_seen, 3);
    assert_eq!(second.saved, 0);
    assert_eq!(second.skipped, 4);

    let all = rows(&dataset);
    let unique: HashSet<&str> = all.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(all.len(), unique.len());
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn repeated_link_is_owned_by_first_registered_source() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let registry = Registry::new()
        .with(StaticAdapter::new(Source::HackerNews, &["https://x/1"]))
        .with(StaticAdapter::new(Source::GoogleNews, &["https://x/1"]));

    run(&run_config(&dataset, None), &registry).await.unwrap();

    let all = rows(&dataset);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].link, "https://x/1");
    assert_eq!(all[0].source, Source::HackerNews);
}

#[tokio::test]
async fn long_summaries_are_persisted_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let registry = Registry::new().with(
        RedditProvider::from_fixture(include_str!("fixtures/reddit_search.json"))
            .with_summary_budget(100),
    );

    run(&run_config(&dataset, None), &registry).await.unwrap();

    let all = rows(&dataset);
    assert_eq!(all.len(), 3);
    let s = &all[0].summary;
    assert!(s.ends_with(TRUNCATION_MARKER));
    assert!(s.chars().count() <= 100 + TRUNCATION_MARKER.len());
}

#[tokio::test]
async fn selector_limits_the_run_to_one_source() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let registry = Registry::new()
        .with(StaticAdapter::new(Source::Reddit, &["https://r/1"]))
        .with(HackerNewsProvider::from_fixture(include_str!(
            "fixtures/hn_search.json"
        )));

    let report = run(&run_config(&dataset, Some("hn")), &registry)
        .await
        .unwrap();
    assert_eq!(report.saved, 3);
    assert!(rows(&dataset).iter().all(|i| i.source == Source::HackerNews));
}

#[tokio::test]
async fn unknown_selector_saves_nothing_and_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let registry = Registry::new().with(StaticAdapter::new(Source::Reddit, &["https://r/1"]));

    let report = run(&run_config(&dataset, Some("altavista")), &registry)
        .await
        .unwrap();
    assert_eq!(report.fetched, 0);
    assert_eq!(report.saved, 0);
    assert!(!dataset.exists());
}

#[tokio::test]
async fn unreachable_source_is_a_logged_failure_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("d.csv");
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    let registry = Registry::new()
        // Port 9 (discard) is closed on test hosts; the connect is refused.
        .with(RedditProvider::from_url("http://127.0.0.1:9/search.json", client))
        .with(StaticAdapter::new(Source::GoogleNews, &["https://g/1"]));

    let report = run(&run_config(&dataset, None), &registry).await.unwrap();
    assert_eq!(report.failed_sources, vec![Source::Reddit]);
    assert_eq!(report.saved, 1);
}

#[tokio::test]
async fn unwritable_dataset_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("taken");
    fs::create_dir(&dataset).unwrap();
    let registry = Registry::new().with(StaticAdapter::new(Source::Reddit, &["https://r/1"]));

    let err = run(&run_config(&dataset, None), &registry)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Load(_) | PipelineError::Append(_)), "{err}");
}
