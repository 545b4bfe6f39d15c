// tests/ingest_config.rs
use std::path::PathBuf;
use std::{env, fs};

use topic_watch::ingest::config::{
    load_settings_default, load_settings_from, ENV_DATA_DIR, ENV_INTERVAL_SECS, ENV_KEYWORDS,
    ENV_METRICS_ADDR, ENV_PATH, ENV_SOURCE,
};
use topic_watch::Settings;

fn clear_env() {
    for k in [
        ENV_PATH,
        ENV_KEYWORDS,
        ENV_SOURCE,
        ENV_DATA_DIR,
        ENV_INTERVAL_SECS,
        ENV_METRICS_ADDR,
    ] {
        env::remove_var(k);
    }
}

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("topic_watch.toml");
    fs::write(
        &p_toml,
        r#"
keywords = [" AI automation ", "", "AI automation", "business tools"]
source = "reddit"
http_timeout_secs = 5
"#,
    )
    .unwrap();
    let s = load_settings_from(&p_toml).unwrap();
    assert_eq!(
        s.keywords,
        vec!["AI automation".to_string(), "business tools".to_string()]
    );
    assert_eq!(s.source.as_deref(), Some("reddit"));
    assert_eq!(s.http_timeout_secs, 5);

    let p_json = dir.path().join("topic_watch.json");
    fs::write(&p_json, r#"{"keywords":["rust"],"interval_secs":3600}"#).unwrap();
    let j = load_settings_from(&p_json).unwrap();
    assert_eq!(j.keywords, vec!["rust".to_string()]);
    assert_eq!(j.interval_secs, Some(3600));
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing anywhere → defaults
    assert_eq!(load_settings_default().unwrap(), Settings::default());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("topic_watch.toml"), r#"keywords = ["from toml"]"#).unwrap();
    assert_eq!(
        load_settings_default().unwrap().keywords,
        vec!["from toml".to_string()]
    );

    // 3) Explicit path wins over the fallback
    let p_env = tmp.path().join("explicit.json");
    fs::write(&p_env, r#"{"keywords":["from env path"]}"#).unwrap();
    env::set_var(ENV_PATH, p_env.display().to_string());
    assert_eq!(
        load_settings_default().unwrap().keywords,
        vec!["from env path".to_string()]
    );

    // 4) Per-field overrides on top
    env::set_var(ENV_KEYWORDS, "a, b ,,a");
    env::set_var(ENV_SOURCE, "hn");
    env::set_var(ENV_DATA_DIR, "/var/lib/topic-watch");
    env::set_var(ENV_INTERVAL_SECS, "0");
    let s = load_settings_default().unwrap();
    assert_eq!(s.keywords, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(s.source.as_deref(), Some("hn"));
    assert_eq!(s.data_dir, PathBuf::from("/var/lib/topic-watch"));
    assert_eq!(s.interval_secs, None);

    // 5) A bad override is an error, not a silent default
    env::set_var(ENV_INTERVAL_SECS, "hourly");
    assert!(load_settings_default().is_err());

    // 6) A dangling explicit path is an error too
    clear_env();
    env::set_var(ENV_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(load_settings_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}
