//! Integration tests for the generate pipeline.
//!
//! Each test lays out a raw data directory and a config file in a temp
//! directory and drives the same functions the CLI calls.

// Allow panic in tests - standard for test code
#![allow(clippy::panic)]

use seedtrust::cli::{build_report, cmd_discover, cmd_generate};
use seedtrust::config::{load_config, parse_config};
use seedtrust_core::TrustError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

const CONFIG: &str = r#"
[trust_weights]
follow = 30
mention = 30
reply = 20
retweet = 50
quote = 40

[seed_graph]
builders = ["alice", "@Bob"]

[output]
raw_data_dir = "raw"
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("raw")).expect("raw dir");
        std::fs::write(dir.path().join("config.toml"), config).expect("config");
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn raw(&self, name: &str, body: &str) {
        std::fs::write(self.dir.path().join("raw").join(name), body).expect("raw file");
    }

    fn default_output(&self) -> PathBuf {
        self.dir.path().join("trust").join("seed_graph.csv")
    }

    fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("read artifact")
    }
}

fn generate(ws: &Workspace) -> Result<(), TrustError> {
    cmd_generate(&ws.config_path(), true, None, None, None)
}

// =============================================================================
// GENERATE
// =============================================================================

#[test]
fn follow_reply_mention_sum_to_eighty() {
    let ws = Workspace::new(CONFIG);
    ws.raw(
        "alice_seed_followings.json",
        r#"{"seed_users": [{"username": "alice"}], "master_list": [{"username": "bob"}]}"#,
    );
    ws.raw(
        "bob_seed_extended_followings.json",
        r#"{"users": [{"username": "Alice", "following": ["@bob"]}]}"#,
    );
    ws.raw(
        "alice_seed_interactions.json",
        r#"{"users": [{"username": "alice", "replies": [
            {"post_id": 9, "text": "great point @bob", "reply_to_username": "bob"}
        ]}]}"#,
    );

    generate(&ws).expect("generate");

    assert_eq!(ws.read(&ws.default_output()), "i,j,v\nalice,bob,80\n");
}

#[test]
fn post_shared_between_seeds_counts_once() {
    let ws = Workspace::new(CONFIG);
    let interactions = r#"{"users": [{"username": "carol", "posts": [
        {"post_id": "p1", "text": "rt", "is_retweet": true,
         "original_post_creator_username": "dave"}
    ]}]}"#;
    ws.raw("alice_seed_interactions.json", interactions);
    ws.raw("bob_seed_interactions.json", interactions);

    let config = load_config(&ws.config_path()).expect("config");
    let report =
        build_report(&config, &ws.dir.path().join("raw")).expect("report");

    assert_eq!(report.edges.to_csv(), "i,j,v\ncarol,dave,50\n");
    assert_eq!(report.stats.duplicate_posts, 1);
}

#[test]
fn missing_and_broken_files_are_tolerated() {
    let ws = Workspace::new(CONFIG);
    ws.raw("alice_seed_followings.json", "this is not json");
    ws.raw(
        "bob_seed_followings.json",
        r#"{"seed_users": [{"username": "bob"}], "master_list": [{"username": "erin"}]}"#,
    );

    let config = load_config(&ws.config_path()).expect("config");
    let report =
        build_report(&config, &ws.dir.path().join("raw")).expect("report");

    assert_eq!(report.edges.to_csv(), "i,j,v\nbob,erin,30\n");
    assert_eq!(report.stats.unreadable_inputs, 1);
    assert_eq!(report.stats.missing_inputs, 4);
}

#[test]
fn empty_inputs_still_write_header() {
    let ws = Workspace::new(CONFIG);
    generate(&ws).expect("generate");
    assert_eq!(ws.read(&ws.default_output()), "i,j,v\n");
}

#[test]
fn explicit_output_and_summary() {
    let ws = Workspace::new(CONFIG);
    ws.raw(
        "alice_seed_followings.json",
        r#"{"seed_users": [{"username": "alice"}], "master_list": [{"username": "bob"}, {"username": "alice"}]}"#,
    );
    let out = ws.dir.path().join("custom").join("edges.csv");
    let summary = ws.dir.path().join("summary.json");

    cmd_generate(&ws.config_path(), true, None, Some(&out), Some(&summary)).expect("generate");

    assert_eq!(ws.read(&out), "i,j,v\nalice,bob,30\n");
    assert!(!ws.default_output().exists());

    let parsed: serde_json::Value =
        serde_json::from_str(&ws.read(&summary)).expect("summary json");
    assert_eq!(parsed["rows"], 1);
    assert_eq!(parsed["seeds"], 2);
    assert_eq!(parsed["stats"]["self_loops_dropped"], 1);
    assert_eq!(parsed["blake3"].as_str().map(str::len), Some(64));
}

#[test]
fn reruns_are_byte_identical() {
    let ws = Workspace::new(CONFIG);
    ws.raw(
        "bob_seed_interactions.json",
        r#"{"users": [{"username": "bob", "posts": [
            {"post_id": 1, "text": "@zed @amy @zed hi"},
            {"post_id": 2, "text": "look", "is_quote": true,
             "original_post_creator_username": "amy"}
        ]}]}"#,
    );

    generate(&ws).expect("first run");
    let first = ws.read(&ws.default_output());
    generate(&ws).expect("second run");

    assert_eq!(first, "i,j,v\nbob,amy,70\nbob,zed,30\n");
    assert_eq!(ws.read(&ws.default_output()), first);
}

#[test]
fn raw_dir_override_is_used() {
    let ws = Workspace::new(CONFIG);
    let elsewhere = ws.dir.path().join("elsewhere");
    std::fs::create_dir(&elsewhere).expect("dir");
    std::fs::write(
        elsewhere.join("alice_seed_followings.json"),
        r#"{"seed_users": [{"username": "alice"}], "master_list": [{"username": "zoe"}]}"#,
    )
    .expect("write");

    cmd_generate(&ws.config_path(), true, Some(&elsewhere), None, None).expect("generate");
    assert_eq!(ws.read(&ws.default_output()), "i,j,v\nalice,zoe,30\n");
}

#[test]
fn retweet_of_a_quote_counts_as_retweet_only() {
    let ws = Workspace::new(CONFIG);
    ws.raw(
        "alice_seed_interactions.json",
        r#"{"users": [{"username": "alice", "posts": [
            {"post_id": 1, "is_retweet": true, "is_quote": {"id": 5},
             "original_post_creator_username": "bob"}
        ]}]}"#,
    );

    generate(&ws).expect("generate");
    assert_eq!(ws.read(&ws.default_output()), "i,j,v\nalice,bob,50\n");
}

#[test]
fn followings_without_master_list_keep_extended_follows() {
    let ws = Workspace::new(CONFIG);
    ws.raw(
        "alice_seed_followings.json",
        r#"{"seed_users": [{"username": "alice"}]}"#,
    );
    ws.raw(
        "alice_seed_extended_followings.json",
        r#"{"users": [{"username": "carl", "following": ["dora"]}]}"#,
    );

    generate(&ws).expect("generate");
    assert_eq!(ws.read(&ws.default_output()), "i,j,v\ncarl,dora,30\n");
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn bad_config_writes_nothing() {
    let ws = Workspace::new(&CONFIG.replace("quote = 40", "quote = \"lots\""));
    ws.raw(
        "alice_seed_followings.json",
        r#"{"seed_users": [{"username": "alice"}], "master_list": [{"username": "bob"}]}"#,
    );

    let result = generate(&ws);

    assert!(matches!(result, Err(TrustError::Configuration(_))));
    assert!(!ws.default_output().exists());
}

#[test]
fn missing_config_is_configuration_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = cmd_generate(&dir.path().join("absent.toml"), true, None, None, None);
    assert!(matches!(result, Err(TrustError::Configuration(_))));
}

#[test]
fn unknown_weight_kind_is_rejected() {
    let raw = CONFIG.replace("quote = 40", "quote = 40\nlike = 5");
    assert!(matches!(
        parse_config(&raw, Path::new(".")),
        Err(TrustError::Configuration(_))
    ));
}

#[test]
fn discover_lists_without_writing() {
    let ws = Workspace::new(CONFIG);
    cmd_discover(&ws.config_path(), true, None).expect("discover");
    assert!(!ws.default_output().exists());
}

#[test]
fn failed_summary_write_leaves_no_artifact() {
    let ws = Workspace::new(CONFIG);
    ws.raw(
        "alice_seed_followings.json",
        r#"{"seed_users": [{"username": "alice"}], "master_list": [{"username": "bob"}]}"#,
    );
    let blocker = ws.dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("blocker");
    let out = ws.dir.path().join("out").join("edges.csv");

    let result = cmd_generate(
        &ws.config_path(),
        true,
        None,
        Some(&out),
        Some(&blocker.join("summary.json")),
    );

    assert!(matches!(result, Err(TrustError::WriteFailure(_))));
    assert!(!out.exists());
}
