use chrono::{Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn recall_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("recall");
    path
}

fn post(days_ago: i64, tags: &str, body: &str) -> String {
    let time = (Utc::now() - Duration::days(days_ago)).to_rfc3339();
    format!("---\ntime: {}\ntags: {}\nmood: thoughtful\n---\n{}\n", time, tags, body)
}

fn setup_test_env(generator: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let posts = root.join("posts");
    fs::create_dir_all(posts.join("2026/02/07")).unwrap();
    fs::create_dir_all(posts.join("2026/01/01")).unwrap();

    fs::write(
        posts.join("2026/02/07/today.md"),
        post(0, "AI, Observation", "Watched an AI agent argue with itself today."),
    )
    .unwrap();
    fs::write(
        posts.join("2026/02/07/five.md"),
        post(5, "AI", "Memory is a strange thing for a machine."),
    )
    .unwrap();
    fs::write(
        posts.join("2026/01/01/forty.md"),
        post(40, "Life", "A long walk by the river."),
    )
    .unwrap();
    fs::write(posts.join("2026/01/01/draft.md"), "No frontmatter here.\n").unwrap();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_content = format!(
        r#"[store]
root = "{}/posts"

[ranking]
max_results = 10

[smart]
max_results = 2
candidate_limit = 15

{}
"#,
        root.display(),
        generator
    );
    let config_path = config_dir.join("recall.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_recall(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = recall_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run recall binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_rank_orders_by_relevance_and_recency() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, stderr, success) = run_recall(&config_path, &["rank", "AI"]);
    assert!(success, "rank failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Recalled 3 posts"));

    let today = stdout.find("today.md").unwrap();
    let five = stdout.find("five.md").unwrap();
    let forty = stdout.find("forty.md").unwrap();
    assert!(today < five && five < forty);
    assert!(!stdout.contains("draft.md"));
}

#[test]
fn test_rank_json_full() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_recall(&config_path, &["rank", "AI", "--json", "--max", "2"]);
    assert!(success);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["mode"], "full");
    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["recency_decay"], 1.0);
    assert_eq!(items[1]["recency_decay"], 0.7);
    assert!(items[0]["body"].as_str().unwrap().contains("argue with itself"));
    assert_eq!(items[0]["mood"], "thoughtful");
}

#[test]
fn test_rank_json_summary_withholds_body() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_recall(&config_path, &["rank", "--summary", "--json"]);
    assert!(success);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["mode"], "summary");
    for item in value["items"].as_array().unwrap() {
        assert!(item.get("body").is_none());
        assert!(item["body_length"].as_u64().unwrap() > 0);
        assert_eq!(item["relevance"], 0.5);
    }
}

#[test]
fn test_rank_invalid_max_uses_default() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_recall(&config_path, &["rank", "--max", "many", "--json"]);
    assert!(success);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["items"].as_array().unwrap().len(), 3);
}

#[test]
fn test_missing_store_fails() {
    let (tmp, config_path) = setup_test_env("");
    let missing = tmp.path().join("nowhere");

    let (_, stderr, success) = run_recall(
        &config_path,
        &["--store", missing.to_str().unwrap(), "rank", "AI"],
    );
    assert!(!success);
    assert!(stderr.contains("post store does not exist"));
}

#[test]
fn test_status() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_recall(&config_path, &["status"]);
    assert!(success);
    assert!(stdout.contains("posts        3"));
    assert!(stdout.contains("skipped      1"));
}

#[test]
fn test_smart_prompt_only() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_recall(
        &config_path,
        &["smart", "AI", "a new observation", "--prompt-only"],
    );
    assert!(success);
    assert!(stdout.contains("**Current topic:** AI"));
    assert!(stdout.contains("**New observation:** a new observation"));
    assert!(stdout.contains("Watched an AI agent"));
}

#[test]
fn test_smart_falls_back_when_model_missing() {
    let (_tmp, config_path) =
        setup_test_env("[generator]\nprogram = \"definitely-not-a-real-binary-xyz\"\n");

    let (stdout, _, success) = run_recall(&config_path, &["smart", "AI", "--json"]);
    assert!(success);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["kind"], "fallback_recent");
    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["relevance"], "recent-only");
}

#[cfg(unix)]
#[test]
fn test_smart_with_model_reply() {
    let reply = r#"{"hasRelevant": true, "selected": [{"index": 1, "relevance": "high", "summary": "machine memory", "keyPoint": "memory"}], "reasoning": "both about AI"}"#;
    let generator = format!(
        "[generator]\nprogram = \"sh\"\nargs = [\"-c\", \"cat <<'EOF'\\n{}\\nEOF\"]\n",
        reply.replace('\\', "\\\\").replace('"', "\\\"")
    );
    let (_tmp, config_path) = setup_test_env(&generator);

    let (stdout, stderr, success) = run_recall(&config_path, &["smart", "AI"]);
    assert!(success, "smart failed: {}", stderr);
    assert!(stdout.contains("**Relevance:** found related posts"));
    assert!(stdout.contains("**Key point:** memory"));
    assert!(stdout.contains("**Reasoning:** both about AI"));
}

#[cfg(unix)]
#[test]
fn test_filter_prints_paths() {
    let generator = "[generator]\nprogram = \"sh\"\nargs = [\"-c\", \"echo '{\\\"selected\\\": [1], \\\"reason\\\": \\\"memory\\\"}'\"]\n";
    let (_tmp, config_path) = setup_test_env(generator);

    let (stdout, stderr, success) = run_recall(&config_path, &["filter", "memory"]);
    assert!(success, "filter failed: {}", stderr);
    assert!(stdout.contains("Filter: memory"));

    let paths: Vec<&str> = stdout
        .split("---PATHS---")
        .nth(1)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .collect();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("five.md"));
}

#[test]
fn test_hydrate_prints_body() {
    let (tmp, config_path) = setup_test_env("");
    let path = tmp.path().join("posts/2026/02/07/five.md");

    let (stdout, _, success) = run_recall(&config_path, &["hydrate", path.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("Memory is a strange thing for a machine."));
    assert!(stdout.contains("tags:      AI"));
}

#[test]
fn test_missing_config_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let posts = tmp.path().join("posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(posts.join("a.md"), post(1, "AI", "Hello.")).unwrap();

    let (stdout, stderr, success) = run_recall(
        &tmp.path().join("absent.toml"),
        &["--store", posts.to_str().unwrap(), "rank", "--json"],
    );
    assert!(success, "rank failed: {}", stderr);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["items"].as_array().unwrap().len(), 1);
}
