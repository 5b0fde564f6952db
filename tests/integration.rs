use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn fleet_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("fleet");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(
        data_dir.join("docs.csv"),
        "id,text,category\n\
         1,Car A is a compact petrol hatchback for city errands,compact\n\
         2,Car B is a diesel tourer built for long distances,tourer\n\
         3,Car C is a hybrid family wagon,family\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("stats.csv"),
        "car,trips,avg_km,fuel_type,maintenance_score\n\
         Car A,10,300,Petrol,7\n\
         Car B,5,500,Diesel,8\n\
         Car C,12,150,Hybrid,9\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("relations.csv"),
        "car,feature,relation\n\
         Car B,Suitable for Long Trips,has_feature\n\
         Car B,High Mileage,has_feature\n\
         Car C,Comfort,has_feature\n",
    )
    .unwrap();

    // Generator points at a closed port so `ask` fails fast and offline.
    let config_content = format!(
        r#"[data]
docs = "{root}/data/docs.csv"
stats = "{root}/data/stats.csv"
relations = "{root}/data/relations.csv"

[retrieval]
semantic_k = 3
top_stats = 10

[generation]
model = "test-model"
url = "http://127.0.0.1:9"
timeout_secs = 2
max_retries = 0
"#,
        root = root.display()
    );

    let config_path = config_dir.join("fleetwise.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_fleet(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = fleet_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run fleet binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_plan_stats_question() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_fleet(
        &config_path,
        &["plan", "What is the average distance for Car B on long trips?"],
    );
    assert!(success, "plan failed: {}", stderr);
    assert!(stdout.contains("\"use_stats\": true"));
    assert!(stdout.contains("\"use_semantic\": true"));
    assert!(stdout.contains("\"target_key\": \"Car B\""));
}

#[test]
fn test_plan_fallback_enables_both_branches() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_fleet(&config_path, &["plan", "Tell me about the vehicles"]);
    assert!(success);
    assert!(stdout.contains("\"use_stats\": true"));
    assert!(stdout.contains("\"use_relations\": true"));
}

#[test]
fn test_plan_works_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nowhere.toml");

    let (stdout, _, success) = run_fleet(&missing, &["plan", "average km?"]);
    assert!(success, "plan should not require config or data");
    assert!(stdout.contains("\"use_stats\": true"));
}

#[test]
fn test_context_includes_stats_section() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_fleet(
        &config_path,
        &["context", "What is the average distance for Car B on long trips?"],
    );
    assert!(success, "context failed: {}", stderr);
    assert!(stdout.starts_with("User Question:"));
    assert!(stdout.contains("[CAR STATS]"));
    assert!(stdout.contains("Car B"));
    // Embeddings are disabled in the test config, so no semantic section.
    assert!(!stdout.contains("[CAR DESCRIPTIONS]"));
}

#[test]
fn test_context_includes_relations_for_target() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_fleet(
        &config_path,
        &["context", "Is Car B suitable for long trips?"],
    );
    assert!(success);
    assert!(stdout.contains("[CAR FEATURES]"));
    assert!(stdout.contains("Car B --has_feature--> Suitable for Long Trips"));
}

#[test]
fn test_context_question_only_when_nothing_matches() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_fleet(
        &config_path,
        &["context", "What is the average distance for Car Z?"],
    );
    assert!(success);
    assert!(stdout.starts_with("User Question: What is the average distance for Car Z?"));
    assert!(!stdout.contains('['), "expected no section headers: {}", stdout);
}

#[test]
fn test_context_deterministic() {
    let (_tmp, config_path) = setup_test_env();

    let (out1, _, _) = run_fleet(&config_path, &["context", "best car for comfort?"]);
    let (out2, _, _) = run_fleet(&config_path, &["context", "best car for comfort?"]);
    assert_eq!(out1, out2);
}

#[test]
fn test_stats_command() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_fleet(&config_path, &["stats"]);
    assert!(success, "stats failed: {}", stderr);
    assert!(stdout.contains("Descriptions: 3"));
    assert!(stdout.contains("Stat rows:    3"));
    assert!(stdout.contains("Relations:    3"));
    assert!(stdout.contains("disabled"));
    assert!(stdout.contains("test-model"));
}

#[test]
fn test_ask_fails_when_generator_unreachable() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_fleet(&config_path, &["ask", "Which car is best?"]);
    assert!(!success, "ask should fail when the generator is unreachable");
    assert!(
        stderr.contains("Generation"),
        "expected a generation error, got: {}",
        stderr
    );
}

#[test]
fn test_missing_data_file_fails() {
    let (tmp, config_path) = setup_test_env();

    fs::remove_file(tmp.path().join("data").join("stats.csv")).unwrap();
    let (_, stderr, success) = run_fleet(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("stats table"), "got: {}", stderr);
}

#[test]
fn test_unknown_embedding_provider_rejected() {
    let (tmp, config_path) = setup_test_env();

    let mut content = fs::read_to_string(&config_path).unwrap();
    content.push_str("\n[embedding]\nprovider = \"faiss\"\n");
    fs::write(&config_path, content).unwrap();

    let (_, stderr, success) = run_fleet(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Unknown embedding provider"), "got: {}", stderr);
}

#[test]
fn test_missing_config_fails_for_data_commands() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nowhere.toml");

    let (_, stderr, success) = run_fleet(&missing, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("config"), "got: {}", stderr);
}

#[test]
fn test_chat_exits_on_quit_keyword() {
    let (_tmp, config_path) = setup_test_env();

    let binary = fleet_binary();
    let mut child = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("chat")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"quit\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Session ended."));
}

#[test]
fn test_chat_exits_on_end_of_input() {
    let (_tmp, config_path) = setup_test_env();

    let binary = fleet_binary();
    let child = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("chat")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
}
