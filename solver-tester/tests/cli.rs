use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "solver-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_tracks_writes_output() {
    let exe = env!("CARGO_BIN_EXE_solver-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-tracks", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available tracks"));
    assert!(content.contains("salesforce"));
}

#[test]
fn cli_runs_all_strategies_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_solver-tester");
    let output_path = temp_path("run.json");
    let output = Command::new(exe)
        .args([
            "--tracks",
            "all",
            "--strategies",
            "all",
            "--report",
            "json",
            "--iterations",
            "2",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tech Scenario Solver Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let runs = results.as_array().expect("array");
    assert_eq!(runs.len(), 3 * 5 * 2);
    assert!(runs.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_rejects_unreadable_catalog() {
    let exe = env!("CARGO_BIN_EXE_solver-tester");
    let output = Command::new(exe)
        .args(["--catalog", "/nonexistent/solver/catalog.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load scenarios"));
}

#[test]
fn cli_plays_an_external_catalog() {
    let exe = env!("CARGO_BIN_EXE_solver-tester");
    let catalog_path = temp_path("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"{"scenarios": [
            {"id": "ai-one", "track": "ai", "title": "One", "description": "", "context": "",
             "options": [{"id": "ai-one-1", "text": "", "feedback": "",
                          "scores": {"technical_judgment": 2, "stakeholder_management": 3, "adaptability": 4}}]},
            {"id": "ai-two", "track": "ai", "title": "Two", "description": "", "context": "",
             "options": [{"id": "ai-two-1", "text": "", "feedback": "",
                          "scores": {"technical_judgment": 4, "stakeholder_management": 5, "adaptability": 6}}]}
        ]}"#,
    )
    .expect("write catalog");
    let output_path = temp_path("external.md");
    let output = Command::new(exe)
        .args(["--tracks", "ai", "--report", "markdown", "--iterations", "1", "--catalog"])
        .arg(&catalog_path)
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("| ✅ AI Engineering / Best Answer | 1337 | 1/1 | Developing |"));
}
