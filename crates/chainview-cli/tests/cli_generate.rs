use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn generate_writes_chain_document() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("blockchain_data.json");

    Command::cargo_bin("chainview-cli")
        .unwrap()
        .arg("generate")
        .arg("--output")
        .arg(&out)
        .args(["--difficulty", "1"])
        .assert()
        .success()
        .stdout(contains("wrote 3 blocks"));

    let body = std::fs::read_to_string(&out).unwrap();
    let document: serde_json::Value = serde_json::from_str(&body).unwrap();
    let blocks = document.as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0]["index"], 0);
    assert_eq!(blocks[0]["previous_hash"], "0");
    assert_eq!(blocks[1]["previous_hash"], blocks[0]["hash"]);
    assert_eq!(blocks[2]["previous_hash"], blocks[1]["hash"]);
    assert_eq!(blocks[1]["transactions"][0]["sender"], "Alice");
    assert_eq!(blocks[2]["transactions"][0]["amount"], 20);
}

#[test]
fn generate_parallel_writes_chain_document() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("blockchain_data.json");

    Command::cargo_bin("chainview-cli")
        .unwrap()
        .arg("generate")
        .arg("--output")
        .arg(&out)
        .args(["--difficulty", "1", "--parallel"])
        .assert()
        .success()
        .stdout(contains("wrote 3 blocks"));

    let body = std::fs::read_to_string(&out).unwrap();
    let document: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(document.as_array().unwrap().len(), 3);
}

#[test]
fn render_against_unreachable_source_emits_empty_page() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("index.html");

    Command::cargo_bin("chainview-cli")
        .unwrap()
        .arg("render")
        .args(["--url", "http://127.0.0.1:9/blockchain_data.json"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let page = std::fs::read_to_string(&out).unwrap();
    assert!(page.contains(r#"<div id="blockchain">"#));
    assert!(!page.contains("<div class=\"block\">"));
}
