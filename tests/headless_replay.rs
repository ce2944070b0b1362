//! End-to-end test: replay a recorded stream with `--headless`.

use std::fs;
use std::process::Command;

const STREAM: &str = r#"{"diffIndex":0,"head":[{"headBlock":1,"slot":1,"validatorCounts":{"total":3}}],"blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}
not a diff
{"diffIndex":1,"head":[{"headBlock":2,"slot":2,"validatorCounts":{"total":3}}],"blocks":[{"selfPtr":2,"htr":"0x02","slot":2,"parent":1}],"attestations":[{"selfPtr":5,"slot":2,"commIndex":1,"head":2,"target":1,"source":1}],"latestVotes":[{"validatorIndex":0,"attestationPtr":5}]}
"#;

#[test]
fn headless_replay_prints_summary() {
    let dir = std::env::temp_dir().join(format!("chainviz_headless_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let stream_path = dir.join("stream.jsonl");
    fs::write(&stream_path, STREAM).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_chainviz"))
        .arg(&stream_path)
        .arg("--headless")
        .env("CHAINVIZ_CONFIG", dir.join("absent.toml"))
        .env("CHAINVIZ_LOG_FILE", dir.join("chainviz.log"))
        .output()
        .expect("Failed to execute binary");
    let _ = fs::remove_dir_all(&dir);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "exit status {:?}, stderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout.trim(),
        "diffs=2 head=slot 2 (block#2) blocks=2 attestations=1 validators=3 votes=1 finalized=0 decode_errors=1"
    );
}

#[test]
fn headless_replay_skips_invalid_utf8_lines() {
    let dir = std::env::temp_dir().join(format!("chainviz_headless_utf8_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let stream_path = dir.join("stream.jsonl");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(br#"{"diffIndex":0,"blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}"#);
    bytes.extend_from_slice(b"\n\xff\xfe\n");
    bytes.extend_from_slice(br#"{"diffIndex":1,"blocks":[{"selfPtr":2,"htr":"0x02","slot":2,"parent":1}]}"#);
    bytes.push(b'\n');
    fs::write(&stream_path, bytes).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_chainviz"))
        .arg(&stream_path)
        .arg("--headless")
        .env("CHAINVIZ_CONFIG", dir.join("absent.toml"))
        .env("CHAINVIZ_LOG_FILE", dir.join("chainviz.log"))
        .output()
        .expect("Failed to execute binary");
    let _ = fs::remove_dir_all(&dir);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "diffs=2 head=none blocks=2 attestations=0 validators=0 votes=0 finalized=0 decode_errors=1"
    );
}

#[test]
fn missing_file_fails() {
    let dir = std::env::temp_dir().join(format!("chainviz_missing_{}", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_chainviz"))
        .arg(dir.join("nope.jsonl"))
        .arg("--headless")
        .env("CHAINVIZ_CONFIG", dir.join("absent.toml"))
        .env("CHAINVIZ_LOG_FILE", dir.join("chainviz.log"))
        .output()
        .expect("Failed to execute binary");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(!output.status.success());
}
