use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

const SUBMISSION: &str = "tests/fixtures/submission.json";
const COMPLETION: &str = "tests/fixtures/completion.json";

fn cargo_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ccew-pdf"));
    // keep the caller's environment from changing defaults
    command
        .env_remove("CCEW_STRATEGY")
        .env_remove("CCEW_TEMPLATE")
        .env_remove("CCEW_FILENAME_PREFIX");
    command
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

fn page_count(path: &Path) -> usize {
    lopdf::Document::load(path)
        .expect("Output is not a readable PDF")
        .get_pages()
        .len()
}

#[test]
fn test_self_drawn_from_merged_inputs() {
    setup();
    let output_file = "test-self-drawn.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", SUBMISSION,
            "-i", COMPLETION,
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated"));
    assert!(stdout.contains("Serial: 3015"));

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");
    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
    assert_eq!(page_count(&path), 3);
}

#[test]
fn test_derived_filename_in_output_dir() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .args(["-i", SUBMISSION, "--output-dir"])
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(dir.path().join("CCEW_3015.pdf").exists());
}

#[test]
fn test_missing_serial_uses_sentinel() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .args(["-i", COMPLETION, "--output-dir"])
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(dir.path().join("CCEW_UNKNOWN.pdf").exists());
}

#[test]
fn test_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");

    for path in [&first, &second] {
        let output = cargo_bin()
            .args(["-i", SUBMISSION, "-i", COMPLETION, "-o"])
            .arg(path)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success(), "Command failed: {:?}", output);
        // let the clock tick so a leaked timestamp would show up
        thread::sleep(Duration::from_millis(1100));
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_payload_mode() {
    let output = cargo_bin()
        .args(["-i", SUBMISSION, "-i", COMPLETION, "--payload"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(payload["filename"], "CCEW_3015.pdf");
    assert_eq!(payload["mimeType"], "application/pdf");

    let content = payload["contentBase64"].as_str().unwrap();
    let bytes = BASE64.decode(content).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_overlay_onto_template() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.pdf");
    let stamped = dir.path().join("stamped.pdf");

    // a blank self-drawn form stands in for the official template
    let blank = dir.path().join("blank.json");
    fs::write(&blank, "{}").unwrap();
    let output = cargo_bin()
        .arg("-i")
        .arg(&blank)
        .arg("-o")
        .arg(&template)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);

    let output = cargo_bin()
        .args(["-i", SUBMISSION, "-i", COMPLETION, "--strategy", "overlay", "--template"])
        .arg(&template)
        .arg("-o")
        .arg(&stamped)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Strategy: overlay"));
    assert_eq!(page_count(&stamped), 3);
}

#[test]
fn test_overlay_without_template() {
    setup();
    let output = cargo_bin()
        .args([
            "-i", SUBMISSION,
            "--strategy", "overlay",
            "-o", "tests/output/should-not-exist-overlay.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed without a template");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    assert!(!output_dir().join("should-not-exist-overlay.pdf").exists());
}

#[test]
fn test_overlay_missing_template_file() {
    setup();
    let output = cargo_bin()
        .args([
            "-i", SUBMISSION,
            "--strategy", "overlay",
            "--template", "nonexistent-template.pdf",
            "-o", "tests/output/should-not-exist-template.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing template");
    assert!(String::from_utf8_lossy(&output.stderr).contains("nonexistent-template.pdf"));
    assert!(!output_dir().join("should-not-exist-template.pdf").exists());
}

#[test]
fn test_stdin_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stdin.pdf");

    let mut child = cargo_bin()
        .args(["-i", "-", "-o"])
        .arg(&path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"serial_no": "77", "nmi": "4103"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(page_count(&path), 3);
}

#[test]
fn test_prefix_from_environment() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .env("CCEW_FILENAME_PREFIX", "NSW")
        .args(["-i", SUBMISSION, "--output-dir"])
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(dir.path().join("NSW_3015.pdf").exists());
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ccew.json");
    fs::write(&config, r#"{"strategy": "self-drawn", "filename_prefix": "JOB"}"#).unwrap();

    let output = cargo_bin()
        .args(["-i", SUBMISSION, "--config"])
        .arg(&config)
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(dir.path().join("JOB_3015.pdf").exists());
}

#[test]
fn test_missing_input_file() {
    let output = cargo_bin()
        .args(["-i", "nonexistent.json", "-o", "tests/output/should-not-exist.pdf"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing input");
}

#[test]
fn test_input_must_be_an_object() {
    let output = cargo_bin()
        .args([
            "-i", "tests/fixtures/not_an_object.json",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for a non-object record");
}
