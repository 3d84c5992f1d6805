use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ficha-pdf"))
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn output_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/output")
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

#[test]
fn test_full_sheet() {
    setup();
    let output_file = "test-full.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-c", fixture("client-full.json").to_str().unwrap(),
            "-m", fixture("medidas-full.json").to_str().unwrap(),
            "-s", fixture("studio.json").to_str().unwrap(),
            "-d", "2026-08-07",
            "-o", output_dir().join(output_file).to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_minimal_records_render_placeholders() {
    setup();
    let output_file = "test-minimal.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-c", fixture("client-minimal.json").to_str().unwrap(),
            "-m", fixture("medidas-minimal.json").to_str().unwrap(),
            "-o", output_dir().join(output_file).to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small");
}

#[test]
fn test_default_filename_uses_slug_and_date() {
    setup();
    let expected = "ficha-ana-lópez-07082026.pdf";
    cleanup_file(expected);

    let output = cargo_bin()
        .current_dir(output_dir())
        .args([
            "-c", fixture("client-full.json").to_str().unwrap(),
            "-m", fixture("medidas-full.json").to_str().unwrap(),
            "-d", "2026-08-07",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(expected);
    assert!(path.exists(), "Expected {} to be created", expected);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(expected), "stdout did not mention the filename: {}", stdout);
}

#[test]
fn test_long_notes_are_truncated_not_paginated() {
    setup();
    let output_file = "test-long-notes.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-c", fixture("client-minimal.json").to_str().unwrap(),
            "-m", fixture("medidas-notas-largas.json").to_str().unwrap(),
            "-o", output_dir().join(output_file).to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");
}

#[test]
fn test_without_studio_record() {
    setup();
    let output_file = "test-no-studio.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-c", fixture("client-full.json").to_str().unwrap(),
            "-m", fixture("medidas-full.json").to_str().unwrap(),
            "-o", output_dir().join(output_file).to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_dir().join(output_file).exists(), "PDF file was not created");
}

#[test]
fn test_missing_record_file() {
    let output = cargo_bin()
        .args([
            "-c", "nonexistent.json",
            "-m", fixture("medidas-minimal.json").to_str().unwrap(),
            "-o", output_dir().join("should-not-exist.pdf").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing client record");
}

#[test]
fn test_invalid_record_json() {
    let output = cargo_bin()
        .args([
            "-c", fixture("invalid.json").to_str().unwrap(),
            "-m", fixture("medidas-minimal.json").to_str().unwrap(),
            "-o", output_dir().join("should-not-exist.pdf").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for malformed JSON");
}

#[test]
fn test_invalid_date_format() {
    let output = cargo_bin()
        .args([
            "-c", fixture("client-full.json").to_str().unwrap(),
            "-m", fixture("medidas-minimal.json").to_str().unwrap(),
            "-d", "not-a-date",
            "-o", output_dir().join("should-not-exist.pdf").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid date");
}
