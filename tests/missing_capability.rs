#![cfg(not(feature = "png"))]

use std::process::Command;
use tempfile::TempDir;

/// Without the png feature the run stops early, asks for a rebuild and exits cleanly
#[test]
fn build_without_png_prints_rebuild_instructions() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = Command::new(env!("CARGO_BIN_EXE_icon-gen"))
        .current_dir(temp_dir.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run icon-gen command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "status: {}, stderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("--features png"), "stdout: {stdout}");
    assert!(!stdout.contains("Created"));
    assert!(!temp_dir.path().join("public").exists());
}

#[test]
fn library_reports_missing_capability_and_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("icons").join("icon16.png");

    let err = ext_icons::capability::probe_png().expect_err("PNG should be unavailable");
    assert!(err.is_missing_capability());

    let err = ext_icons::icon_gen::generate_icon(16, &path, &Default::default())
        .expect_err("saving should fail without an encoder");
    assert!(err.is_missing_capability());
    assert!(!temp_dir.path().join("icons").exists());
}
