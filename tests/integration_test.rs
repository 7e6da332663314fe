use ext_icon_gen::icon_gen::generate_icons;
use ext_icon_gen::IconConfig;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Generates the default icon set into a fresh directory and checks every
/// file exists with the right dimensions.
#[test]
fn batch_creates_icons_dir_and_all_sizes() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    assert!(!root.join("icons").exists());

    let report = generate_icons(&IconConfig::default(), root);

    assert!(report.is_success(), "failures: {:?}", report.failed().collect::<Vec<_>>());
    assert_eq!(report.succeeded().count(), 4);
    for size in [16, 32, 48, 128] {
        assert_icon(&root.join(format!("icons/icon{size}.png")), size);
    }
}

#[test]
fn batch_honors_custom_sizes_and_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = IconConfig {
        sizes: vec![24, 64],
        icons_dir: "assets/badges".into(),
        ..IconConfig::default()
    };

    let report = generate_icons(&config, temp_dir.path());

    assert!(report.is_success());
    assert_icon(&temp_dir.path().join("assets/badges/icon24.png"), 24);
    assert_icon(&temp_dir.path().join("assets/badges/icon64.png"), 64);
    assert!(!temp_dir.path().join("assets/badges/icon16.png").exists());
}

/// Runs the binary with no arguments in an extension directory and checks
/// both the icons and the manifest patch.
#[test]
fn cli_generates_icons_and_patches_manifest() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let manifest_path = temp_dir.path().join("manifest.json");
    std::fs::write(&manifest_path, r#"{"name": "ext", "action": {}}"#).unwrap();

    let output = run_cli(temp_dir.path(), &[]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated 4 of 4 icons"), "stdout: {stdout}");
    assert!(stdout.contains("✓ Registered icons"), "stdout: {stdout}");
    assert!(stdout.contains("✓ Set action.default_icon"), "stdout: {stdout}");

    for size in [16, 32, 48, 128] {
        assert_icon(&temp_dir.path().join(format!("icons/icon{size}.png")), size);
    }

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap())
            .expect("manifest.json should contain valid JSON");
    assert_eq!(manifest["icons"]["128"], "icons/icon128.png");
    assert_eq!(manifest["action"]["default_icon"]["16"], "icons/icon16.png");
}

#[test]
fn cli_keeps_icons_when_manifest_is_missing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_cli(temp_dir.path(), &[]);

    // best effort: the manifest failure is reported, not fatal
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("manifest.json"));
    assert_icon(&temp_dir.path().join("icons/icon48.png"), 48);
}

#[test]
fn cli_strict_mode_fails_on_manifest_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    std::fs::write(temp_dir.path().join("manifest.json"), r#"{"name": "ext"}"#).unwrap();

    let output = run_cli(temp_dir.path(), &["--strict"]);

    assert!(!output.status.success());
    assert_icon(&temp_dir.path().join("icons/icon16.png"), 16);
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("manifest.json")).unwrap(),
        r#"{"name": "ext"}"#
    );
}

#[test]
fn cli_rejects_duplicate_sizes() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_cli(temp_dir.path(), &["--sizes", "16,16", "--skip-manifest"]);

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("icons").exists());
}

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ext-icon-gen"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run ext-icon-gen")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("ext-icon-gen exited with {}", output.status);
    }
}

fn assert_icon(path: &Path, size: u32) {
    assert!(path.exists(), "{} should exist", path.display());
    let icon = image::open(path).expect("Failed to load generated icon");
    assert_eq!((icon.width(), icon.height()), (size, size));
    assert_eq!(icon.color(), image::ColorType::Rgba8);
}

#[test]
fn one_failing_size_does_not_stop_the_others() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    // a directory where icon32.png should go makes only that write fail
    std::fs::create_dir_all(temp_dir.path().join("icons/icon32.png")).unwrap();

    let report = generate_icons(&IconConfig::default(), temp_dir.path());

    let ok: Vec<u32> = report.succeeded().map(|(size, _)| size).collect();
    let failed: Vec<u32> = report.failed().map(|(size, _)| size).collect();
    assert_eq!(ok, [16, 48, 128]);
    assert_eq!(failed, [32]);
    assert!(!report.is_success());
    for size in [16, 48, 128] {
        assert_icon(&temp_dir.path().join(format!("icons/icon{size}.png")), size);
    }
}

#[test]
fn cli_summary_marks_failed_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    // a regular file where the icons directory should be
    std::fs::write(temp_dir.path().join("icons"), b"").unwrap();

    let output = run_cli(temp_dir.path(), &["--skip-manifest"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✗ Generated 0 of 4 icons"), "stdout: {stdout}");
    assert!(!stdout.contains("✓ Generated 0"), "stdout: {stdout}");
}
