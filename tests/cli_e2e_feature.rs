//! End-to-end tests for the `feature` command.

mod common;
use common::prelude::*;

fn fixture_with_two_commits() -> TestFixture {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "a\n");
    fixture.commit_all("upstream");
    fixture.write_src("chrome/sidebar.cc", "sidebar\n");
    fixture.write_src("a.txt", "A\n");
    fixture.commit_all("sidebar part one");
    fixture.write_src("chrome/sidebar.h", "sidebar\n");
    fixture.write_src("a.txt", "AA\n");
    fixture.commit_all("sidebar part two");
    fixture
}

#[test]
fn test_feature_add_merges_commits() {
    let fixture = fixture_with_two_commits();

    fixture
        .command()
        .args(["feature", "add", "sidebar", "HEAD~1", "-d", "Vertical tabs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files added, 2 total"));

    fixture
        .command()
        .args(["feature", "add", "sidebar", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files added, 3 total"));

    let output = fixture
        .command()
        .args(["feature", "show", "sidebar", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "sidebar");
    assert_eq!(value["description"], "Vertical tabs");
    assert_eq!(
        value["files"],
        serde_json::json!(["a.txt", "chrome/sidebar.cc", "chrome/sidebar.h"])
    );
}

#[test]
fn test_feature_list() {
    let fixture = TestFixture::new();
    fixture.write(
        "features.yaml",
        r#"
version: '1.0'
features:
  sidebar:
    description: Vertical tabs
    files: [a.cc, b.cc]
  branding:
    files: [logo.cc]
"#,
    );

    fixture
        .command()
        .args(["feature", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Features (2):"))
        .stdout(predicate::str::contains("branding (1 files)"))
        .stdout(predicate::str::contains("sidebar (2 files) - Vertical tabs"));

    let output = fixture
        .command()
        .args(["feature", "list", "--json"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "branding");
    assert_eq!(value[1]["file_count"], 2);
}

#[test]
fn test_feature_list_empty() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["feature", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No features defined"));
}

#[test]
fn test_feature_show_text_marks_missing_patches() {
    let fixture = TestFixture::new();
    fixture.write(
        "features.yaml",
        "features:\n  sidebar:\n    files: [a.cc, b.cc]\n",
    );
    fixture.write("chromium_patches/sidebar/a.cc", "diff\n");

    fixture
        .command()
        .args(["feature", "show", "sidebar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feature: sidebar"))
        .stdout(predicate::str::contains("Files (2):"))
        .stdout(predicate::str::contains("! b.cc"));
}

#[test]
fn test_feature_show_unknown() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["feature", "show", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Feature not found: nope"));
}

#[test]
fn test_feature_add_unknown_commit() {
    let fixture = fixture_with_two_commits();

    fixture
        .command()
        .args(["feature", "add", "sidebar", "not-a-commit"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Commit not found: not-a-commit"));
    assert!(!fixture.path().join("features.yaml").exists());
}

#[test]
fn test_invalid_manifest_is_reported() {
    let fixture = TestFixture::new();
    fixture.write("features.yaml", "features: [not, a, map]\n");

    fixture
        .command()
        .args(["feature", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("YAML"));
}
