use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Lays out a small C/C++ tree with one non-conforming include.
fn setup_tree() -> TempDir {
    let dir = TempDir::new().expect("Creating temp source tree failed");
    fs::create_dir_all(dir.path().join("src/nested")).expect("Creating src tree failed");
    fs::create_dir_all(dir.path().join("include")).expect("Creating include tree failed");
    fs::write(
        dir.path().join("src/main.c"),
        "#include \"foo/bar.h\"  // comment\n#include <stdio.h>\n\nint main(void) { return 0; }\n",
    )
    .expect("Writing main.c failed");
    fs::write(
        dir.path().join("include/clean.h"),
        "#include <string.h>\n#include \"./relative.h\"\n",
    )
    .expect("Writing clean.h failed");
    dir
}

fn fixup(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("include-fixup").expect("Binary exists");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn rewrite_converts_quoted_includes_and_preserves_trailing_comments() {
    let dir = setup_tree();

    fixup(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("update #include directive"));

    let content = fs::read_to_string(dir.path().join("src/main.c")).expect("Reading back failed");
    assert_eq!(
        content,
        "#include <foo/bar.h>  // comment\n#include <stdio.h>\n\nint main(void) { return 0; }\n"
    );
}

#[test]
fn rewrite_is_idempotent() {
    let dir = setup_tree();

    fixup(dir.path()).assert().success();
    let first_pass = fs::read_to_string(dir.path().join("src/main.c")).expect("Reading failed");

    // Second run must perform zero substitutions and leave the file alone.
    fixup(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("update #include directive").not());
    let second_pass = fs::read_to_string(dir.path().join("src/main.c")).expect("Reading failed");
    assert_eq!(first_pass, second_pass);
}

#[test]
fn conforming_files_are_left_byte_identical() {
    let dir = setup_tree();
    // Quoted includes not starting with a word character are not local
    // includes and must be left alone.
    let before = fs::read_to_string(dir.path().join("include/clean.h")).expect("Reading failed");

    fixup(dir.path()).assert().success();

    let after = fs::read_to_string(dir.path().join("include/clean.h")).expect("Reading failed");
    assert_eq!(before, after);
}

#[test]
fn check_mode_reports_offenders_without_writing() {
    let dir = setup_tree();
    let before = fs::read_to_string(dir.path().join("src/main.c")).expect("Reading failed");

    fixup(dir.path())
        .arg("--check")
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("src/main.c")
                .and(predicate::str::contains("improper #include directives")),
        );

    let after = fs::read_to_string(dir.path().join("src/main.c")).expect("Reading failed");
    assert_eq!(before, after);
}

#[test]
fn check_mode_reports_every_offending_file() {
    let dir = setup_tree();
    fs::write(
        dir.path().join("src/nested/other.hpp"),
        "#include \"inner/thing.hpp\"\n",
    )
    .expect("Writing other.hpp failed");

    fixup(dir.path())
        .arg("--check")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("src/main.c")
                .and(predicate::str::contains("src/nested/other.hpp")),
        );
}

#[test]
fn check_mode_passes_on_clean_tree() {
    let dir = setup_tree();

    // Normalise first, then verify the tree passes the check.
    fixup(dir.path()).assert().success();
    fixup(dir.path()).arg("--check").assert().success();
}

#[test]
fn missing_source_roots_are_not_an_error() {
    let dir = TempDir::new().expect("Creating temp dir failed");

    fixup(dir.path()).assert().success();
    fixup(dir.path()).arg("--check").assert().success();
}
