mod common;

use predicates::prelude::*;

use common::{fixture, mvnlens_cmd, VERBOSE_TREE};

#[test]
fn test_conflicts_reports_nearest_winner() {
    let (tmp, input) = fixture("deps.txt", VERBOSE_TREE);

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Version conflicts (1):"))
        .stdout(predicate::str::contains("com.x:lib:jar resolved 1.0"))
        .stdout(predicate::str::contains(
            "requested 2.0 (nearest wins: depth 1 vs 2)",
        ));
}

#[test]
fn test_conflicts_with_paths_and_duplicates() {
    let (tmp, input) = fixture("deps.txt", VERBOSE_TREE);

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts", "--paths", "--duplicates"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("requested 2.0 via com.y:app > com.x:lib"))
        .stdout(predicate::str::contains("Duplicated dependencies (1):"))
        .stdout(predicate::str::contains("org.p:p:jar:1.0 (2 paths)"));
}

#[test]
fn test_conflicts_none_in_json_input() {
    let json = r#"[{"groupId": "org.a", "artifactId": "a", "version": "1.0", "depth": 1}]"#;
    let (tmp, input) = fixture("deps.json", json);

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No version conflicts."));
}

#[test]
fn test_conflicts_structural_error_fails() {
    let json = r#"[
        {"groupId": "org.a", "artifactId": "a", "version": "1.0", "depth": 1},
        {"groupId": "org.b", "artifactId": "b", "version": "1.0", "depth": 3}
    ]"#;
    let (tmp, input) = fixture("deps.json", json);

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed dependency sequence at record 1"));
}

#[test]
fn test_conflicts_missing_input_fails() {
    let tmp = tempfile::TempDir::new().unwrap();

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts", "absent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_no_test_scope_flag_drops_test_duplicates() {
    let (tmp, input) = fixture("deps.txt", VERBOSE_TREE);

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts", "--duplicates", "--no-test-scope"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicated dependencies."));
}

#[test]
fn test_config_file_is_picked_up() {
    let (tmp, input) = fixture("deps.txt", VERBOSE_TREE);
    std::fs::write(
        tmp.path().join("mvnlens.toml"),
        "[analyzer]\ninclude-test-scope = false\n",
    )
    .unwrap();

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts", "--duplicates"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicated dependencies."));
}

#[test]
fn test_invalid_config_fails() {
    let (tmp, input) = fixture("deps.txt", VERBOSE_TREE);
    let config = tmp.path().join("custom.toml");
    std::fs::write(&config, "[analyzer]\ninclude-test-scope = \"maybe\"\n").unwrap();

    mvnlens_cmd()
        .current_dir(tmp.path())
        .args(["conflicts", "--config"])
        .arg(&config)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
