use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

pub const VERBOSE_TREE: &str = "\
[INFO] --- maven-dependency-plugin:3.6.0:tree (default-cli) @ app ---
[INFO] com.example:app:jar:1.0
[INFO] +- com.y:app:jar:1.0:compile
[INFO] |  +- com.x:lib:jar:2.0:compile
[INFO] |  \\- org.p:p:jar:1.0:compile
[INFO] +- com.x:lib:jar:1.0:compile
[INFO] \\- com.z:other:jar:1.0:test
[INFO]    \\- (org.p:p:jar:1.0:test - omitted for duplicate)
[INFO] ------------------------------------------------------------------------
";

pub fn mvnlens_cmd() -> Command {
    Command::cargo_bin("mvnlens").unwrap()
}

/// A scratch directory holding `name` with `content`.
pub fn fixture(name: &str, content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    (tmp, path)
}
