use mvnlens_util::errors::LensError;
use mvnlens_util::fs::{find_ancestor_with, read_text, read_text_lossy};
use tempfile::TempDir;

#[test]
fn test_find_ancestor_with_direct() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pom.xml"), "").unwrap();
    let result = find_ancestor_with(tmp.path(), "pom.xml");
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_ancestor_with_nested() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pom.xml"), "").unwrap();
    let nested = tmp.path().join("target").join("reports");
    std::fs::create_dir_all(&nested).unwrap();
    let result = find_ancestor_with(&nested, "pom.xml");
    assert_eq!(result, Some(tmp.path().to_path_buf()));
}

#[test]
fn test_find_ancestor_with_not_found() {
    let tmp = TempDir::new().unwrap();
    let result = find_ancestor_with(tmp.path(), "NonExistent.file");
    assert_eq!(result, None);
}

#[test]
fn test_read_text_existing_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deps.txt");
    std::fs::write(&path, "com.example:app:jar:1.0\n").unwrap();
    assert_eq!(read_text(&path).unwrap(), "com.example:app:jar:1.0\n");
}

#[test]
fn test_read_text_missing_file_names_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("missing.json");
    let err = read_text(&path).unwrap_err();
    assert!(matches!(err, LensError::Input { .. }));
    assert!(err.to_string().contains("missing.json"), "got: {err}");
}

#[test]
fn test_read_text_lossy_replaces_invalid_bytes() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deps.txt");
    std::fs::write(&path, b"org.b:b:jar:1.\xff:compile\n").unwrap();
    let (text, replaced) = read_text_lossy(&path).unwrap();
    assert!(replaced);
    assert_eq!(text, "org.b:b:jar:1.\u{fffd}:compile\n");
}

#[test]
fn test_read_text_lossy_plain_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deps.txt");
    std::fs::write(&path, "com.example:app:jar:1.0\n").unwrap();
    assert_eq!(
        read_text_lossy(&path).unwrap(),
        ("com.example:app:jar:1.0\n".to_string(), false)
    );
}
