use codeflow::config::AnalysisConfig;
use codeflow::core::scanner::FileScanner;
use std::fs;
use std::path::Path;

fn touch<P: AsRef<Path>>(path: P) {
    fs::write(path, "// test").unwrap();
}

#[test]
fn scanner_filters_by_allowed_extensions() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();

    touch(root.join("a/main.py"));
    touch(root.join("b/app.js"));
    touch(root.join("b/notes.xyz")); // not allow-listed

    let scanner = FileScanner::new(&AnalysisConfig::default());
    let files = scanner.scan_repository(root).unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.rel_path.as_str()).collect();
    assert_eq!(paths, vec!["a/main.py", "b/app.js"]);
}

#[test]
fn scanner_prunes_hidden_and_ignored_directories() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("node_modules/lodash")).unwrap();
    fs::create_dir_all(root.join("__pycache__")).unwrap();

    touch(root.join("src/app.py"));
    touch(root.join(".git/config.py"));
    touch(root.join("node_modules/lodash/index.js"));
    touch(root.join("__pycache__/app.py"));

    let scanner = FileScanner::new(&AnalysisConfig::default());
    let files = scanner.scan_repository(root).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].rel_path, "src/app.py");
}

#[test]
fn scanner_output_is_sorted_and_relative() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("z")).unwrap();
    fs::create_dir_all(root.join("a")).unwrap();

    touch(root.join("z/last.py"));
    touch(root.join("a/first.py"));
    touch(root.join("middle.py"));

    let scanner = FileScanner::new(&AnalysisConfig::default());
    let files = scanner.scan_repository(root).unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.rel_path.as_str()).collect();
    assert_eq!(paths, vec!["a/first.py", "middle.py", "z/last.py"]);
}

#[test]
fn scanner_fails_on_inaccessible_root() {
    let scanner = FileScanner::new(&AnalysisConfig::default());
    assert!(scanner
        .scan_repository(Path::new("/definitely/not/a/real/root"))
        .is_err());
}

#[test]
fn scanner_reports_file_sizes() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("app.py"), "import os\n").unwrap();

    let scanner = FileScanner::new(&AnalysisConfig::default());
    let files = scanner.scan_repository(root).unwrap();

    assert_eq!(files[0].size, 10);
}
