use codeflow::core::LanguageDetector;
use std::collections::HashMap;

#[test]
fn detector_maps_known_extensions() {
    let detector = LanguageDetector::new();

    assert_eq!(detector.detect("src/app.py"), Some("python"));
    assert_eq!(detector.detect("src/app.js"), Some("javascript"));
    assert_eq!(detector.detect("src/App.JSX"), Some("javascript"));
    assert_eq!(detector.detect("src/app.ts"), Some("typescript"));
    assert_eq!(detector.detect("src/Component.tsx"), Some("typescript"));
    assert_eq!(detector.detect("README.md"), Some("markdown"));
}

#[test]
fn detector_rejects_unknown_extensions() {
    let detector = LanguageDetector::new();

    assert_eq!(detector.detect("binary.exe"), None);
    assert_eq!(detector.detect("Makefile"), None);
    assert_eq!(detector.detect("noext"), None);
}

#[test]
fn detector_table_is_replaceable() {
    let mut table = HashMap::new();
    table.insert("zig".to_string(), "zig".to_string());
    let detector = LanguageDetector::with_table(table);

    assert_eq!(detector.detect("main.zig"), Some("zig"));
    assert_eq!(detector.detect("main.py"), None);
}
