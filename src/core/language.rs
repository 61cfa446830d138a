use std::collections::HashMap;
use std::path::Path;

/// Extension-to-language lookup.
///
/// Configured independently from the discovery allow-list: the two can
/// diverge, and a detected language without a registered parser simply drops
/// the file from the graph.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    table: HashMap<String, String>,
}

impl LanguageDetector {
    pub fn new() -> Self {
        let entries: &[(&str, &str)] = &[
            ("py", "python"),
            ("js", "javascript"),
            ("jsx", "javascript"),
            ("ts", "typescript"),
            ("tsx", "typescript"),
            ("java", "java"),
            ("cpp", "cpp"),
            ("cc", "cpp"),
            ("cxx", "cpp"),
            ("hpp", "cpp"),
            ("c", "c"),
            ("h", "c"),
            ("cs", "csharp"),
            ("go", "go"),
            ("rs", "rust"),
            ("php", "php"),
            ("rb", "ruby"),
            ("swift", "swift"),
            ("kt", "kotlin"),
            ("scala", "scala"),
            ("clj", "clojure"),
            ("html", "html"),
            ("css", "css"),
            ("scss", "scss"),
            ("sass", "sass"),
            ("json", "json"),
            ("xml", "xml"),
            ("yml", "yaml"),
            ("yaml", "yaml"),
            ("md", "markdown"),
            ("txt", "text"),
        ];
        Self {
            table: entries
                .iter()
                .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
                .collect(),
        }
    }

    /// Replaces the default table wholesale.
    pub fn with_table(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    /// Lower-cased extension lookup; unknown extensions detect nothing.
    pub fn detect(&self, rel_path: &str) -> Option<&str> {
        let extension = Path::new(rel_path).extension()?.to_str()?;
        self.table.get(&extension.to_lowercase()).map(String::as_str)
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}
