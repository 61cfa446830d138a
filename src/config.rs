use std::collections::HashSet;
use std::env;

/// Caps enforced by the binary after analysis; the engine itself never
/// truncates a snapshot.
pub const DEFAULT_MAX_NODES: usize = 10_000;
pub const DEFAULT_MAX_EDGES: usize = 50_000;

/// Extensions accepted by discovery. Kept separate from the language
/// detector's table on purpose: discovery may admit files no parser claims.
const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "java", "cpp", "c", "h", "css", "scss", "html", "php", "rb",
    "go", "rs", "swift", "json", "xml", "yml", "yaml", "md", "txt",
];

const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", "__pycache__", "venv", "env", "dist", "build"];

/// Analysis settings, sourced from fixed defaults with environment overrides.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Lower-cased file extensions (no leading dot) admitted by discovery.
    pub allowed_extensions: HashSet<String>,
    /// Directory names pruned before descent, in addition to dot-directories.
    pub ignored_dirs: HashSet<String>,
    pub max_nodes: usize,
    pub max_edges: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_nodes: DEFAULT_MAX_NODES,
            max_edges: DEFAULT_MAX_EDGES,
        }
    }
}

impl AnalysisConfig {
    /// Defaults overridden by `CODEFLOW_ALLOWED_EXTENSIONS`,
    /// `CODEFLOW_IGNORED_DIRS` (comma-separated) and
    /// `CODEFLOW_MAX_NODES` / `CODEFLOW_MAX_EDGES`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("CODEFLOW_ALLOWED_EXTENSIONS") {
            let extensions = parse_name_list(&raw, true);
            if !extensions.is_empty() {
                config.allowed_extensions = extensions;
            }
        }

        if let Ok(raw) = env::var("CODEFLOW_IGNORED_DIRS") {
            let dirs = parse_name_list(&raw, false);
            if !dirs.is_empty() {
                config.ignored_dirs = dirs;
            }
        }

        if let Ok(raw) = env::var("CODEFLOW_MAX_NODES") {
            if let Ok(value) = raw.trim().parse() {
                config.max_nodes = value;
            }
        }

        if let Ok(raw) = env::var("CODEFLOW_MAX_EDGES") {
            if let Ok(value) = raw.trim().parse() {
                config.max_edges = value;
            }
        }

        config
    }
}

fn parse_name_list(raw: &str, strip_dot: bool) -> HashSet<String> {
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            if strip_dot {
                item.trim_start_matches('.').to_lowercase()
            } else {
                item.to_string()
            }
        })
        .filter(|item| !item.is_empty())
        .collect()
}
