use anyhow::Result;
use regex::Regex;
use std::path::Path;

use super::{
    last_modified_secs, read_file_content, ClassInfo, Complexity, DependencyKind,
    DependencyReference, ExportInfo, ExportKind, FileParser, FunctionInfo, ImportSyntax,
    ParseStatus, ParsedFileInfo,
};

/// Line-oriented JavaScript scanner.
///
/// Deliberately heuristic: constructs inside string and comment literals can
/// be over- or under-counted. Downstream consumers treat these fields as
/// approximate, so the scanner stays simple instead of chasing full fidelity.
pub struct JavaScriptParser {
    import_patterns: Vec<Regex>,
    require_patterns: Vec<Regex>,
    function_patterns: Vec<Regex>,
    class_pattern: Regex,
    method_pattern: Regex,
    export_patterns: Vec<(Regex, ExportKind)>,
    control_patterns: Vec<Regex>,
}

impl JavaScriptParser {
    pub fn new() -> Result<Self> {
        let import_patterns = vec![
            // import X from 'module'
            Regex::new(r#"import\s+(.+?)\s+from\s+['"](.+?)['"]"#)?,
            // import 'module'
            Regex::new(r#"import\s+['"](.+?)['"]"#)?,
            // import('module')
            Regex::new(r#"import\s*\(\s*['"](.+?)['"]\s*\)"#)?,
        ];
        let require_patterns = vec![
            // const X = require('module')
            Regex::new(r#"(?:const|let|var)\s+(.+?)\s*=\s*require\s*\(\s*['"](.+?)['"]\s*\)"#)?,
            // require('module')
            Regex::new(r#"require\s*\(\s*['"](.+?)['"]\s*\)"#)?,
        ];
        let function_patterns = vec![
            Regex::new(r"function\s+(\w+)\s*\(([^)]*)\)")?,
            Regex::new(r"(\w+)\s*:\s*function\s*\(([^)]*)\)")?,
            Regex::new(r"(\w+)\s*=\s*function\s*\(([^)]*)\)")?,
            Regex::new(r"(\w+)\s*=>")?,
            Regex::new(r"(\w+)\s*=\s*\(([^)]*)\)\s*=>")?,
        ];
        let class_pattern = Regex::new(r"class\s+(\w+)(?:\s+extends\s+(\w+))?\s*\{")?;
        let method_pattern = Regex::new(r"(\w+)\s*\([^)]*\)\s*\{")?;
        let export_patterns = vec![
            (Regex::new(r"export\s+default\s+(\w+)")?, ExportKind::Default),
            (Regex::new(r"export\s+\{\s*([^}]+)\s*\}")?, ExportKind::Named),
            (
                Regex::new(r"export\s+(?:const|let|var|function|class)\s+(\w+)")?,
                ExportKind::Named,
            ),
            (Regex::new(r"module\.exports\s*=\s*(\w+)")?, ExportKind::Named),
            (Regex::new(r"exports\.(\w+)\s*=")?, ExportKind::Named),
        ];
        let control_patterns = [
            r"\bif\b", r"\belse\b", r"\bfor\b", r"\bwhile\b", r"\bswitch\b", r"\bcatch\b",
            r"\b\?\b", r"\b&&\b", r"\b\|\|\b",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            import_patterns,
            require_patterns,
            function_patterns,
            class_pattern,
            method_pattern,
            export_patterns,
            control_patterns,
        })
    }

    /// Shared with the TypeScript parser, which reads the file once and
    /// layers its own extraction on top of this result.
    pub(crate) fn parse_source(&self, rel_path: &str, content: &str, last_modified: f64) -> ParsedFileInfo {
        ParsedFileInfo {
            path: rel_path.to_string(),
            language: "javascript".to_string(),
            size: content.len(),
            lines: content.lines().count(),
            dependencies: self.scan_dependencies(content),
            functions: self.scan_functions(content),
            classes: self.scan_classes(content),
            exports: self.scan_exports(content),
            interfaces: Vec::new(),
            types: Vec::new(),
            enums: Vec::new(),
            decorators: Vec::new(),
            complexity: self.complexity_of(content),
            last_modified,
            status: ParseStatus::Complete,
            error: None,
        }
    }

    fn scan_dependencies(&self, content: &str) -> Vec<DependencyReference> {
        let mut dependencies = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            let line_number = index + 1;
            if line.is_empty() || line.starts_with("//") || line.starts_with('*') {
                continue;
            }

            for (pattern_index, pattern) in self.import_patterns.iter().enumerate() {
                for caps in pattern.captures_iter(line) {
                    let (module, imported) = if pattern_index == 0 {
                        (caps[2].to_string(), Some(caps[1].trim().to_string()))
                    } else {
                        (caps[1].to_string(), None)
                    };
                    dependencies.push(DependencyReference {
                        kind: classify_import(&module),
                        name: module,
                        line: line_number,
                        syntax: ImportSyntax::Es6,
                        module: None,
                        imported,
                        alias: None,
                    });
                }
            }

            for (pattern_index, pattern) in self.require_patterns.iter().enumerate() {
                for caps in pattern.captures_iter(line) {
                    let (module, variable) = if pattern_index == 0 {
                        (caps[2].to_string(), Some(caps[1].trim().to_string()))
                    } else {
                        (caps[1].to_string(), None)
                    };
                    dependencies.push(DependencyReference {
                        kind: classify_import(&module),
                        name: module,
                        line: line_number,
                        syntax: ImportSyntax::CommonJs,
                        module: None,
                        imported: None,
                        alias: variable,
                    });
                }
            }
        }

        dependencies
    }

    fn scan_functions(&self, content: &str) -> Vec<FunctionInfo> {
        let mut functions = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            for pattern in &self.function_patterns {
                for caps in pattern.captures_iter(line) {
                    let params = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                    functions.push(FunctionInfo {
                        name: caps[1].to_string(),
                        line: index + 1,
                        params: split_params(params),
                        is_async: false,
                        is_arrow: line.contains("=>"),
                        decorators: Vec::new(),
                    });
                }
            }
        }

        functions
    }

    fn scan_classes(&self, content: &str) -> Vec<ClassInfo> {
        let lines: Vec<&str> = content.lines().collect();
        let mut classes = Vec::new();

        for (index, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            if let Some(caps) = self.class_pattern.captures(line) {
                classes.push(ClassInfo {
                    name: caps[1].to_string(),
                    line: index + 1,
                    bases: caps
                        .get(2)
                        .map(|m| vec![m.as_str().to_string()])
                        .unwrap_or_default(),
                    decorators: Vec::new(),
                    methods: self.class_methods(&lines, index + 1),
                });
            }
        }

        classes
    }

    /// Best-effort method scan bounded by brace depth from the class line.
    fn class_methods(&self, lines: &[&str], class_line: usize) -> Vec<String> {
        let mut methods = Vec::new();
        let mut brace_count: i64 = 0;
        let mut in_class = false;

        for raw_line in lines.iter().skip(class_line - 1) {
            let line = raw_line.trim();

            if line.contains('{') {
                brace_count += line.matches('{').count() as i64;
                in_class = true;
            }
            if line.contains('}') {
                brace_count -= line.matches('}').count() as i64;
                if brace_count <= 0 && in_class {
                    break;
                }
            }
            if in_class && brace_count > 0 {
                if let Some(caps) = self.method_pattern.captures(line) {
                    methods.push(caps[1].to_string());
                }
            }
        }

        methods
    }

    fn scan_exports(&self, content: &str) -> Vec<ExportInfo> {
        let mut exports = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            for (pattern, kind) in &self.export_patterns {
                for caps in pattern.captures_iter(line) {
                    exports.push(ExportInfo {
                        name: caps[1].to_string(),
                        line: index + 1,
                        kind: *kind,
                        syntax: if line.starts_with("export") {
                            ImportSyntax::Es6
                        } else {
                            ImportSyntax::CommonJs
                        },
                    });
                }
            }
        }

        exports
    }

    /// Control-flow token count normalized per non-blank line.
    fn complexity_of(&self, content: &str) -> Complexity {
        let mut score = 1usize;
        for pattern in &self.control_patterns {
            score += pattern.find_iter(content).count();
        }

        let lines = content.lines().filter(|line| !line.trim().is_empty()).count();
        let normalized = if lines > 0 {
            score as f64 / lines as f64 * 100.0
        } else {
            0.0
        };

        if normalized <= 5.0 {
            Complexity::Low
        } else if normalized <= 15.0 {
            Complexity::Medium
        } else {
            Complexity::High
        }
    }
}

impl FileParser for JavaScriptParser {
    fn parse_file(&self, repo_root: &Path, rel_path: &str) -> Result<ParsedFileInfo> {
        let full_path = repo_root.join(rel_path);
        let content = read_file_content(&full_path)?;
        Ok(self.parse_source(rel_path, &content, last_modified_secs(&full_path)))
    }

    fn extract_dependencies(&self, content: &str) -> Vec<DependencyReference> {
        self.scan_dependencies(content)
    }

    fn language(&self) -> &str {
        "javascript"
    }
}

/// Prefix heuristic: `./`-style paths are relative, absolute or `src/`
/// paths are internal, everything else is an external package.
pub(crate) fn classify_import(module: &str) -> DependencyKind {
    if module.starts_with("./") || module.starts_with("../") {
        DependencyKind::Relative
    } else if module.starts_with('/') || module.contains("src/") {
        DependencyKind::Internal
    } else {
        DependencyKind::External
    }
}

fn split_params(params: &str) -> Vec<String> {
    params
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(str::to_string)
        .collect()
}
