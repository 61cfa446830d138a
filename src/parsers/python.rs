use anyhow::Result;
use regex::Regex;
use std::path::Path;
use tree_sitter::{Node as TSNode, Parser, Tree};

use super::{
    last_modified_secs, read_file_content, ClassInfo, Complexity, DependencyKind,
    DependencyReference, FileParser, FunctionInfo, ImportSyntax, ParseStatus, ParsedFileInfo,
};

/// Module names treated as standard library by the classification heuristic.
const STDLIB_HINTS: &[&str] = &["os", "sys", "json", "datetime"];

/// Syntax-tree constructs that each add one point of complexity.
const BRANCHING_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "while_statement",
    "for_statement",
    "except_clause",
    "boolean_operator",
];

/// Python parser backed by a full syntax tree.
///
/// When the grammar rejects a file, extraction degrades to a line-oriented
/// regex pass that still recovers `import`/`from` statements; the file is
/// kept with partial status instead of being dropped.
pub struct PythonParser {
    import_fallback: Regex,
    from_fallback: Regex,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_fallback: Regex::new(r"^import\s+([\w.]+)(?:\s+as\s+(\w+))?")?,
            from_fallback: Regex::new(r"^from\s+([\w.]*)\s+import\s+([\w,\s*]+)")?,
        })
    }

    fn parse_tree(content: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(tree_sitter_python::language())?;
        parser
            .parse(content, None)
            .ok_or_else(|| anyhow::anyhow!("tree-sitter produced no tree"))
    }

    fn collect_imports(&self, node: &TSNode, source: &[u8], out: &mut Vec<DependencyReference>) {
        match node.kind() {
            "import_statement" => self.process_import(node, source, out),
            "import_from_statement" => self.process_import_from(node, source, out),
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_imports(&child, source, out);
        }
    }

    fn process_import(&self, node: &TSNode, source: &[u8], out: &mut Vec<DependencyReference>) {
        let line = node.start_position().row + 1;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "dotted_name" => {
                    let name = node_text(&child, source).to_string();
                    out.push(DependencyReference {
                        kind: classify_import(&name, 0),
                        name,
                        line,
                        syntax: ImportSyntax::PythonImport,
                        module: None,
                        imported: None,
                        alias: None,
                    });
                }
                "aliased_import" => {
                    let Some(name_node) = child.child_by_field_name("name") else {
                        continue;
                    };
                    let name = node_text(&name_node, source).to_string();
                    let alias = child
                        .child_by_field_name("alias")
                        .map(|alias_node| node_text(&alias_node, source).to_string());
                    out.push(DependencyReference {
                        kind: classify_import(&name, 0),
                        name,
                        line,
                        syntax: ImportSyntax::PythonImport,
                        module: None,
                        imported: None,
                        alias,
                    });
                }
                _ => {}
            }
        }
    }

    fn process_import_from(&self, node: &TSNode, source: &[u8], out: &mut Vec<DependencyReference>) {
        let line = node.start_position().row + 1;

        let (module, level) = match node.child_by_field_name("module_name") {
            Some(module_node) if module_node.kind() == "relative_import" => {
                let text = node_text(&module_node, source);
                let level = text.chars().take_while(|&c| c == '.').count();
                (text.trim_start_matches('.').to_string(), level)
            }
            Some(module_node) => (node_text(&module_node, source).to_string(), 0),
            None => (String::new(), 0),
        };
        let kind = classify_import(&module, level);

        let mut names: Vec<(String, Option<String>)> = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            match child.kind() {
                "dotted_name" => names.push((node_text(&child, source).to_string(), None)),
                "aliased_import" => {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        let alias = child
                            .child_by_field_name("alias")
                            .map(|alias_node| node_text(&alias_node, source).to_string());
                        names.push((node_text(&name_node, source).to_string(), alias));
                    }
                }
                _ => {}
            }
        }
        if names.is_empty() {
            let mut cursor = node.walk();
            if node
                .children(&mut cursor)
                .any(|child| child.kind() == "wildcard_import")
            {
                names.push(("*".to_string(), None));
            }
        }

        for (imported, alias) in names {
            let name = if module.is_empty() {
                imported.clone()
            } else {
                format!("{}.{}", module, imported)
            };
            out.push(DependencyReference {
                name,
                kind,
                line,
                syntax: ImportSyntax::PythonFrom,
                module: Some(module.clone()),
                imported: Some(imported),
                alias,
            });
        }
    }

    fn collect_functions(&self, node: &TSNode, source: &[u8], out: &mut Vec<FunctionInfo>) {
        if node.kind() == "function_definition" {
            out.push(self.function_info(node, source));
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_functions(&child, source, out);
        }
    }

    fn function_info(&self, node: &TSNode, source: &[u8]) -> FunctionInfo {
        let name = node
            .child_by_field_name("name")
            .map(|name_node| node_text(&name_node, source).to_string())
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|params_node| param_names(&params_node, source))
            .unwrap_or_default();
        let is_async = node
            .child(0)
            .map(|first| first.kind() == "async")
            .unwrap_or(false);

        FunctionInfo {
            name,
            line: node.start_position().row + 1,
            params,
            is_async,
            is_arrow: false,
            decorators: decorator_names(node, source),
        }
    }

    fn collect_classes(&self, node: &TSNode, source: &[u8], out: &mut Vec<ClassInfo>) {
        if node.kind() == "class_definition" {
            out.push(self.class_info(node, source));
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_classes(&child, source, out);
        }
    }

    fn class_info(&self, node: &TSNode, source: &[u8]) -> ClassInfo {
        let name = node
            .child_by_field_name("name")
            .map(|name_node| node_text(&name_node, source).to_string())
            .unwrap_or_default();

        let mut bases = Vec::new();
        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            let mut cursor = superclasses.walk();
            for child in superclasses.children(&mut cursor) {
                if matches!(child.kind(), "identifier" | "attribute") {
                    bases.push(node_text(&child, source).to_string());
                }
            }
        }

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.children(&mut cursor) {
                let function = match child.kind() {
                    "function_definition" => Some(child),
                    "decorated_definition" => child
                        .child_by_field_name("definition")
                        .filter(|definition| definition.kind() == "function_definition"),
                    _ => None,
                };
                if let Some(function) = function {
                    if let Some(name_node) = function.child_by_field_name("name") {
                        methods.push(node_text(&name_node, source).to_string());
                    }
                }
            }
        }

        ClassInfo {
            name,
            line: node.start_position().row + 1,
            bases,
            decorators: decorator_names(node, source),
            methods,
        }
    }

    fn complexity_of(root: &TSNode) -> Complexity {
        let mut score = 1usize;
        count_branches(root, &mut score);
        if score <= 5 {
            Complexity::Low
        } else if score <= 10 {
            Complexity::Medium
        } else {
            Complexity::High
        }
    }

    /// Line-oriented recovery for files the grammar rejects.
    fn fallback_dependencies(&self, content: &str) -> Vec<DependencyReference> {
        let mut dependencies = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            let line_number = index + 1;

            if let Some(caps) = self.import_fallback.captures(line) {
                let name = caps[1].to_string();
                dependencies.push(DependencyReference {
                    kind: classify_import(&name, 0),
                    name,
                    line: line_number,
                    syntax: ImportSyntax::PythonImport,
                    module: None,
                    imported: None,
                    alias: caps.get(2).map(|m| m.as_str().to_string()),
                });
                continue;
            }

            if let Some(caps) = self.from_fallback.captures(line) {
                let module_raw = &caps[1];
                let level = module_raw.chars().take_while(|&c| c == '.').count();
                let module = module_raw.trim_start_matches('.').to_string();
                let kind = classify_import(&module, level);

                for item in caps[2].split(',') {
                    let item = item.trim();
                    if item.is_empty() {
                        continue;
                    }
                    let (imported, alias) = match item.split_once(" as ") {
                        Some((name, alias)) => {
                            (name.trim().to_string(), Some(alias.trim().to_string()))
                        }
                        None => (item.to_string(), None),
                    };
                    let name = if module.is_empty() {
                        imported.clone()
                    } else {
                        format!("{}.{}", module, imported)
                    };
                    dependencies.push(DependencyReference {
                        name,
                        kind,
                        line: line_number,
                        syntax: ImportSyntax::PythonFrom,
                        module: Some(module.clone()),
                        imported: Some(imported),
                        alias,
                    });
                }
            }
        }

        dependencies
    }

    fn degraded_info(&self, rel_path: &str, content: &str, last_modified: f64) -> ParsedFileInfo {
        ParsedFileInfo {
            path: rel_path.to_string(),
            language: "python".to_string(),
            size: content.len(),
            lines: content.lines().count(),
            dependencies: self.fallback_dependencies(content),
            functions: Vec::new(),
            classes: Vec::new(),
            exports: Vec::new(),
            interfaces: Vec::new(),
            types: Vec::new(),
            enums: Vec::new(),
            decorators: Vec::new(),
            complexity: Complexity::Low,
            last_modified,
            status: ParseStatus::Partial,
            error: Some("syntax_error".to_string()),
        }
    }
}

impl FileParser for PythonParser {
    fn parse_file(&self, repo_root: &Path, rel_path: &str) -> Result<ParsedFileInfo> {
        let full_path = repo_root.join(rel_path);
        let content = read_file_content(&full_path)?;
        let last_modified = last_modified_secs(&full_path);

        let tree = Self::parse_tree(&content)?;
        let root = tree.root_node();
        if root.has_error() {
            return Ok(self.degraded_info(rel_path, &content, last_modified));
        }

        let source = content.as_bytes();
        let mut dependencies = Vec::new();
        self.collect_imports(&root, source, &mut dependencies);
        let mut functions = Vec::new();
        self.collect_functions(&root, source, &mut functions);
        let mut classes = Vec::new();
        self.collect_classes(&root, source, &mut classes);

        Ok(ParsedFileInfo {
            path: rel_path.to_string(),
            language: "python".to_string(),
            size: content.len(),
            lines: content.lines().count(),
            dependencies,
            functions,
            classes,
            exports: Vec::new(),
            interfaces: Vec::new(),
            types: Vec::new(),
            enums: Vec::new(),
            decorators: Vec::new(),
            complexity: Self::complexity_of(&root),
            last_modified,
            status: ParseStatus::Complete,
            error: None,
        })
    }

    fn extract_dependencies(&self, content: &str) -> Vec<DependencyReference> {
        match Self::parse_tree(content) {
            Ok(tree) if !tree.root_node().has_error() => {
                let mut dependencies = Vec::new();
                self.collect_imports(&tree.root_node(), content.as_bytes(), &mut dependencies);
                dependencies
            }
            _ => self.fallback_dependencies(content),
        }
    }

    fn language(&self) -> &str {
        "python"
    }
}

/// Relative when the import level is non-zero, external when the module is
/// dotted or a known stdlib name, internal otherwise.
fn classify_import(module: &str, level: usize) -> DependencyKind {
    if level > 0 {
        DependencyKind::Relative
    } else if !module.is_empty() && (module.contains('.') || STDLIB_HINTS.contains(&module)) {
        DependencyKind::External
    } else {
        DependencyKind::Internal
    }
}

fn node_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// Positional parameter names; splat parameters are skipped.
fn param_names(params: &TSNode, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        match child.kind() {
            "identifier" => names.push(node_text(&child, source).to_string()),
            "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = first_identifier(&child, source) {
                    names.push(name);
                }
            }
            _ => {}
        }
    }
    names
}

fn first_identifier(node: &TSNode, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return Some(node_text(&child, source).to_string());
        }
    }
    None
}

/// Decorator names from a wrapping `decorated_definition`, argument lists
/// stripped.
fn decorator_names(node: &TSNode, source: &[u8]) -> Vec<String> {
    let Some(parent) = node.parent() else {
        return Vec::new();
    };
    if parent.kind() != "decorated_definition" {
        return Vec::new();
    }

    let mut names = Vec::new();
    let mut cursor = parent.walk();
    for child in parent.children(&mut cursor) {
        if child.kind() == "decorator" {
            let text = node_text(&child, source).trim_start_matches('@');
            let name = text.split('(').next().unwrap_or(text).trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names
}

fn count_branches(node: &TSNode, score: &mut usize) {
    if BRANCHING_KINDS.contains(&node.kind()) {
        *score += 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count_branches(&child, score);
    }
}
