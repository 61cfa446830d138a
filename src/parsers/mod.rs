pub mod javascript;
pub mod python;
pub mod typescript;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Classification of a raw import string, decided before path resolution.
/// Only non-external references are eligible for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Relative,
    Internal,
    External,
}

/// The syntactic form the reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSyntax {
    #[serde(rename = "es6")]
    Es6,
    #[serde(rename = "commonjs")]
    CommonJs,
    #[serde(rename = "python-import")]
    PythonImport,
    #[serde(rename = "python-from")]
    PythonFrom,
}

/// A raw import plus its classification and source location, prior to
/// resolution. Never mutated after the parser emits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReference {
    /// The module string as written (dotted for Python `from` imports).
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub line: usize,
    pub syntax: ImportSyntax,
    /// Module part of a Python `from module import name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Imported clause (ES6) or imported name (Python `from`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported: Option<String>,
    /// Bound name: an `as` alias or a `require` binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    pub line: usize,
    pub params: Vec<String>,
    pub is_async: bool,
    pub is_arrow: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub line: usize,
    /// Base classes (Python) or the single `extends` target (JS/TS).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Default,
    Named,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub name: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: ExportKind,
    pub syntax: ImportSyntax,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAliasInfo {
    pub name: String,
    pub line: usize,
    /// Right-hand side of the alias, verbatim.
    pub definition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumInfo {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoratorUsage {
    pub name: String,
    pub line: usize,
    /// Raw matched text including arguments.
    pub full: String,
}

/// Parse fidelity. `Partial` marks a file kept with degraded data (for
/// example the Python regex fallback after a syntax error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Complete,
    Partial,
}

/// Everything extracted from one source file. Produced once per parse,
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFileInfo {
    pub path: String,
    pub language: String,
    pub size: usize,
    pub lines: usize,
    pub dependencies: Vec<DependencyReference>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<ExportInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeAliasInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<DecoratorUsage>,
    pub complexity: Complexity,
    /// Seconds since the Unix epoch, 0.0 when the filesystem withholds it.
    pub last_modified: f64,
    pub status: ParseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedFileInfo {
    pub fn is_complete(&self) -> bool {
        self.status == ParseStatus::Complete
    }
}

/// Per-language parsing capability. One implementation per language tag;
/// adding a language means registering another implementation.
pub trait FileParser {
    /// Parses one file addressed relative to the repository root.
    fn parse_file(&self, repo_root: &Path, rel_path: &str) -> Result<ParsedFileInfo>;

    /// Extracts dependency references from raw source text.
    fn extract_dependencies(&self, content: &str) -> Vec<DependencyReference>;

    fn language(&self) -> &str;
}

/// Language-tag dispatch over the registered parsers.
///
/// A tag without a parser yields `None` and the file is silently dropped
/// from the graph; that is expected, not an error.
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn FileParser + Send + Sync>>,
}

impl ParserRegistry {
    /// Registry with the built-in Python, JavaScript and TypeScript parsers.
    pub fn new() -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Box::new(python::PythonParser::new()?));
        registry.register(Box::new(javascript::JavaScriptParser::new()?));
        registry.register(Box::new(typescript::TypeScriptParser::new()?));
        Ok(registry)
    }

    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Registers a parser under its own language tag, replacing any
    /// previous parser for that tag.
    pub fn register(&mut self, parser: Box<dyn FileParser + Send + Sync>) {
        self.parsers.insert(parser.language().to_string(), parser);
    }

    pub fn get(&self, language: &str) -> Option<&(dyn FileParser + Send + Sync)> {
        self.parsers.get(language).map(Box::as_ref)
    }

    pub fn supports(&self, language: &str) -> bool {
        self.parsers.contains_key(language)
    }
}

/// Reads a file as UTF-8, replacing invalid sequences instead of failing.
pub(crate) fn read_file_content(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

pub(crate) fn last_modified_secs(path: &Path) -> f64 {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs_f64())
        .unwrap_or(0.0)
}
