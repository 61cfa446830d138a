use anyhow::Result;
use regex::Regex;
use std::path::Path;

use super::javascript::JavaScriptParser;
use super::{
    last_modified_secs, read_file_content, DecoratorUsage, DependencyReference, EnumInfo,
    FileParser, InterfaceInfo, ParsedFileInfo, TypeAliasInfo,
};

/// TypeScript parser composed around the JavaScript scanner.
///
/// All base extraction (imports, functions, classes, exports, complexity)
/// is delegated; this layer only overrides the language tag and adds the
/// TypeScript-specific declarations.
pub struct TypeScriptParser {
    inner: JavaScriptParser,
    interface_pattern: Regex,
    type_pattern: Regex,
    enum_pattern: Regex,
    decorator_pattern: Regex,
}

impl TypeScriptParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: JavaScriptParser::new()?,
            interface_pattern: Regex::new(r"interface\s+(\w+)(?:\s+extends\s+([\w,\s]+))?\s*\{")?,
            type_pattern: Regex::new(r"type\s+(\w+)\s*=\s*(.+);")?,
            enum_pattern: Regex::new(r"enum\s+(\w+)\s*\{")?,
            decorator_pattern: Regex::new(r"@(\w+)(?:\([^)]*\))?")?,
        })
    }

    fn scan_interfaces(&self, content: &str) -> Vec<InterfaceInfo> {
        let mut interfaces = Vec::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if let Some(caps) = self.interface_pattern.captures(line) {
                interfaces.push(InterfaceInfo {
                    name: caps[1].to_string(),
                    line: index + 1,
                    extends: caps
                        .get(2)
                        .map(|m| {
                            m.as_str()
                                .split(',')
                                .map(str::trim)
                                .filter(|base| !base.is_empty())
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default(),
                });
            }
        }
        interfaces
    }

    fn scan_type_aliases(&self, content: &str) -> Vec<TypeAliasInfo> {
        let mut types = Vec::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if let Some(caps) = self.type_pattern.captures(line) {
                types.push(TypeAliasInfo {
                    name: caps[1].to_string(),
                    line: index + 1,
                    definition: caps[2].trim().to_string(),
                });
            }
        }
        types
    }

    fn scan_enums(&self, content: &str) -> Vec<EnumInfo> {
        let mut enums = Vec::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if let Some(caps) = self.enum_pattern.captures(line) {
                enums.push(EnumInfo {
                    name: caps[1].to_string(),
                    line: index + 1,
                });
            }
        }
        enums
    }

    fn scan_decorators(&self, content: &str) -> Vec<DecoratorUsage> {
        let mut decorators = Vec::new();
        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            for caps in self.decorator_pattern.captures_iter(line) {
                decorators.push(DecoratorUsage {
                    name: caps[1].to_string(),
                    line: index + 1,
                    full: caps[0].to_string(),
                });
            }
        }
        decorators
    }
}

impl FileParser for TypeScriptParser {
    fn parse_file(&self, repo_root: &Path, rel_path: &str) -> Result<ParsedFileInfo> {
        let full_path = repo_root.join(rel_path);
        let content = read_file_content(&full_path)?;

        let mut info = self
            .inner
            .parse_source(rel_path, &content, last_modified_secs(&full_path));
        info.language = "typescript".to_string();
        info.interfaces = self.scan_interfaces(&content);
        info.types = self.scan_type_aliases(&content);
        info.enums = self.scan_enums(&content);
        info.decorators = self.scan_decorators(&content);
        Ok(info)
    }

    fn extract_dependencies(&self, content: &str) -> Vec<DependencyReference> {
        self.inner.extract_dependencies(content)
    }

    fn language(&self) -> &str {
        "typescript"
    }
}
