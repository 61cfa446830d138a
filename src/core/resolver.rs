use std::collections::HashSet;

use crate::parsers::{DependencyKind, DependencyReference, ParsedFileInfo};

/// Source-language extensions probed during resolution, in tie-break order.
const RESOLUTION_EXTENSIONS: &[&str] = &[".py", ".js", ".jsx", ".ts", ".tsx"];

/// A file found to depend on a given target path.
#[derive(Debug, Clone)]
pub struct ReverseDependency {
    pub path: String,
    pub name: String,
    pub line: usize,
    pub kind: DependencyKind,
}

/// Maps dependency references onto the discovered file set.
///
/// Candidate order is the deterministic tie-break: the first probe that
/// matches a known path wins. External references are never probed.
pub struct DependencyPathResolver {
    available: HashSet<String>,
}

impl DependencyPathResolver {
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            available: paths.into_iter().collect(),
        }
    }

    /// Resolves one reference from the perspective of `source_file`
    /// (repository-relative). `None` means the reference stays unresolved
    /// and contributes no edge.
    pub fn resolve(&self, reference: &DependencyReference, source_file: &str) -> Option<String> {
        if reference.kind == DependencyKind::External {
            return None;
        }
        for candidate in self.candidates(reference, source_file) {
            let normalized = normalize_path(&candidate);
            if self.available.contains(&normalized) {
                return Some(normalized);
            }
        }
        None
    }

    /// Files whose references resolve to `target`, one entry per dependent.
    pub fn dependents_of<'a, I>(&self, target: &str, parsed_files: I) -> Vec<ReverseDependency>
    where
        I: IntoIterator<Item = &'a ParsedFileInfo>,
    {
        let mut dependents = Vec::new();
        for info in parsed_files {
            if info.path == target {
                continue;
            }
            for reference in &info.dependencies {
                if self.resolve(reference, &info.path).as_deref() == Some(target) {
                    dependents.push(ReverseDependency {
                        path: info.path.clone(),
                        name: basename(&info.path).to_string(),
                        line: reference.line,
                        kind: reference.kind,
                    });
                    break;
                }
            }
        }
        dependents
    }

    fn candidates(&self, reference: &DependencyReference, source_file: &str) -> Vec<String> {
        let name = reference.name.as_str();
        let base_dir = parent_dir(source_file);

        let mut bases: Vec<String> = Vec::new();
        if reference.kind == DependencyKind::Relative {
            // Only path-style relative references are resolvable; dotted
            // Python relatives carry no `./` prefix and fall through.
            if name.starts_with("./") || name.starts_with("../") {
                let clean = name.strip_prefix("./").unwrap_or(name);
                bases.push(join(base_dir, clean));
            }
        } else {
            bases.push(name.to_string());
            bases.push(format!("src/{}", name));
            bases.push(format!("lib/{}", name));
            bases.push(join(base_dir, name));
        }

        let mut candidates = bases.clone();
        for base in &bases {
            for ext in RESOLUTION_EXTENSIONS {
                candidates.push(format!("{}{}", base, ext));
            }
            for ext in RESOLUTION_EXTENSIONS {
                candidates.push(format!("{}/index{}", base, ext));
                candidates.push(format!("{}/__init__{}", base, ext));
            }
        }
        candidates
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn join(base_dir: &str, tail: &str) -> String {
    if base_dir.is_empty() {
        tail.to_string()
    } else {
        format!("{}/{}", base_dir, tail)
    }
}

/// Collapses `.` and `..` components the way `os.path.normpath` does, so a
/// traversal like `src/../lib/x` compares equal to `lib/x`.
fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if !absolute && (parts.is_empty() || parts.last() == Some(&"..")) {
                    parts.push("..");
                } else {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
