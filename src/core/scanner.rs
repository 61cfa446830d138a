use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::config::AnalysisConfig;

/// One discovered file, immutable after the scan.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Repository-relative path with POSIX separators.
    pub rel_path: String,
    /// Byte size reported by the directory entry.
    pub size: u64,
}

/// Walks a repository root and keeps files whose extension is allow-listed.
///
/// Directories whose name starts with `.` or matches the configured ignore
/// set are pruned before descent. Per-entry filesystem errors (permissions,
/// broken symlinks) skip the entry; only an inaccessible root is fatal.
pub struct FileScanner {
    allowed_extensions: HashSet<String>,
    ignored_dirs: HashSet<String>,
}

impl FileScanner {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            allowed_extensions: config.allowed_extensions.clone(),
            ignored_dirs: config.ignored_dirs.clone(),
        }
    }

    /// Returns the discovered files in lexicographic path order.
    pub fn scan_repository(&self, root: &Path) -> Result<Vec<SourceFile>> {
        let metadata = std::fs::metadata(root)
            .with_context(|| format!("cannot access repository root {}", root.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("repository root {} is not a directory", root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| self.should_descend(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
                continue;
            };
            if !self.allowed_extensions.contains(&extension.to_lowercase()) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(SourceFile {
                rel_path: to_posix(relative),
                size,
            });
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(files)
    }

    fn should_descend(&self, entry: &DirEntry) -> bool {
        // The root itself is always entered, whatever it is named.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !name.starts_with('.') && !self.ignored_dirs.contains(name.as_ref())
    }
}

fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
