use anyhow::Result;
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::Path;

use super::graph::{CodeGraph, GraphBuilder, GraphMetadata};
use super::language::LanguageDetector;
use super::metrics::GraphMetricsEngine;
use super::resolver::DependencyPathResolver;
use super::scanner::FileScanner;
use crate::config::AnalysisConfig;
use crate::parsers::{ParsedFileInfo, ParserRegistry};

/// Orchestrates one analysis pass: discover, parse, resolve, assemble,
/// score. Every invocation produces an independent snapshot; no state is
/// carried across runs.
pub struct CodebaseAnalyzer {
    scanner: FileScanner,
    detector: LanguageDetector,
    registry: ParserRegistry,
}

impl CodebaseAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            scanner: FileScanner::new(config),
            detector: LanguageDetector::new(),
            registry: ParserRegistry::new()?,
        })
    }

    /// Full control over the injected pieces, for callers that register
    /// extra parsers or swap the detector table.
    pub fn with_parts(
        scanner: FileScanner,
        detector: LanguageDetector,
        registry: ParserRegistry,
    ) -> Self {
        Self {
            scanner,
            detector,
            registry,
        }
    }

    pub fn analyze(&self, repo_path: &Path) -> Result<CodeGraph> {
        println!("Scanning files...");
        let files = self.scanner.scan_repository(repo_path)?;
        println!("Found {} files", files.len());

        println!("Parsing files...");
        let parsed: DashMap<String, ParsedFileInfo> = DashMap::with_capacity(files.len());
        files.par_iter().for_each(|file| {
            let Some(language) = self.detector.detect(&file.rel_path) else {
                return;
            };
            let Some(parser) = self.registry.get(language) else {
                return;
            };
            match parser.parse_file(repo_path, &file.rel_path) {
                Ok(info) => {
                    parsed.insert(file.rel_path.clone(), info);
                }
                Err(err) => {
                    eprintln!("Warning: failed to parse {}: {}", file.rel_path, err);
                }
            }
        });

        // Deterministic assembly order regardless of parse scheduling.
        let mut parsed_files: Vec<ParsedFileInfo> =
            parsed.into_iter().map(|(_, info)| info).collect();
        parsed_files.sort_by(|a, b| a.path.cmp(&b.path));
        println!("Parsed {} of {} files", parsed_files.len(), files.len());

        println!("Building dependency graph...");
        let resolver =
            DependencyPathResolver::new(parsed_files.iter().map(|info| info.path.clone()));
        let graph = GraphBuilder::assemble(&parsed_files, &resolver);

        println!("Computing graph metrics...");
        let metrics = GraphMetricsEngine::compute(&graph);

        Ok(CodeGraph {
            nodes: graph.node_weights().cloned().collect(),
            edges: graph.edge_weights().cloned().collect(),
            metrics,
            metadata: GraphMetadata {
                total_files: files.len(),
                parsed_files: parsed_files.len(),
                repository_path: repo_path.display().to_string(),
            },
        })
    }
}
