pub mod analyzer;
pub mod graph;
pub mod language;
pub mod metrics;
pub mod resolver;
pub mod scanner;

pub use analyzer::CodebaseAnalyzer;
pub use graph::{
    node_id_for_path, CodeGraph, DependencyGraph, GraphBuilder, GraphEdge, GraphMetadata,
    GraphNode,
};
pub use language::LanguageDetector;
pub use metrics::{normalize_scores, CentralityScores, GraphMetrics, GraphMetricsEngine, RankedNode};
pub use resolver::{DependencyPathResolver, ReverseDependency};
pub use scanner::{FileScanner, SourceFile};
