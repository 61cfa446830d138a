use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::{Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::metrics::GraphMetrics;
use super::resolver::DependencyPathResolver;
use crate::parsers::{ClassInfo, Complexity, DependencyKind, FunctionInfo, ParsedFileInfo};

/// Stable node id for a repository-relative path: separators and dots
/// collapse to one delimiter.
pub fn node_id_for_path(path: &str) -> String {
    path.replace('\\', "/").replace(['/', '.'], "_")
}

/// One node per parsed file, carrying the structural summary used by
/// downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub path: String,
    pub language: String,
    pub size: usize,
    pub lines: usize,
    pub complexity: Complexity,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub last_modified: f64,
}

impl GraphNode {
    pub fn from_parsed(info: &ParsedFileInfo) -> Self {
        Self {
            id: node_id_for_path(&info.path),
            name: basename(&info.path).to_string(),
            path: info.path.clone(),
            language: info.language.clone(),
            size: info.size,
            lines: info.lines,
            complexity: info.complexity,
            functions: info.functions.clone(),
            classes: info.classes.clone(),
            last_modified: info.last_modified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub line: usize,
    pub strength: f64,
}

pub type DependencyGraph = Graph<GraphNode, GraphEdge, Directed>;

/// Snapshot metadata: discovery vs parse counters plus the analyzed root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub total_files: usize,
    pub parsed_files: usize,
    pub repository_path: String,
}

/// The complete, serializable analysis snapshot. Produced atomically per
/// invocation; a new analysis replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metrics: GraphMetrics,
    pub metadata: GraphMetadata,
}

/// Incremental construction of the petgraph-backed dependency graph.
pub struct GraphBuilder {
    graph: DependencyGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds the full graph from parsed files: one node per file, one edge
    /// per resolved non-external reference, self-references dropped.
    pub fn assemble(
        parsed_files: &[ParsedFileInfo],
        resolver: &DependencyPathResolver,
    ) -> DependencyGraph {
        let mut builder = Self::new();

        for info in parsed_files {
            builder.add_node(GraphNode::from_parsed(info));
        }

        for info in parsed_files {
            let source_id = node_id_for_path(&info.path);
            for reference in &info.dependencies {
                if reference.kind == DependencyKind::External {
                    continue;
                }
                let Some(target_path) = resolver.resolve(reference, &info.path) else {
                    continue;
                };
                builder.add_edge(GraphEdge {
                    source: source_id.clone(),
                    target: node_id_for_path(&target_path),
                    kind: reference.kind,
                    line: reference.line,
                    strength: 1.0,
                });
            }
        }

        builder.build()
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        index
    }

    /// Refuses edges whose endpoints are unknown and self-referencing edges.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Option<EdgeIndex> {
        let source = *self.node_map.get(&edge.source)?;
        let target = *self.node_map.get(&edge.target)?;
        if source == target {
            return None;
        }
        Some(self.graph.add_edge(source, target, edge))
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
