use codeflow::core::{
    normalize_scores, DependencyPathResolver, GraphBuilder, GraphMetricsEngine,
};
use codeflow::parsers::{
    Complexity, DependencyKind, DependencyReference, ImportSyntax, ParseStatus, ParsedFileInfo,
};

fn parsed(path: &str, deps: Vec<&str>) -> ParsedFileInfo {
    ParsedFileInfo {
        path: path.to_string(),
        language: "javascript".to_string(),
        size: 1,
        lines: 1,
        dependencies: deps
            .into_iter()
            .map(|name| DependencyReference {
                name: name.to_string(),
                kind: DependencyKind::Relative,
                line: 1,
                syntax: ImportSyntax::Es6,
                module: None,
                imported: None,
                alias: None,
            })
            .collect(),
        functions: Vec::new(),
        classes: Vec::new(),
        exports: Vec::new(),
        interfaces: Vec::new(),
        types: Vec::new(),
        enums: Vec::new(),
        decorators: Vec::new(),
        complexity: Complexity::Low,
        last_modified: 0.0,
        status: ParseStatus::Complete,
        error: None,
    }
}

fn graph_of(files: Vec<ParsedFileInfo>) -> codeflow::core::DependencyGraph {
    let resolver = DependencyPathResolver::new(files.iter().map(|f| f.path.clone()));
    GraphBuilder::assemble(&files, &resolver)
}

/// a -> b -> c
fn chain() -> codeflow::core::DependencyGraph {
    graph_of(vec![
        parsed("a.js", vec!["./b"]),
        parsed("b.js", vec!["./c"]),
        parsed("c.js", vec![]),
    ])
}

#[test]
fn empty_graph_produces_empty_metrics() {
    let graph = graph_of(Vec::new());
    let metrics = GraphMetricsEngine::compute(&graph);

    assert_eq!(metrics.node_count, 0);
    assert_eq!(metrics.edge_count, 0);
    assert_eq!(metrics.density, 0.0);
    assert!(!metrics.is_connected);
    assert_eq!(metrics.average_degree, 0.0);
    assert!(metrics.centrality.pagerank.is_empty());
    assert!(metrics.centrality.importance.is_empty());
}

#[test]
fn chain_graph_level_metrics() {
    let metrics = GraphMetricsEngine::compute(&chain());

    assert_eq!(metrics.node_count, 3);
    assert_eq!(metrics.edge_count, 2);
    assert!((metrics.density - 2.0 / 6.0).abs() < 1e-12);
    assert!(metrics.is_connected);
    assert!((metrics.average_degree - 4.0 / 3.0).abs() < 1e-12);
}

#[test]
fn disconnected_graph_is_flagged() {
    let graph = graph_of(vec![
        parsed("a.js", vec!["./b"]),
        parsed("b.js", vec![]),
        parsed("island.js", vec![]),
    ]);
    let metrics = GraphMetricsEngine::compute(&graph);
    assert!(!metrics.is_connected);
}

#[test]
fn pagerank_sums_to_one_and_favors_sinks() {
    let metrics = GraphMetricsEngine::compute(&chain());
    let pagerank = &metrics.centrality.pagerank;

    let total: f64 = pagerank.values().sum();
    assert!((total - 1.0).abs() < 1e-3);

    // c receives rank from the whole chain
    assert!(pagerank["c_js"] > pagerank["a_js"]);
}

#[test]
fn betweenness_peaks_on_the_middle_node() {
    let metrics = GraphMetricsEngine::compute(&chain());
    let betweenness = &metrics.centrality.betweenness;

    assert!(betweenness["b_js"] > betweenness["a_js"]);
    assert!(betweenness["b_js"] > betweenness["c_js"]);
    // a->b->c is the only path through b: exactly one pair, normalized by 2
    assert!((betweenness["b_js"] - 0.5).abs() < 1e-12);
}

#[test]
fn degree_centrality_normalizes_by_twice_the_max_degree() {
    let metrics = GraphMetricsEngine::compute(&chain());
    let degree = &metrics.centrality.degree;

    // b has in+out = 2, the max; a and c have 1
    assert!((degree["b_js"] - 0.5).abs() < 1e-12);
    assert!((degree["a_js"] - 0.25).abs() < 1e-12);
    assert!((degree["c_js"] - 0.25).abs() < 1e-12);
}

#[test]
fn degree_centrality_is_zero_without_edges() {
    let graph = graph_of(vec![parsed("a.js", vec![]), parsed("b.js", vec![])]);
    let metrics = GraphMetricsEngine::compute(&graph);

    assert!(metrics.centrality.degree.values().all(|&v| v == 0.0));
}

#[test]
fn closeness_rewards_reachable_nodes() {
    let metrics = GraphMetricsEngine::compute(&chain());
    let closeness = &metrics.centrality.closeness;

    // closeness uses incoming distances: c is reached by everyone
    assert!(closeness["c_js"] > closeness["b_js"]);
    assert!(closeness["b_js"] > 0.0);
    assert_eq!(closeness["a_js"], 0.0);
}

#[test]
fn importance_is_a_convex_combination() {
    let metrics = GraphMetricsEngine::compute(&chain());
    let centrality = &metrics.centrality;

    for (node, importance) in &centrality.importance {
        let expected = 0.35 * centrality.pagerank[node]
            + 0.25 * centrality.betweenness[node]
            + 0.20 * centrality.degree[node]
            + 0.15 * centrality.eigenvector[node]
            + 0.05 * centrality.closeness[node];
        assert!((importance - expected).abs() < 1e-12);
        assert!(*importance >= 0.0 && *importance <= 1.0);
    }
}

#[test]
fn top_nodes_ranks_descending_with_one_based_ranks() {
    let metrics = GraphMetricsEngine::compute(&chain());
    let top = metrics.centrality.top_nodes("degree", 2);

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].node_id, "b_js");
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[1].rank, 2);
    assert!(top[0].score >= top[1].score);

    assert!(metrics.centrality.top_nodes("unknown", 5).is_empty());
}

#[test]
fn normalize_scores_maps_flat_distributions_to_half() {
    let mut scores = std::collections::BTreeMap::new();
    scores.insert("a".to_string(), 2.0);
    scores.insert("b".to_string(), 2.0);

    let normalized = normalize_scores(&scores);
    assert!(normalized.values().all(|&v| v == 0.5));

    scores.insert("c".to_string(), 4.0);
    let normalized = normalize_scores(&scores);
    assert_eq!(normalized["a"], 0.0);
    assert_eq!(normalized["c"], 1.0);
}

#[test]
fn parallel_imports_collapse_for_metric_purposes() {
    // two references to the same file produce two edges but one adjacency
    let graph = graph_of(vec![
        parsed("a.js", vec!["./b", "./b"]),
        parsed("b.js", vec![]),
    ]);
    let metrics = GraphMetricsEngine::compute(&graph);

    assert_eq!(metrics.edge_count, 2);
    assert!((metrics.density - 0.5).abs() < 1e-12);
    assert!((metrics.average_degree - 1.0).abs() < 1e-12);
}
