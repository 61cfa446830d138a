use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::graph::DependencyGraph;

const PAGERANK_DAMPING: f64 = 0.85;
const PAGERANK_MAX_ITER: usize = 100;
const EIGENVECTOR_MAX_ITER: usize = 1000;
const CONVERGENCE_TOLERANCE: f64 = 1e-6;
/// Exact betweenness up to this many nodes; larger graphs are sampled.
const BETWEENNESS_EXACT_LIMIT: usize = 1000;
const BETWEENNESS_SAMPLE_SIZE: usize = 100;

/// Fixed weights of the composite importance score.
const IMPORTANCE_WEIGHTS: [(Measure, f64); 5] = [
    (Measure::Pagerank, 0.35),
    (Measure::Betweenness, 0.25),
    (Measure::Degree, 0.20),
    (Measure::Eigenvector, 0.15),
    (Measure::Closeness, 0.05),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Pagerank,
    Betweenness,
    Degree,
    Eigenvector,
    Closeness,
}

pub type NodeScores = BTreeMap<String, f64>;

/// Per-node centrality measures plus the composite importance score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CentralityScores {
    pub pagerank: NodeScores,
    pub betweenness: NodeScores,
    pub degree: NodeScores,
    pub eigenvector: NodeScores,
    pub closeness: NodeScores,
    pub importance: NodeScores,
}

impl CentralityScores {
    pub fn measure(&self, name: &str) -> Option<&NodeScores> {
        match name {
            "pagerank" => Some(&self.pagerank),
            "betweenness" => Some(&self.betweenness),
            "degree" => Some(&self.degree),
            "eigenvector" => Some(&self.eigenvector),
            "closeness" => Some(&self.closeness),
            "importance" => Some(&self.importance),
            _ => None,
        }
    }

    /// Stable descending sort with 1-based ranks.
    pub fn top_nodes(&self, measure: &str, limit: usize) -> Vec<RankedNode> {
        let Some(scores) = self.measure(measure) else {
            return Vec::new();
        };
        let mut entries: Vec<(&String, &f64)> = scores.iter().collect();
        entries.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
        entries
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, (node_id, score))| RankedNode {
                node_id: node_id.clone(),
                score: *score,
                rank: index + 1,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedNode {
    pub node_id: String,
    pub score: f64,
    pub rank: usize,
}

/// Graph-level metrics for one analysis snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub is_connected: bool,
    pub average_degree: f64,
    pub centrality: CentralityScores,
}

/// Computes density, connectivity and the five centrality measures.
///
/// A measure that fails to converge degrades to an all-zero mapping; it
/// never aborts the remaining measures.
pub struct GraphMetricsEngine;

impl GraphMetricsEngine {
    pub fn compute(graph: &DependencyGraph) -> GraphMetrics {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let adjacency = Adjacency::of(graph);
        let simple_edges = adjacency.simple_edge_count();

        let density = if node_count > 1 {
            simple_edges as f64 / (node_count as f64 * (node_count as f64 - 1.0))
        } else {
            0.0
        };
        let is_connected =
            node_count > 0 && petgraph::algo::connected_components(graph) == 1;
        let average_degree = if node_count > 0 {
            2.0 * simple_edges as f64 / node_count as f64
        } else {
            0.0
        };

        GraphMetrics {
            node_count,
            edge_count,
            density,
            is_connected,
            average_degree,
            centrality: Self::centrality_scores(graph, &adjacency),
        }
    }

    fn centrality_scores(graph: &DependencyGraph, adjacency: &Adjacency) -> CentralityScores {
        if graph.node_count() == 0 {
            return CentralityScores::default();
        }

        let ids = node_ids(graph);
        let pagerank = Self::pagerank(adjacency).map_or_else(
            || {
                eprintln!("Warning: pagerank did not converge; scoring zeros");
                zero_scores(&ids)
            },
            |scores| to_scores(&ids, &scores),
        );
        let betweenness = to_scores(&ids, &Self::betweenness(adjacency));
        let degree = to_scores(&ids, &Self::degree(adjacency));
        let eigenvector = Self::eigenvector(adjacency).map_or_else(
            || {
                eprintln!("Warning: eigenvector centrality did not converge; scoring zeros");
                zero_scores(&ids)
            },
            |scores| to_scores(&ids, &scores),
        );
        let closeness = to_scores(&ids, &Self::closeness(adjacency));

        let importance = Self::composite_importance(&[
            (Measure::Pagerank, &pagerank),
            (Measure::Betweenness, &betweenness),
            (Measure::Degree, &degree),
            (Measure::Eigenvector, &eigenvector),
            (Measure::Closeness, &closeness),
        ]);

        CentralityScores {
            pagerank,
            betweenness,
            degree,
            eigenvector,
            closeness,
            importance,
        }
    }

    /// Power iteration with uniform teleport and dangling-mass
    /// redistribution. `None` when the iteration cap is hit first.
    fn pagerank(adjacency: &Adjacency) -> Option<Vec<f64>> {
        let n = adjacency.len();
        let nf = n as f64;
        let mut rank = vec![1.0 / nf; n];

        for _ in 0..PAGERANK_MAX_ITER {
            let mut next = vec![(1.0 - PAGERANK_DAMPING) / nf; n];

            let dangling: f64 = (0..n)
                .filter(|&v| adjacency.out[v].is_empty())
                .map(|v| rank[v])
                .sum();
            let dangling_share = PAGERANK_DAMPING * dangling / nf;

            for v in 0..n {
                let out_degree = adjacency.out[v].len();
                if out_degree == 0 {
                    continue;
                }
                let share = PAGERANK_DAMPING * rank[v] / out_degree as f64;
                for &w in &adjacency.out[v] {
                    next[w] += share;
                }
            }
            for value in next.iter_mut() {
                *value += dangling_share;
            }

            let err: f64 = next
                .iter()
                .zip(&rank)
                .map(|(a, b)| (a - b).abs())
                .sum();
            rank = next;
            if err < nf * CONVERGENCE_TOLERANCE {
                return Some(rank);
            }
        }
        None
    }

    /// Brandes' algorithm over the directed graph, normalized by
    /// (n-1)(n-2). Above the exact limit only a deterministic pivot sample
    /// is expanded and the result is scaled by n/k.
    fn betweenness(adjacency: &Adjacency) -> Vec<f64> {
        let n = adjacency.len();
        let mut centrality = vec![0.0; n];

        let sources: Vec<usize> = if n > BETWEENNESS_EXACT_LIMIT {
            (0..BETWEENNESS_SAMPLE_SIZE.min(n)).collect()
        } else {
            (0..n).collect()
        };

        for &s in &sources {
            let mut stack = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0; n];
            sigma[s] = 1.0;
            let mut dist = vec![-1i64; n];
            dist[s] = 0;

            let mut queue = VecDeque::new();
            queue.push_back(s);
            while let Some(v) = queue.pop_front() {
                stack.push(v);
                for &w in &adjacency.out[v] {
                    if dist[w] < 0 {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        predecessors[w].push(v);
                    }
                }
            }

            let mut delta = vec![0.0; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }

        if n > 2 {
            let mut scale = 1.0 / ((n as f64 - 1.0) * (n as f64 - 2.0));
            if sources.len() < n {
                scale *= n as f64 / sources.len() as f64;
            }
            for value in centrality.iter_mut() {
                *value *= scale;
            }
        }
        centrality
    }

    /// Total degree over twice the maximum observed total degree.
    fn degree(adjacency: &Adjacency) -> Vec<f64> {
        let n = adjacency.len();
        let totals: Vec<usize> = (0..n)
            .map(|v| adjacency.out[v].len() + adjacency.incoming[v].len())
            .collect();
        let max_degree = totals.iter().copied().max().unwrap_or(0);
        if max_degree == 0 {
            return vec![0.0; n];
        }
        totals
            .iter()
            .map(|&total| total as f64 / (max_degree as f64 * 2.0))
            .collect()
    }

    /// Power iteration on the undirected projection, euclidean-normalized
    /// each step. `None` when the iteration cap is hit first.
    fn eigenvector(adjacency: &Adjacency) -> Option<Vec<f64>> {
        let n = adjacency.len();
        let nf = n as f64;
        let neighbors = adjacency.undirected();
        let mut x = vec![1.0 / nf; n];

        for _ in 0..EIGENVECTOR_MAX_ITER {
            let xlast = x.clone();
            for v in 0..n {
                for &w in &neighbors[v] {
                    x[w] += xlast[v];
                }
            }

            let norm: f64 = x.iter().map(|value| value * value).sum::<f64>().sqrt();
            let norm = if norm == 0.0 { 1.0 } else { norm };
            for value in x.iter_mut() {
                *value /= norm;
            }

            let err: f64 = x.iter().zip(&xlast).map(|(a, b)| (a - b).abs()).sum();
            if err < nf * CONVERGENCE_TOLERANCE {
                return Some(x);
            }
        }
        None
    }

    /// Closeness on incoming distances, scaled by the reachable fraction
    /// so partially-reachable nodes are not overvalued.
    fn closeness(adjacency: &Adjacency) -> Vec<f64> {
        let n = adjacency.len();
        let nf = n as f64;
        let mut scores = vec![0.0; n];
        if n < 2 {
            return scores;
        }

        for u in 0..n {
            let mut dist = vec![-1i64; n];
            dist[u] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(u);
            while let Some(v) = queue.pop_front() {
                for &w in &adjacency.incoming[v] {
                    if dist[w] < 0 {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                }
            }

            let mut total_distance = 0i64;
            let mut reachable = 0i64;
            for &d in &dist {
                if d >= 0 {
                    total_distance += d;
                    reachable += 1;
                }
            }
            if total_distance > 0 {
                let closeness = (reachable as f64 - 1.0) / total_distance as f64;
                scores[u] = closeness * ((reachable as f64 - 1.0) / (nf - 1.0));
            }
        }
        scores
    }

    /// Weighted combination over the union of node ids appearing in any
    /// measure.
    fn composite_importance(measures: &[(Measure, &NodeScores)]) -> NodeScores {
        let mut all_nodes: BTreeSet<&String> = BTreeSet::new();
        for (_, scores) in measures {
            all_nodes.extend(scores.keys());
        }

        let mut importance = NodeScores::new();
        for node in all_nodes {
            let mut score = 0.0;
            for (measure, weight) in &IMPORTANCE_WEIGHTS {
                if let Some((_, scores)) = measures.iter().find(|(m, _)| m == measure) {
                    score += scores.get(node).copied().unwrap_or(0.0) * weight;
                }
            }
            importance.insert(node.clone(), score);
        }
        importance
    }
}

/// Min-max normalization into [0,1]; a flat distribution maps to 0.5.
pub fn normalize_scores(scores: &NodeScores) -> NodeScores {
    if scores.is_empty() {
        return NodeScores::new();
    }
    let min = scores.values().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.values().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return scores.keys().map(|node| (node.clone(), 0.5)).collect();
    }
    scores
        .iter()
        .map(|(node, score)| (node.clone(), (score - min) / (max - min)))
        .collect()
}

/// Deduplicated adjacency view of the assembled graph: parallel edges
/// collapse, matching the simple-digraph semantics the measures assume.
struct Adjacency {
    out: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl Adjacency {
    fn of(graph: &DependencyGraph) -> Self {
        use petgraph::visit::EdgeRef;

        let n = graph.node_count();
        let mut out: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        let mut incoming: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        for edge in graph.edge_references() {
            let s = edge.source().index();
            let t = edge.target().index();
            out[s].insert(t);
            incoming[t].insert(s);
        }
        Self {
            out: out.into_iter().map(|set| set.into_iter().collect()).collect(),
            incoming: incoming
                .into_iter()
                .map(|set| set.into_iter().collect())
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.out.len()
    }

    fn simple_edge_count(&self) -> usize {
        self.out.iter().map(Vec::len).sum()
    }

    fn undirected(&self) -> Vec<Vec<usize>> {
        (0..self.len())
            .map(|v| {
                let mut set: BTreeSet<usize> = self.out[v].iter().copied().collect();
                set.extend(self.incoming[v].iter().copied());
                set.into_iter().collect()
            })
            .collect()
    }
}

fn node_ids(graph: &DependencyGraph) -> Vec<String> {
    graph.node_weights().map(|node| node.id.clone()).collect()
}

fn to_scores(ids: &[String], values: &[f64]) -> NodeScores {
    ids.iter()
        .cloned()
        .zip(values.iter().copied())
        .collect()
}

fn zero_scores(ids: &[String]) -> NodeScores {
    ids.iter().map(|id| (id.clone(), 0.0)).collect()
}
