use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

mod config;
mod core;
mod parsers;

use crate::config::AnalysisConfig;
use crate::core::CodebaseAnalyzer;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "codeflow",
    version = "0.1.0",
    author = "codeflow developers",
    about = "Codebase dependency graph and structural importance analysis"
)]
struct Cli {
    /// Repository root to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE", default_value = "codegraph.json")]
    output: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the top N nodes by composite importance (0 disables)
    #[arg(long, value_name = "N", default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let config = AnalysisConfig::from_env();

    println!("CODEFLOW - Dependency graph analysis");
    println!("Input: {}", cli.input.display());
    println!("Output: {}", cli.output.display());

    let analyzer = CodebaseAnalyzer::new(&config)?;
    let graph = analyzer.analyze(&cli.input)?;

    // Node/edge caps are a caller-side guard; the engine never truncates.
    if graph.nodes.len() > config.max_nodes {
        anyhow::bail!(
            "graph exceeds node cap: {} > {}",
            graph.nodes.len(),
            config.max_nodes
        );
    }
    if graph.edges.len() > config.max_edges {
        anyhow::bail!(
            "graph exceeds edge cap: {} > {}",
            graph.edges.len(),
            config.max_edges
        );
    }

    let writer = BufWriter::new(File::create(&cli.output)?);
    if cli.pretty {
        serde_json::to_writer_pretty(writer, &graph)?;
    } else {
        serde_json::to_writer(writer, &graph)?;
    }

    println!(
        "Nodes: {}, Edges: {}, density {:.4}",
        graph.nodes.len(),
        graph.edges.len(),
        graph.metrics.density
    );
    if cli.top > 0 {
        println!("Top nodes by importance:");
        for ranked in graph.metrics.centrality.top_nodes("importance", cli.top) {
            println!("  #{:<3} {:.4}  {}", ranked.rank, ranked.score, ranked.node_id);
        }
    }
    println!(
        "Analysis complete in {:.2}s. Wrote {}",
        start.elapsed().as_secs_f64(),
        cli.output.display()
    );

    Ok(())
}
