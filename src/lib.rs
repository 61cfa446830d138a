//! # CODEFLOW
//!
//! Dependency-graph construction for checked-out source trees.
//!
//! CODEFLOW discovers source files, extracts per-file structural facts
//! (functions, classes, imports) with language-specific parsers, resolves
//! import strings to concrete in-repository files, assembles a directed
//! file-to-file dependency graph and scores every file with a composite
//! structural importance metric.
//!
//! ## Supported Languages
//!
//! Python (syntax-tree backed), JavaScript and TypeScript (line-oriented
//! heuristic scanners). Additional languages plug in through the
//! [`parsers::ParserRegistry`].
//!
//! ## Output
//!
//! A single serializable [`core::CodeGraph`] snapshot per analysis:
//! nodes, edges, graph-level metrics and five per-node centrality measures.

pub mod config;
pub mod core;
pub mod parsers;
