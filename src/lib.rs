//! Repolens - structural architecture inference for source repositories.
//!
//! Repolens takes an already-fetched snapshot of a repository (file paths
//! plus text contents) and infers its structure: which symbols each file
//! defines, how files depend on one another, what kind of project it is,
//! which architectural layer each file belongs to, and which architecture
//! patterns the evidence supports - as ranked hypotheses with evidence,
//! not a single brittle answer.
//!
//! # Architecture
//!
//! The pipeline runs strictly forward; each stage is a pure function of
//! the previous stages' complete output:
//!
//! - `extract`: tree-sitter symbol extraction behind an extension registry
//! - `graph`: dependency graph building and metrics
//! - `classify`: archetype classification and layer inference
//! - `infer`: architecture hypotheses and implicit assumptions
//! - `pipeline`: orchestration and the output bundle
//!
//! Network fetching, path filtering, persistence and prose generation are
//! the surrounding service's job; this crate is in-process and does no I/O.
//!
//! # Adding a New Language
//!
//! See `src/extract/languages/` for examples. Provide a tree-sitter query
//! configuration and register it in `languages/mod.rs`.

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod infer;
pub mod pipeline;

pub use classify::{classify_archetype, infer_layer, infer_layers, Archetype, ArchetypeReport};
pub use config::AnalysisConfig;
pub use error::PipelineError;
pub use extract::{
    extract_all, for_extension, ExtractionOutcome, Extractor, SymbolKind, SymbolRecord,
};
pub use graph::{
    build_graph, compute_metrics, DependencyGraph, GraphMetrics, UnresolvedImport, UnresolvedReason,
};
pub use infer::{
    generate_hypotheses, infer_assumptions, ArchitectureHypothesis, Assumption, Risk,
};
pub use pipeline::{analyze, AnalysisBundle, AnalysisInput};

/// Initialize all subsystems.
///
/// Registers the built-in language extractors. `analyze` calls this
/// itself; call it directly only when using the extraction layer alone.
pub fn init() {
    extract::init();
}
