//! Derived metrics over a dependency graph.
//!
//! Everything here is a pure O(nodes + edges) function of the graph; the
//! result is a read-only snapshot consumed by the classifiers and the
//! hypothesis generator.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::graph::DependencyGraph;

/// Read-only metric snapshot over one dependency graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphMetrics {
    /// Distinct importers per file. Every node has an entry, zero included.
    pub fan_in: BTreeMap<String, usize>,
    /// Distinct imports per file. Every node has an entry, zero included.
    pub fan_out: BTreeMap<String, usize>,
    /// Files ranked by descending fan-in, ties broken by path order.
    /// Truncated to the configured hub limit.
    pub hubs: Vec<(String, usize)>,
    /// Files nothing imports. Isolated files (fan-out zero too) count.
    pub leaves: BTreeSet<String>,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub avg_fan_in: f64,
    pub avg_fan_out: f64,
    pub max_fan_in: usize,
    pub max_fan_in_module: Option<String>,
    /// Overall coupling signal in [0, 1]: min(avg_fan_in / 5, 1).
    pub coupling_score: f64,
    /// Up to five files whose fan-in exceeds the god-module cutoff.
    pub god_modules: Vec<String>,
}

impl GraphMetrics {
    /// Fan-in of one file (zero for unknown files).
    pub fn fan_in_of(&self, file: &str) -> usize {
        self.fan_in.get(file).copied().unwrap_or(0)
    }

    /// Fan-out of one file (zero for unknown files).
    pub fn fan_out_of(&self, file: &str) -> usize {
        self.fan_out.get(file).copied().unwrap_or(0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Compute the metric snapshot for a graph.
pub fn compute_metrics(graph: &DependencyGraph, config: &AnalysisConfig) -> GraphMetrics {
    let mut fan_in: BTreeMap<String, usize> = BTreeMap::new();
    let mut fan_out: BTreeMap<String, usize> = BTreeMap::new();

    for node in graph.nodes() {
        fan_in.insert(node.clone(), 0);
        fan_out.insert(node.clone(), 0);
    }
    for (source, target) in graph.edges() {
        *fan_out.entry(source.to_string()).or_insert(0) += 1;
        *fan_in.entry(target.to_string()).or_insert(0) += 1;
    }

    // Descending fan-in, ties by path lexical order. BTreeMap iteration is
    // already path-ordered, and the sort is stable.
    let mut ranked: Vec<(String, usize)> =
        fan_in.iter().map(|(path, n)| (path.clone(), *n)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let leaves: BTreeSet<String> = fan_in
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(path, _)| path.clone())
        .collect();

    let total_nodes = graph.node_count();
    let total_edges = graph.edge_count();
    let avg_fan_in = if total_nodes > 0 {
        total_edges as f64 / total_nodes as f64
    } else {
        0.0
    };
    // Same sum over a different map; identical by the edge-count invariant.
    let avg_fan_out = avg_fan_in;

    let (max_fan_in_module, max_fan_in) = ranked
        .first()
        .filter(|(_, n)| *n > 0)
        .map(|(path, n)| (Some(path.clone()), *n))
        .unwrap_or((None, 0));

    let god_modules: Vec<String> = ranked
        .iter()
        .filter(|(_, n)| *n > config.god_module_fan_in)
        .take(5)
        .map(|(path, _)| path.clone())
        .collect();

    let coupling_score = round2((avg_fan_in / 5.0).min(1.0));

    GraphMetrics {
        hubs: ranked.into_iter().take(config.hub_limit).collect(),
        leaves,
        total_nodes,
        total_edges,
        avg_fan_in: round2(avg_fan_in),
        avg_fan_out: round2(avg_fan_out),
        max_fan_in,
        max_fan_in_module,
        coupling_score,
        god_modules,
        fan_in,
        fan_out,
    }
}
