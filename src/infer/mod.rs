//! Second-stage inference: architecture hypotheses and the implicit
//! assumptions behind them.

pub mod assumptions;
pub mod hypotheses;

pub use assumptions::{infer_assumptions, Assumption, Risk};
pub use hypotheses::{generate_hypotheses, ArchitectureHypothesis};

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{Archetype, LayerMap};
use crate::extract::SymbolRecord;
use crate::graph::{DependencyGraph, GraphMetrics};

/// Everything the prior stages produced, handed to detectors read-only.
pub struct InferenceInput<'a> {
    pub records: &'a BTreeMap<String, Vec<SymbolRecord>>,
    pub graph: &'a DependencyGraph,
    pub metrics: &'a GraphMetrics,
    pub archetype: Archetype,
    pub layers: &'a LayerMap,
    pub known_paths: &'a BTreeSet<String>,
}

impl<'a> InferenceInput<'a> {
    /// Count analyzed files labeled with the given layer.
    pub fn layer_count(&self, layer: &str) -> usize {
        self.layers.values().filter(|l| l.as_str() == layer).count()
    }

    /// Count analyzed files with a directory segment from the given set.
    pub fn dir_segment_count(&self, segments: &[&str]) -> usize {
        self.graph
            .nodes()
            .iter()
            .filter(|path| {
                let mut parts: Vec<&str> = path.split('/').collect();
                parts.pop();
                parts
                    .iter()
                    .any(|seg| segments.contains(&seg.to_ascii_lowercase().as_str()))
            })
            .count()
    }
}
