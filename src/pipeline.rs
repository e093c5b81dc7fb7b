//! Pipeline orchestration.
//!
//! One request-scoped computation: symbol extraction feeds graph building,
//! the graph feeds metrics, records and metrics feed the classifiers, and
//! everything feeds hypothesis and assumption inference. Every stage is a
//! pure function of the previous stages' complete output; nothing is
//! mutated in place and nothing is shared across runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::classify::{classify_archetype, infer_layers, ArchetypeReport, LayerMap};
use crate::config::AnalysisConfig;
use crate::error::PipelineError;
use crate::extract::{extract_all, ExtractionOutcome};
use crate::graph::{build_graph, compute_metrics, DependencyGraph, GraphMetrics};
use crate::infer::{
    generate_hypotheses, infer_assumptions, ArchitectureHypothesis, Assumption, InferenceInput,
};

/// What the upstream ingestion collaborator hands over: fetched file
/// contents plus the full path listing, which may be larger than the
/// fetched set (filtered and binary files are known but never fetched).
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub files: BTreeMap<String, String>,
    pub known_paths: BTreeSet<String>,
}

impl AnalysisInput {
    /// Build an input where the known path set is exactly the fetched set.
    pub fn from_files(files: BTreeMap<String, String>) -> Self {
        let known_paths = files.keys().cloned().collect();
        Self { files, known_paths }
    }
}

/// The read-only structured snapshot handed to downstream consumers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisBundle {
    pub records: BTreeMap<String, Vec<crate::extract::SymbolRecord>>,
    pub failures: BTreeMap<String, String>,
    pub graph: DependencyGraph,
    pub metrics: GraphMetrics,
    pub archetype: ArchetypeReport,
    pub layers: LayerMap,
    pub hypotheses: Vec<ArchitectureHypothesis>,
    pub assumptions: Vec<Assumption>,
}

impl AnalysisBundle {
    /// Serialize the bundle for transport to a downstream consumer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Run the full inference pipeline over one ingested snapshot.
///
/// The only fatal condition is an upstream that supplied no file contents
/// at all. Anything else degrades: broken files land in the failure map,
/// an all-unsupported snapshot yields an empty but well-formed bundle with
/// an unknown archetype and no hypotheses.
pub fn analyze(
    input: &AnalysisInput,
    config: &AnalysisConfig,
) -> Result<AnalysisBundle, PipelineError> {
    if input.files.is_empty() {
        return Err(PipelineError::NoFiles);
    }

    crate::extract::init();

    let ExtractionOutcome { records, failures } = extract_all(&input.files);

    let mut known_paths = input.known_paths.clone();
    known_paths.extend(input.files.keys().cloned());

    let graph = build_graph(&records, &known_paths);
    let metrics = compute_metrics(&graph, config);
    let archetype = classify_archetype(&records);
    let layers = infer_layers(graph.nodes().iter(), archetype.archetype);

    let inference = InferenceInput {
        records: &records,
        graph: &graph,
        metrics: &metrics,
        archetype: archetype.archetype,
        layers: &layers,
        known_paths: &known_paths,
    };
    let hypotheses = generate_hypotheses(&inference, config);
    let assumptions = infer_assumptions(&inference, &hypotheses, config);

    debug!(
        files = input.files.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        archetype = %archetype.archetype,
        hypotheses = hypotheses.len(),
        "analysis finished"
    );

    Ok(AnalysisBundle {
        records,
        failures,
        graph,
        metrics,
        archetype,
        layers,
        hypotheses,
        assumptions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_files_is_the_only_user_visible_failure() {
        let input = AnalysisInput::default();
        let err = analyze(&input, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoFiles));
    }

    #[test]
    fn test_unsupported_only_snapshot_degrades_gracefully() {
        let mut files = BTreeMap::new();
        files.insert("README.md".to_string(), "# hello".to_string());
        files.insert("config.toml".to_string(), "[a]\nb = 1".to_string());
        let input = AnalysisInput::from_files(files);

        let bundle = analyze(&input, &AnalysisConfig::default()).unwrap();
        assert!(bundle.records.is_empty());
        assert!(bundle.failures.is_empty());
        assert_eq!(bundle.graph.node_count(), 0);
        assert_eq!(bundle.archetype.archetype, crate::classify::Archetype::Unknown);
        assert!(bundle.hypotheses.is_empty());
        assert!(bundle.assumptions.is_empty());
    }
}
