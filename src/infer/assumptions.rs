//! Implicit assumption inference.
//!
//! The hypotheses rest on premises nobody stated: that the fetched sample
//! is representative, that unresolved imports mean external code, that hub
//! modules are stable. This stage makes those premises explicit, each with
//! the impact if it turns out false. It is a fixed rule table over the
//! hypothesis text and the graph shape; it parses and fetches nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::extract::SymbolKind;
use crate::graph::UnresolvedReason;

use super::{ArchitectureHypothesis, InferenceInput};

/// How much is at stake if the assumption is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    High,
    Critical,
}

/// An implicit, possibly-unverified premise the hypotheses rely on.
#[derive(Debug, Clone, Serialize)]
pub struct Assumption {
    pub statement: String,
    pub impact: String,
    pub risk: Risk,
}

/// Paths that indicate an automated test suite.
static TEST_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|/)(tests?|__tests__|spec)(/|$)|\.(test|spec)\.|_test\.").unwrap()
});

fn hypothesis_fired(hypotheses: &[ArchitectureHypothesis], needle: &str) -> bool {
    hypotheses.iter().any(|h| h.statement.contains(needle))
}

/// Derive the assumption list for one analysis run.
///
/// Rules run in a fixed order, so the output sequence is deterministic for
/// identical input.
pub fn infer_assumptions(
    input: &InferenceInput,
    hypotheses: &[ArchitectureHypothesis],
    config: &AnalysisConfig,
) -> Vec<Assumption> {
    let mut assumptions = Vec::new();

    // 1. Everything downstream treats the fetched set as the repository.
    if input.graph.node_count() > 0 {
        assumptions.push(Assumption {
            statement: "The analyzed files are a complete and representative sample of the repository".to_string(),
            impact: "Layer counts, hub rankings and every hypothesis understate the system if significant files were never fetched".to_string(),
            risk: Risk::Medium,
        });
    }

    // 2. Unresolved imports are read as external packages.
    let external = input.graph.unresolved_count(UnresolvedReason::External);
    if external > 0 {
        let total_imports = input
            .records
            .values()
            .flatten()
            .filter(|r| r.kind == SymbolKind::Import)
            .count();
        let ratio = external as f64 / total_imports.max(1) as f64;
        let risk = if ratio > config.external_high_ratio {
            Risk::High
        } else {
            Risk::Medium
        };
        assumptions.push(Assumption {
            statement: format!(
                "The {external} unresolved imports point at external packages, not missing internal structure"
            ),
            impact: "If some are actually internal files the dependency graph is missing edges and the coupling picture is too optimistic".to_string(),
            risk,
        });
    }

    // 3. Imports into filtered-out files are a known blind spot.
    let filtered = input.graph.unresolved_count(UnresolvedReason::Filtered);
    if filtered > 0 {
        assumptions.push(Assumption {
            statement: format!(
                "The {filtered} imports into unfetched files do not hide load-bearing structure"
            ),
            impact: "Fan-in of the excluded files is invisible, so hub and leaf sets may be wrong around them".to_string(),
            risk: Risk::Medium,
        });
    }

    // 4. A frontend-only repo implies a backend somewhere else.
    if input.archetype == crate::classify::Archetype::Frontend {
        assumptions.push(Assumption {
            statement: "Backend logic lives outside this repository".to_string(),
            impact: "The frontend is coupled to external API contracts this analysis cannot see or verify".to_string(),
            risk: Risk::High,
        });
    }

    // 5. Hub-and-spoke reading assumes the hubs are stable.
    if hypothesis_fired(hypotheses, "Hub-and-spoke") {
        assumptions.push(Assumption {
            statement: "Highly imported hub modules are stable interfaces".to_string(),
            impact: "A change to any hub fans out to most of the codebase; the pattern is only benign while hubs rarely change".to_string(),
            risk: Risk::High,
        });
    }

    // 6. Cycles were tolerated on purpose, or so the reading assumes.
    if hypothesis_fired(hypotheses, "Circular dependency") {
        assumptions.push(Assumption {
            statement: "The detected import cycle is intentional or benign".to_string(),
            impact: "If not, the entangled files cannot be tested or extracted in isolation and refactoring cost is higher than the layer picture suggests".to_string(),
            risk: Risk::Medium,
        });
    }

    // 7. Test presence, judged from paths alone.
    let has_tests = input
        .known_paths
        .iter()
        .any(|path| TEST_PATH_RE.is_match(path));
    if input.graph.node_count() > 0 {
        if has_tests {
            assumptions.push(Assumption {
                statement: "The test files present exercise the analyzed code".to_string(),
                impact: "Path evidence alone cannot tell live tests from abandoned ones; coverage may be far lower than the file count implies".to_string(),
                risk: Risk::Low,
            });
        } else {
            assumptions.push(Assumption {
                statement: "The repository has no automated test suite".to_string(),
                impact: "Nothing guards the inferred structure against regressions; every refactoring suggestion derived from it is riskier".to_string(),
                risk: Risk::Critical,
            });
        }
    }

    assumptions
}
