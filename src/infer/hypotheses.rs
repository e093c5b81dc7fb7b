//! Architecture hypothesis generation.
//!
//! Each detector is an independent rule: it either fires with a confidence
//! and evidence, or stays silent. Detectors never exclude each other; the
//! output is the union of everything that fired, sorted by descending
//! confidence with ties broken by statement order.
//!
//! Confidence is a relative strength signal scoped to one hypothesis, not
//! a calibrated probability. Every detector uses the same shape:
//! `confidence = base + (cap - base) * strength` with a per-detector base
//! and cap, and a saturating-ratio strength `min(signal / saturation, 1)`.

use serde::Serialize;

use crate::classify::Archetype;
use crate::config::AnalysisConfig;

use super::InferenceInput;

/// A ranked, evidenced statement about the repository's architecture.
#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureHypothesis {
    pub statement: String,
    /// Relative strength in [0, 1]; hypotheses are not a distribution.
    pub confidence: f64,
    pub evidence: Vec<String>,
}

type Detector = fn(&InferenceInput, &AnalysisConfig) -> Option<ArchitectureHypothesis>;

struct DetectorRule {
    name: &'static str,
    run: Detector,
}

/// The fixed detector table. Order here is registration order only; the
/// output ranking comes from confidence.
static DETECTORS: &[DetectorRule] = &[
    DetectorRule { name: "component_centric", run: detect_component_centric },
    DetectorRule { name: "layered_backend", run: detect_layered_backend },
    DetectorRule { name: "mvc", run: detect_mvc },
    DetectorRule { name: "hub_and_spoke", run: detect_hub_and_spoke },
    DetectorRule { name: "god_module", run: detect_god_module },
    DetectorRule { name: "circular_dependency", run: detect_circular_dependency },
    DetectorRule { name: "feature_sliced", run: detect_feature_sliced },
    DetectorRule { name: "atomic_design", run: detect_atomic_design },
    DetectorRule { name: "fullstack_split", run: detect_fullstack_split },
    DetectorRule { name: "monorepo", run: detect_monorepo },
    DetectorRule { name: "cqrs", run: detect_cqrs },
];

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn scaled_confidence(base: f64, cap: f64, strength: f64) -> f64 {
    round2(base + (cap - base) * strength.clamp(0.0, 1.0))
}

fn is_frontend_ish(archetype: Archetype) -> bool {
    matches!(archetype, Archetype::Frontend | Archetype::Fullstack)
}

fn is_backend_ish(archetype: Archetype) -> bool {
    matches!(archetype, Archetype::Backend | Archetype::Fullstack)
}

/// Run every detector and rank what fired.
pub fn generate_hypotheses(
    input: &InferenceInput,
    config: &AnalysisConfig,
) -> Vec<ArchitectureHypothesis> {
    let mut hypotheses: Vec<ArchitectureHypothesis> = DETECTORS
        .iter()
        .filter_map(|rule| {
            let hypothesis = (rule.run)(input, config);
            if let Some(h) = &hypothesis {
                tracing::debug!(detector = rule.name, confidence = h.confidence, "detector fired");
            }
            hypothesis
        })
        .collect();

    hypotheses.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.statement.cmp(&b.statement))
    });
    hypotheses
}

/// Fires when the ui layer holds at least `component_centric_min_ui` files.
/// strength = min(ui_files / (2 * min_ui), 1); base 0.5, cap 0.9.
fn detect_component_centric(
    input: &InferenceInput,
    config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    if !is_frontend_ish(input.archetype) {
        return None;
    }
    let ui_files = input.layer_count("ui");
    let min_ui = config.component_centric_min_ui;
    if ui_files < min_ui.max(1) {
        return None;
    }
    let strength = ui_files as f64 / (2 * min_ui.max(1)) as f64;
    let top_hubs: Vec<String> = input
        .metrics
        .hubs
        .iter()
        .take(3)
        .map(|(path, n)| format!("{path} (fan-in {n})"))
        .collect();
    Some(ArchitectureHypothesis {
        statement: "Component-centric frontend with a dominant UI composition layer".to_string(),
        confidence: scaled_confidence(0.5, 0.9, strength),
        evidence: vec![
            format!("{ui_files} files in the ui layer"),
            format!("most-imported files: {}", top_hubs.join(", ")),
        ],
    })
}

/// Fires when both the api and services layers are populated.
/// strength = min(min(api, services) / 10, 1); base 0.6, cap 0.9.
fn detect_layered_backend(
    input: &InferenceInput,
    _config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    if !is_backend_ish(input.archetype) {
        return None;
    }
    let api = input.layer_count("api");
    let services = input.layer_count("services");
    if api == 0 || services == 0 {
        return None;
    }
    let models = input.layer_count("models");
    let db = input.layer_count("db");
    let strength = api.min(services) as f64 / 10.0;
    Some(ArchitectureHypothesis {
        statement: "Layered backend service (API routes over a service layer)".to_string(),
        confidence: scaled_confidence(0.6, 0.9, strength),
        evidence: vec![
            format!("{api} api files, {services} service files"),
            format!("{models} model files, {db} data-access files"),
        ],
    })
}

/// Fires when controller-named and model-named directories both exist.
/// strength = min((controllers + models) / 20, 1); base 0.55, cap 0.85.
fn detect_mvc(input: &InferenceInput, _config: &AnalysisConfig) -> Option<ArchitectureHypothesis> {
    let controllers = input.dir_segment_count(&["controller", "controllers"]);
    let models = input
        .dir_segment_count(&["model", "models"])
        .max(input.layer_count("models"));
    if controllers == 0 || models == 0 {
        return None;
    }
    let strength = (controllers + models) as f64 / 20.0;
    Some(ArchitectureHypothesis {
        statement: "Model-View-Controller organization".to_string(),
        confidence: scaled_confidence(0.55, 0.85, strength),
        evidence: vec![
            format!("{controllers} files under controller directories"),
            format!("{models} files under model directories"),
        ],
    })
}

/// Fires when any file's fan-in exceeds `hub_fan_in_cutoff`.
/// strength = min(max_fan_in / (2 * cutoff), 1); base 0.6, cap 0.9.
fn detect_hub_and_spoke(
    input: &InferenceInput,
    config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    let cutoff = config.hub_fan_in_cutoff;
    let hubs: Vec<&(String, usize)> = input
        .metrics
        .hubs
        .iter()
        .filter(|(_, fan_in)| *fan_in > cutoff)
        .collect();
    if hubs.is_empty() {
        return None;
    }
    let strength = input.metrics.max_fan_in as f64 / (2 * cutoff.max(1)) as f64;
    let evidence: Vec<String> = std::iter::once(format!(
        "{} files with fan-in above {cutoff}",
        hubs.len()
    ))
    .chain(
        hubs.iter()
            .take(3)
            .map(|(path, n)| format!("{path} imported by {n} files")),
    )
    .collect();
    Some(ArchitectureHypothesis {
        statement: "Hub-and-spoke dependency structure centered on a few shared modules"
            .to_string(),
        confidence: scaled_confidence(0.6, 0.9, strength),
        evidence,
    })
}

/// Fires when files have both fan-in and fan-out above
/// `god_module_coupling`. strength = min(count / 3, 1); base 0.6, cap 0.85.
fn detect_god_module(
    input: &InferenceInput,
    config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    let cutoff = config.god_module_coupling;
    let offenders: Vec<&String> = input
        .graph
        .nodes()
        .iter()
        .filter(|file| {
            input.metrics.fan_in_of(file) > cutoff && input.metrics.fan_out_of(file) > cutoff
        })
        .collect();
    if offenders.is_empty() {
        return None;
    }
    let strength = offenders.len() as f64 / 3.0;
    let listed: Vec<String> = offenders.iter().take(3).map(|f| f.to_string()).collect();
    Some(ArchitectureHypothesis {
        statement: "God-module anti-pattern: files that are both heavily imported and heavily importing"
            .to_string(),
        confidence: scaled_confidence(0.6, 0.85, strength),
        evidence: vec![
            format!("{} files over the coupling cutoff {cutoff}", offenders.len()),
            format!("worst offenders: {}", listed.join(", ")),
        ],
    })
}

/// Fires when the graph contains an actual import cycle.
/// strength = min(cycle_len / 6, 1); base 0.6, cap 0.8.
fn detect_circular_dependency(
    input: &InferenceInput,
    _config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    let cycle = input.graph.find_cycle()?;
    let strength = cycle.len() as f64 / 6.0;
    let mut rendered = cycle.join(" -> ");
    rendered.push_str(" -> ");
    rendered.push_str(&cycle[0]);
    Some(ArchitectureHypothesis {
        statement: "Circular dependency anti-pattern in the import graph".to_string(),
        confidence: scaled_confidence(0.6, 0.8, strength),
        evidence: vec![format!("cycle: {rendered}")],
    })
}

/// Fires when feature directories exist.
/// strength = min(feature_files / 15, 1); base 0.5, cap 0.8.
fn detect_feature_sliced(
    input: &InferenceInput,
    _config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    let feature_files = input.dir_segment_count(&["feature", "features"]);
    if feature_files == 0 {
        return None;
    }
    let strength = feature_files as f64 / 15.0;
    Some(ArchitectureHypothesis {
        statement: "Feature-sliced organization with self-contained feature directories"
            .to_string(),
        confidence: scaled_confidence(0.5, 0.8, strength),
        evidence: vec![format!("{feature_files} files under feature directories")],
    })
}

/// Fires when at least three atomic-design levels appear as directories.
/// strength = (levels - 2) / 3; base 0.6, cap 0.85.
fn detect_atomic_design(
    input: &InferenceInput,
    _config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    if !is_frontend_ish(input.archetype) {
        return None;
    }
    let level_names = ["atoms", "molecules", "organisms", "templates", "pages"];
    let present: Vec<&str> = level_names
        .into_iter()
        .filter(|name| input.dir_segment_count(&[*name]) > 0)
        .collect();
    if present.len() < 3 {
        return None;
    }
    let strength = (present.len() as f64 - 2.0) / 3.0;
    Some(ArchitectureHypothesis {
        statement: "Atomic-design component hierarchy".to_string(),
        confidence: scaled_confidence(0.6, 0.85, strength),
        evidence: vec![format!("levels present: {}", present.join(", "))],
    })
}

/// Fires on fullstack repos with both layer families populated.
/// strength = min(min(frontend, backend) / 10, 1); base 0.6, cap 0.9.
fn detect_fullstack_split(
    input: &InferenceInput,
    _config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    if input.archetype != Archetype::Fullstack {
        return None;
    }
    let frontend: usize = ["ui", "hooks", "pages"]
        .iter()
        .map(|l| input.layer_count(l))
        .sum();
    let backend: usize = ["api", "services", "models", "db"]
        .iter()
        .map(|l| input.layer_count(l))
        .sum();
    if frontend == 0 || backend == 0 {
        return None;
    }
    let strength = frontend.min(backend) as f64 / 10.0;
    Some(ArchitectureHypothesis {
        statement: "Fullstack system with separated frontend and backend code".to_string(),
        confidence: scaled_confidence(0.6, 0.9, strength),
        evidence: vec![
            format!("{frontend} files in frontend layers"),
            format!("{backend} files in backend layers"),
        ],
    })
}

/// Fires on workspace marker files or multiple packages/ children.
/// strength = 1 for a marker file, else min(children / 4, 1);
/// base 0.6, cap 0.9.
fn detect_monorepo(
    input: &InferenceInput,
    _config: &AnalysisConfig,
) -> Option<ArchitectureHypothesis> {
    let markers = ["lerna.json", "nx.json", "pnpm-workspace.yaml"];
    let marker = input.known_paths.iter().find(|path| {
        let name = path.rsplit('/').next().unwrap_or(path);
        markers.contains(&name)
    });

    let mut package_children: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
    for path in input.known_paths {
        let parts: Vec<&str> = path.split('/').collect();
        for window in parts.windows(2) {
            if window[0] == "packages" || window[0] == "apps" {
                package_children.insert(window[1]);
            }
        }
    }

    if marker.is_none() && package_children.len() < 2 {
        return None;
    }
    let strength = if marker.is_some() {
        1.0
    } else {
        package_children.len() as f64 / 4.0
    };
    let mut evidence = Vec::new();
    if let Some(path) = marker {
        evidence.push(format!("workspace marker: {path}"));
    }
    if !package_children.is_empty() {
        evidence.push(format!(
            "{} workspace members under packages/ or apps/",
            package_children.len()
        ));
    }
    Some(ArchitectureHypothesis {
        statement: "Monorepo workspace with multiple packages".to_string(),
        confidence: scaled_confidence(0.6, 0.9, strength),
        evidence,
    })
}

/// Fires when command and query directories coexist on a backend-ish repo.
/// strength = min((commands + queries) / 10, 1); base 0.5, cap 0.8.
fn detect_cqrs(input: &InferenceInput, _config: &AnalysisConfig) -> Option<ArchitectureHypothesis> {
    if !is_backend_ish(input.archetype) {
        return None;
    }
    let commands = input.dir_segment_count(&["command", "commands"]);
    let queries = input.dir_segment_count(&["query", "queries"]);
    if commands == 0 || queries == 0 {
        return None;
    }
    let strength = (commands + queries) as f64 / 10.0;
    Some(ArchitectureHypothesis {
        statement: "Command/query separation (CQRS-style) in the backend".to_string(),
        confidence: scaled_confidence(0.5, 0.8, strength),
        evidence: vec![
            format!("{commands} files under command directories"),
            format!("{queries} files under query directories"),
        ],
    })
}
