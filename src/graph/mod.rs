//! Directed file-to-file dependency graph built from import records.
//!
//! Import specifiers are resolved against the known path set with a chain
//! of best-effort strategies; imports that resolve to nothing stay out of
//! the graph but are retained with a reason, so downstream stages can tell
//! "external package" apart from "excluded from analysis".

pub mod metrics;

pub use metrics::{compute_metrics, GraphMetrics};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::extract::{SymbolKind, SymbolRecord};

/// Why an import produced no edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedReason {
    /// No known path matched; the import points at external code.
    External,
    /// A known path matched but its content was never analyzed
    /// (filtered out upstream), so it cannot be a graph node.
    Filtered,
}

/// An import that did not become an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedImport {
    pub source_file: String,
    pub import_name: String,
    pub reason: UnresolvedReason,
}

/// Directed graph over the analyzed file set.
///
/// Every successfully extracted file is a node, even with zero imports.
/// Edges are deduplicated: importing the same module twice yields one edge.
/// No acyclicity is assumed anywhere.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: BTreeSet<String>,
    edges: BTreeMap<String, BTreeSet<String>>,
    unresolved: Vec<UnresolvedImport>,
}

impl DependencyGraph {
    /// All graph nodes (analyzed files).
    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|targets| targets.len()).sum()
    }

    /// Files this file imports (resolved targets only).
    pub fn imports_of(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(file)
    }

    /// Iterate over all (source, target) edges in deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().flat_map(|(source, targets)| {
            targets.iter().map(move |target| (source.as_str(), target.as_str()))
        })
    }

    /// Imports that produced no edge, with the reason.
    pub fn unresolved(&self) -> &[UnresolvedImport] {
        &self.unresolved
    }

    /// Count unresolved imports with the given reason.
    pub fn unresolved_count(&self, reason: UnresolvedReason) -> usize {
        self.unresolved.iter().filter(|u| u.reason == reason).count()
    }

    /// Find one dependency cycle, if any exists.
    ///
    /// Iterative depth-first search with a gray/black coloring; the returned
    /// vector lists the files on the cycle in order, first element repeated
    /// implicitly (a -> b -> a is returned as ["a", "b"]).
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;

        let mut color: BTreeMap<&str, u8> = self.nodes.iter().map(|n| (n.as_str(), WHITE)).collect();
        let empty = BTreeSet::new();

        for start in &self.nodes {
            if color[start.as_str()] != WHITE {
                continue;
            }
            // Stack holds (node, queued successors); path mirrors the gray chain.
            let mut stack: Vec<(&str, Vec<&str>)> = Vec::new();
            let mut path: Vec<&str> = Vec::new();

            let successors = |n: &str| -> Vec<&str> {
                self.edges
                    .get(n)
                    .unwrap_or(&empty)
                    .iter()
                    .map(|t| t.as_str())
                    .collect()
            };

            color.insert(start.as_str(), GRAY);
            stack.push((start.as_str(), successors(start)));
            path.push(start.as_str());

            while !stack.is_empty() {
                let next = stack.last_mut().and_then(|(_, pending)| pending.pop());
                match next {
                    Some(next) => match color.get(next).copied().unwrap_or(BLACK) {
                        WHITE => {
                            color.insert(next, GRAY);
                            path.push(next);
                            let succ = successors(next);
                            stack.push((next, succ));
                        }
                        GRAY => {
                            let pos = path.iter().position(|p| *p == next).unwrap_or(0);
                            return Some(path[pos..].iter().map(|s| s.to_string()).collect());
                        }
                        _ => {}
                    },
                    None => {
                        if let Some((node, _)) = stack.pop() {
                            color.insert(node, BLACK);
                            path.pop();
                        }
                    }
                }
            }
        }
        None
    }
}

/// Build the dependency graph from per-file symbol records.
///
/// `known_paths` is the full path set supplied upstream, including files
/// whose content was never fetched; resolution runs against it so that a
/// match outside the analyzed set can be classified as `Filtered` rather
/// than `External`. Self-imports are dropped entirely.
pub fn build_graph(
    records: &BTreeMap<String, Vec<SymbolRecord>>,
    known_paths: &BTreeSet<String>,
) -> DependencyGraph {
    let mut known: BTreeSet<String> = known_paths.clone();
    known.extend(records.keys().cloned());

    let index = PathIndex::build(&known);
    let nodes: BTreeSet<String> = records.keys().cloned().collect();

    let mut graph = DependencyGraph {
        nodes: nodes.clone(),
        edges: BTreeMap::new(),
        unresolved: Vec::new(),
    };

    for (source_file, file_records) in records {
        for record in file_records {
            if record.kind != SymbolKind::Import {
                continue;
            }
            match index.resolve(source_file, &record.name) {
                Some(target) if target == *source_file => {
                    // Self-import: dropped.
                }
                Some(target) => {
                    if nodes.contains(&target) {
                        graph
                            .edges
                            .entry(source_file.clone())
                            .or_default()
                            .insert(target);
                    } else {
                        graph.unresolved.push(UnresolvedImport {
                            source_file: source_file.clone(),
                            import_name: record.name.clone(),
                            reason: UnresolvedReason::Filtered,
                        });
                    }
                }
                None => {
                    graph.unresolved.push(UnresolvedImport {
                        source_file: source_file.clone(),
                        import_name: record.name.clone(),
                        reason: UnresolvedReason::External,
                    });
                }
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        unresolved = graph.unresolved.len(),
        "dependency graph built"
    );
    graph
}

/// Path lookup structure shared across all resolutions of one build.
///
/// Indexing the known paths by the final segment of their extension-stripped
/// form keeps each resolution proportional to the handful of same-named
/// candidates instead of the whole repository.
struct PathIndex<'a> {
    known: &'a BTreeSet<String>,
    by_tail: HashMap<&'a str, Vec<&'a str>>,
}

/// Conventional top-level directories tried for absolute-style specifiers.
const PACKAGE_ROOTS: &[&str] = &["src", "app", "lib", "packages"];

impl<'a> PathIndex<'a> {
    fn build(known: &'a BTreeSet<String>) -> Self {
        let mut by_tail: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for path in known {
            let stem = strip_extension(path);
            let tail = stem.rsplit('/').next().unwrap_or(stem);
            by_tail.entry(tail).or_default().push(path.as_str());
        }
        Self { known, by_tail }
    }

    /// Resolve an import specifier written in `source_file` to a known path.
    ///
    /// Strategy order: relative normalization for relative specifiers;
    /// otherwise suffix match, then package-root-relative match. First
    /// success wins.
    fn resolve(&self, source_file: &str, name: &str) -> Option<String> {
        if name.starts_with("./") || name.starts_with("../") {
            return self.resolve_relative_js(source_file, name);
        }
        if name.starts_with('.') {
            return self.resolve_relative_python(source_file, name);
        }
        self.resolve_suffix(name)
            .or_else(|| self.resolve_package_root(name))
    }

    fn resolve_relative_js(&self, source_file: &str, name: &str) -> Option<String> {
        let joined = normalize_joined(parent_dir(source_file), name)?;
        // The specifier may carry its extension already ('./styles.css').
        if self.known.contains(&joined) {
            return Some(joined);
        }
        self.lookup_stem(&joined)
            .or_else(|| self.lookup_stem(&format!("{joined}/index")))
    }

    fn resolve_relative_python(&self, source_file: &str, name: &str) -> Option<String> {
        let dots = name.chars().take_while(|c| *c == '.').count();
        let rest = &name[dots..];

        let mut base: Vec<&str> = parent_dir(source_file).split('/').filter(|s| !s.is_empty()).collect();
        // One dot is the current package; each extra dot pops one level.
        for _ in 1..dots {
            base.pop()?;
        }
        if !rest.is_empty() {
            base.extend(rest.split('.'));
        }
        let target = base.join("/");

        self.lookup_stem(&target)
            .or_else(|| self.lookup_stem(&format!("{target}/__init__")))
    }

    fn resolve_suffix(&self, name: &str) -> Option<String> {
        let mut forms: Vec<String> = vec![name.to_string()];
        if !name.contains('/') && name.contains('.') {
            // Dotted module path (python style): also try the slash-joined form.
            forms.push(name.replace('.', "/"));
        }
        for form in &forms {
            if let Some(hit) = self.lookup_suffix(form) {
                return Some(hit);
            }
        }
        None
    }

    fn resolve_package_root(&self, name: &str) -> Option<String> {
        for root in PACKAGE_ROOTS {
            let candidate = format!("{root}/{name}");
            if let Some(hit) = self
                .lookup_stem(&candidate)
                .or_else(|| self.lookup_stem(&format!("{candidate}/index")))
            {
                return Some(hit);
            }
        }
        None
    }

    /// Exact extension-ignoring match of a full repo-relative stem.
    fn lookup_stem(&self, stem_path: &str) -> Option<String> {
        let tail = stem_path.rsplit('/').next().unwrap_or(stem_path);
        let candidates = self.by_tail.get(tail)?;
        candidates
            .iter()
            .filter(|p| strip_extension(p) == stem_path)
            .min()
            .map(|p| p.to_string())
    }

    /// Suffix match ignoring extension: "utils/date" matches
    /// "src/utils/date.ts". Ambiguity resolves to the shallowest path,
    /// then lexically, for determinism.
    fn lookup_suffix(&self, form: &str) -> Option<String> {
        let tail = form.rsplit('/').next().unwrap_or(form);
        let candidates = self.by_tail.get(tail)?;
        candidates
            .iter()
            .filter(|p| {
                let stem = strip_extension(p);
                stem == form || stem.ends_with(&format!("/{form}"))
            })
            .min_by_key(|p| (p.matches('/').count(), p.to_string()))
            .map(|p| p.to_string())
    }
}

/// "src/utils/date.ts" -> "src/utils/date"; paths without an extension are
/// returned unchanged.
fn strip_extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &path[..path.len() - (name.len() - dot)],
        _ => path,
    }
}

/// Directory portion of a repo-relative path ("" for top-level files).
fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(slash) => &path[..slash],
        None => "",
    }
}

/// Join a directory and a relative specifier, normalizing "." and ".."
/// segments. Returns None when ".." escapes the repository root.
fn normalize_joined(dir: &str, rel: &str) -> Option<String> {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for seg in rel.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}
