//! Per-file architectural layer inference.
//!
//! A fixed, ordered rule table maps directory segments to layer labels
//! under a given archetype. First matching rule wins, so specific rules
//! sit above general ones and the priority order is inspectable data
//! rather than branching code.

use std::collections::BTreeMap;

use super::Archetype;

/// Layer label for files no rule matches.
pub const UNCLASSIFIED: &str = "unclassified";

/// File path -> layer label.
pub type LayerMap = BTreeMap<String, String>;

struct LayerRule {
    archetypes: &'static [Archetype],
    segments: &'static [&'static str],
    layer: &'static str,
}

const FRONTEND_ISH: &[Archetype] = &[Archetype::Frontend, Archetype::Fullstack];
const BACKEND_ISH: &[Archetype] = &[Archetype::Backend, Archetype::Fullstack];

/// Ordered layer rules. Frontend rules are consulted before backend rules
/// so a fullstack repo resolves shared names ("utils") consistently.
static LAYER_RULES: &[LayerRule] = &[
    LayerRule {
        archetypes: FRONTEND_ISH,
        segments: &["ui", "components"],
        layer: "ui",
    },
    LayerRule {
        archetypes: FRONTEND_ISH,
        segments: &["hooks"],
        layer: "hooks",
    },
    LayerRule {
        archetypes: FRONTEND_ISH,
        segments: &["pages", "views"],
        layer: "pages",
    },
    LayerRule {
        archetypes: BACKEND_ISH,
        segments: &["api", "routes"],
        layer: "api",
    },
    LayerRule {
        archetypes: BACKEND_ISH,
        segments: &["service", "services"],
        layer: "services",
    },
    LayerRule {
        archetypes: BACKEND_ISH,
        segments: &["model", "models", "schema", "schemas"],
        layer: "models",
    },
    LayerRule {
        archetypes: BACKEND_ISH,
        segments: &["db", "repository", "repositories"],
        layer: "db",
    },
    // General buckets last: both families funnel leftovers into "utils".
    LayerRule {
        archetypes: FRONTEND_ISH,
        segments: &["lib", "utils"],
        layer: "utils",
    },
    LayerRule {
        archetypes: BACKEND_ISH,
        segments: &["utils", "core"],
        layer: "utils",
    },
];

/// Label one file with its architectural layer.
///
/// Only directory segments are considered, so "models.py" at the top level
/// is not a models-layer file but "app/models/user.py" is. No match is
/// `unclassified`, never an error.
pub fn infer_layer(path: &str, archetype: Archetype) -> &'static str {
    if archetype == Archetype::Unknown {
        return UNCLASSIFIED;
    }

    let mut segments: Vec<String> = path.split('/').map(|s| s.to_ascii_lowercase()).collect();
    segments.pop(); // drop the file name

    for rule in LAYER_RULES {
        if !rule.archetypes.contains(&archetype) {
            continue;
        }
        if segments
            .iter()
            .any(|seg| rule.segments.contains(&seg.as_str()))
        {
            return rule.layer;
        }
    }
    UNCLASSIFIED
}

/// Label every file in the analyzed set.
pub fn infer_layers<'a, I>(files: I, archetype: Archetype) -> LayerMap
where
    I: IntoIterator<Item = &'a String>,
{
    files
        .into_iter()
        .map(|file| (file.clone(), infer_layer(file, archetype).to_string()))
        .collect()
}
