//! Archetype classification from import signatures.
//!
//! Import names (as written, not resolved targets) are reduced to a package
//! root and tested against two fixed signature sets. The unit of counting
//! is distinct files: a file counts once no matter how many matching
//! imports it contains, so one import-heavy file cannot tip a mixed repo.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extract::{SymbolKind, SymbolRecord};

/// Coarse project classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Frontend,
    Backend,
    Fullstack,
    Unknown,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Frontend => "frontend",
            Archetype::Backend => "backend",
            Archetype::Fullstack => "fullstack",
            Archetype::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification result with the evidence that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeReport {
    pub archetype: Archetype,
    /// Distinct files with at least one frontend-signature import.
    pub frontend_files: usize,
    /// Distinct files with at least one backend-signature import.
    pub backend_files: usize,
    pub evidence: Vec<String>,
}

/// UI-framework import roots.
static FRONTEND_SIGNATURES: phf::Set<&'static str> = phf::phf_set! {
    "react",
    "react-dom",
    "react-native",
    "react-router",
    "react-router-dom",
    "@angular/core",
    "@angular/common",
    "vue",
    "vue-router",
    "svelte",
    "preact",
    "solid-js",
    "next",
    "nuxt",
    "gatsby",
    "@remix-run/react",
};

/// Server-framework import roots.
static BACKEND_SIGNATURES: phf::Set<&'static str> = phf::phf_set! {
    "express",
    "fastify",
    "koa",
    "restify",
    "hapi",
    "@hapi/hapi",
    "@nestjs/common",
    "@nestjs/core",
    "django",
    "flask",
    "fastapi",
    "starlette",
    "sanic",
    "tornado",
    "aiohttp",
    "bottle",
    "pyramid",
    "falcon",
};

/// How many evidence lines the report keeps per signature side.
const EVIDENCE_LIMIT: usize = 6;

/// Reduce an import specifier to its package root.
///
/// Relative specifiers never name a package. Scoped npm packages keep two
/// segments ("@nestjs/common"); other path imports keep the first segment
/// ("next/router" -> "next"); dotted Python modules keep the first dotted
/// part ("django.db" -> "django").
fn package_root(name: &str) -> Option<String> {
    if name.starts_with('.') || name.is_empty() {
        return None;
    }
    if let Some(rest) = name.strip_prefix('@') {
        let mut parts = rest.split('/');
        let scope = parts.next()?;
        let package = parts.next()?;
        return Some(format!("@{scope}/{package}").to_ascii_lowercase());
    }
    if name.contains('/') {
        return name.split('/').next().map(|s| s.to_ascii_lowercase());
    }
    name.split('.').next().map(|s| s.to_ascii_lowercase())
}

/// Classify the repository archetype from the full symbol-record mapping.
///
/// Decision rule: both signature sets seen in at least one file each ->
/// fullstack; exactly one side seen -> that side; neither -> unknown.
/// Pure function of its input; repeated runs give identical output.
pub fn classify_archetype(records: &BTreeMap<String, Vec<SymbolRecord>>) -> ArchetypeReport {
    let mut frontend_files = 0usize;
    let mut backend_files = 0usize;
    let mut evidence: Vec<String> = Vec::new();

    for (file, file_records) in records {
        let mut frontend_hit: Option<&str> = None;
        let mut backend_hit: Option<&str> = None;

        for record in file_records {
            if record.kind != SymbolKind::Import {
                continue;
            }
            let Some(root) = package_root(&record.name) else {
                continue;
            };
            if frontend_hit.is_none() && FRONTEND_SIGNATURES.contains(root.as_str()) {
                frontend_hit = Some(&record.name);
            }
            if backend_hit.is_none() && BACKEND_SIGNATURES.contains(root.as_str()) {
                backend_hit = Some(&record.name);
            }
        }

        if let Some(name) = frontend_hit {
            frontend_files += 1;
            if evidence.len() < EVIDENCE_LIMIT * 2 {
                evidence.push(format!("{file} imports {name} (frontend signature)"));
            }
        }
        if let Some(name) = backend_hit {
            backend_files += 1;
            if evidence.len() < EVIDENCE_LIMIT * 2 {
                evidence.push(format!("{file} imports {name} (backend signature)"));
            }
        }
    }

    let archetype = match (frontend_files > 0, backend_files > 0) {
        (true, true) => Archetype::Fullstack,
        (true, false) => Archetype::Frontend,
        (false, true) => Archetype::Backend,
        (false, false) => Archetype::Unknown,
    };

    ArchetypeReport {
        archetype,
        frontend_files,
        backend_files,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(file: &str, name: &str, language: &str) -> SymbolRecord {
        SymbolRecord {
            file: file.to_string(),
            kind: SymbolKind::Import,
            name: name.to_string(),
            line: Some(1),
            language: language.to_string(),
        }
    }

    fn records_of(entries: &[(&str, Vec<SymbolRecord>)]) -> BTreeMap<String, Vec<SymbolRecord>> {
        entries
            .iter()
            .map(|(path, recs)| (path.to_string(), recs.clone()))
            .collect()
    }

    #[test]
    fn test_package_root() {
        assert_eq!(package_root("react").as_deref(), Some("react"));
        assert_eq!(package_root("next/router").as_deref(), Some("next"));
        assert_eq!(package_root("@nestjs/common/pipes").as_deref(), Some("@nestjs/common"));
        assert_eq!(package_root("django.db.models").as_deref(), Some("django"));
        assert_eq!(package_root("./local"), None);
        assert_eq!(package_root(".relative"), None);
    }

    #[test]
    fn test_frontend_only() {
        // Ten files importing a UI framework, none importing a server one.
        let entries: Vec<(String, Vec<SymbolRecord>)> = (0..10)
            .map(|i| {
                let file = format!("src/components/C{i}.tsx");
                let rec = import(&file, "react", "typescript");
                (file, vec![rec])
            })
            .collect();
        let records: BTreeMap<String, Vec<SymbolRecord>> =
            entries.into_iter().collect();

        let report = classify_archetype(&records);
        assert_eq!(report.archetype, Archetype::Frontend);
        assert_eq!(report.frontend_files, 10);
        assert_eq!(report.backend_files, 0);
        assert!(!report.evidence.is_empty());
    }

    #[test]
    fn test_backend_only() {
        let records = records_of(&[
            (
                "app/main.py",
                vec![import("app/main.py", "fastapi", "python")],
            ),
            (
                "app/api/routes.py",
                vec![import("app/api/routes.py", "fastapi.routing", "python")],
            ),
        ]);

        let report = classify_archetype(&records);
        assert_eq!(report.archetype, Archetype::Backend);
        assert_eq!(report.backend_files, 2);
    }

    #[test]
    fn test_fullstack() {
        let records = records_of(&[
            (
                "client/App.tsx",
                vec![import("client/App.tsx", "react", "typescript")],
            ),
            (
                "server/index.js",
                vec![import("server/index.js", "express", "typescript")],
            ),
        ]);

        let report = classify_archetype(&records);
        assert_eq!(report.archetype, Archetype::Fullstack);
    }

    #[test]
    fn test_unknown_when_no_signatures() {
        let records = records_of(&[(
            "tool/run.py",
            vec![import("tool/run.py", "os", "python")],
        )]);
        let report = classify_archetype(&records);
        assert_eq!(report.archetype, Archetype::Unknown);
    }

    #[test]
    fn test_distinct_file_counting() {
        // One file with many react imports still counts as one file.
        let records = records_of(&[(
            "src/App.tsx",
            vec![
                import("src/App.tsx", "react", "typescript"),
                import("src/App.tsx", "react-dom", "typescript"),
                import("src/App.tsx", "react-router-dom", "typescript"),
            ],
        )]);
        let report = classify_archetype(&records);
        assert_eq!(report.frontend_files, 1);
    }

    #[test]
    fn test_determinism() {
        let records = records_of(&[
            (
                "client/App.tsx",
                vec![import("client/App.tsx", "react", "typescript")],
            ),
            (
                "server/index.js",
                vec![import("server/index.js", "express", "typescript")],
            ),
        ]);
        let first = classify_archetype(&records);
        let second = classify_archetype(&records);
        assert_eq!(first.archetype, second.archetype);
        assert_eq!(first.evidence, second.evidence);
    }
}
