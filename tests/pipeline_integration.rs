//! End-to-end pipeline tests over small synthetic repositories.

use std::collections::BTreeMap;

use repolens::{analyze, AnalysisConfig, AnalysisInput, Archetype, UnresolvedReason};

fn input_from(entries: &[(&str, &str)]) -> AnalysisInput {
    let files: BTreeMap<String, String> = entries
        .iter()
        .map(|(path, content)| (path.to_string(), content.to_string()))
        .collect();
    AnalysisInput::from_files(files)
}

/// A small React frontend: ten components importing react, a hub utility,
/// and one page wiring them together.
fn frontend_repo() -> AnalysisInput {
    let mut entries: Vec<(String, String)> = (0..10)
        .map(|i| {
            (
                format!("src/components/Widget{i}.tsx"),
                format!(
                    "import React from 'react';\nimport {{ fmt }} from '../lib/format';\n\nconst Widget{i} = () => <div>{{fmt({i})}}</div>;\n\nexport default Widget{i};\n"
                ),
            )
        })
        .collect();
    entries.push((
        "src/lib/format.ts".to_string(),
        "export function fmt(n: number): string {\n    return String(n);\n}\n".to_string(),
    ));
    entries.push((
        "src/pages/Home.tsx".to_string(),
        "import React from 'react';\nimport Widget0 from '../components/Widget0';\n\nconst Home = () => <Widget0 />;\n\nexport default Home;\n".to_string(),
    ));
    let refs: Vec<(&str, &str)> = entries
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    input_from(&refs)
}

fn backend_repo() -> AnalysisInput {
    input_from(&[
        (
            "app/main.py",
            "from fastapi import FastAPI\nfrom app.api.routes import router\n\napp = FastAPI()\n",
        ),
        (
            "app/api/routes.py",
            "from fastapi import APIRouter\nfrom app.services.users import list_users\n\nrouter = APIRouter()\n\ndef get_users():\n    return list_users()\n",
        ),
        (
            "app/services/users.py",
            "from app.models.user import User\n\ndef list_users():\n    return [User()]\n",
        ),
        (
            "app/models/user.py",
            "class User:\n    def name(self):\n        return 'x'\n",
        ),
    ])
}

#[test]
fn test_frontend_repo_end_to_end() {
    let bundle = analyze(&frontend_repo(), &AnalysisConfig::default()).unwrap();

    // Ten files import a UI framework, none a server framework.
    assert_eq!(bundle.archetype.archetype, Archetype::Frontend);
    assert!(bundle.failures.is_empty());

    // The shared formatter is the hub: every widget resolves to it.
    assert_eq!(bundle.metrics.fan_in["src/lib/format.ts"], 10);
    assert_eq!(
        bundle.metrics.max_fan_in_module.as_deref(),
        Some("src/lib/format.ts")
    );

    // 'react' never resolves to a file; it stays as an external unresolved.
    assert!(bundle.graph.unresolved_count(UnresolvedReason::External) >= 10);

    // Layers: components -> ui, pages -> pages, lib -> utils.
    assert_eq!(bundle.layers["src/components/Widget3.tsx"], "ui");
    assert_eq!(bundle.layers["src/pages/Home.tsx"], "pages");
    assert_eq!(bundle.layers["src/lib/format.ts"], "utils");

    // The external-backend assumption fires for frontend-only repos.
    assert!(bundle
        .assumptions
        .iter()
        .any(|a| a.statement.contains("Backend logic lives outside")));
}

#[test]
fn test_backend_repo_end_to_end() {
    let bundle = analyze(&backend_repo(), &AnalysisConfig::default()).unwrap();

    assert_eq!(bundle.archetype.archetype, Archetype::Backend);

    // The layered chain resolves: main -> routes -> services -> models.
    assert!(bundle.graph.imports_of("app/main.py").unwrap().contains("app/api/routes.py"));
    assert!(bundle
        .graph
        .imports_of("app/api/routes.py")
        .unwrap()
        .contains("app/services/users.py"));
    assert!(bundle
        .graph
        .imports_of("app/services/users.py")
        .unwrap()
        .contains("app/models/user.py"));

    assert_eq!(bundle.layers["app/api/routes.py"], "api");
    assert_eq!(bundle.layers["app/services/users.py"], "services");
    assert_eq!(bundle.layers["app/models/user.py"], "models");

    // api + services populated -> the layered-backend detector fires.
    assert!(bundle
        .hypotheses
        .iter()
        .any(|h| h.statement.contains("Layered backend")));
}

#[test]
fn test_fullstack_classification() {
    let input = input_from(&[
        (
            "client/src/components/App.tsx",
            "import React from 'react';\nconst App = () => <div />;\nexport default App;\n",
        ),
        (
            "server/app/api/routes.py",
            "from fastapi import APIRouter\n\ndef health():\n    return 'ok'\n",
        ),
    ]);
    let bundle = analyze(&input, &AnalysisConfig::default()).unwrap();
    assert_eq!(bundle.archetype.archetype, Archetype::Fullstack);
}

#[test]
fn test_edge_dedup_round_trip() {
    // Importing the same module twice produces one edge, and the target's
    // fan-in counts the importer exactly once.
    let input = input_from(&[
        (
            "src/a.ts",
            "import { x } from './b';\nimport { y } from './b';\nexport const use = () => x + y;\n",
        ),
        ("src/b.ts", "export const x = 1;\nexport const y = 2;\n"),
    ]);
    let bundle = analyze(&input, &AnalysisConfig::default()).unwrap();

    assert_eq!(bundle.graph.edge_count(), 1);
    assert_eq!(bundle.metrics.fan_in["src/b.ts"], 1);
    assert_eq!(bundle.metrics.fan_out["src/a.ts"], 1);
    // Both raw import records are retained for other consumers.
    let raw_imports = bundle.records["src/a.ts"]
        .iter()
        .filter(|r| r.kind == repolens::SymbolKind::Import)
        .count();
    assert_eq!(raw_imports, 2);
}

#[test]
fn test_fan_sum_invariant_holds_end_to_end() {
    let bundle = analyze(&backend_repo(), &AnalysisConfig::default()).unwrap();
    let fan_in_sum: usize = bundle.metrics.fan_in.values().sum();
    let fan_out_sum: usize = bundle.metrics.fan_out.values().sum();
    assert_eq!(fan_in_sum, bundle.graph.edge_count());
    assert_eq!(fan_out_sum, bundle.graph.edge_count());
}

#[test]
fn test_known_paths_distinguish_filtered_from_external() {
    let files: BTreeMap<String, String> = [(
        "src/App.tsx".to_string(),
        "import React from 'react';\nimport './theme.css';\nconst App = () => <div />;\nexport default App;\n"
            .to_string(),
    )]
    .into_iter()
    .collect();
    let mut input = AnalysisInput::from_files(files);
    // The stylesheet was listed by the tree fetch but filtered from content
    // fetching; the import should classify as Filtered, not External.
    input.known_paths.insert("src/theme.css".to_string());

    let bundle = analyze(&input, &AnalysisConfig::default()).unwrap();
    assert_eq!(bundle.graph.unresolved_count(UnresolvedReason::Filtered), 1);
    assert_eq!(bundle.graph.unresolved_count(UnresolvedReason::External), 1);
}

#[test]
fn test_bundle_serializes_to_json() {
    let bundle = analyze(&backend_repo(), &AnalysisConfig::default()).unwrap();
    let json = bundle.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["records"].is_object());
    assert!(value["metrics"]["fan_in"].is_object());
    assert_eq!(value["archetype"]["archetype"], "backend");
    assert!(value["hypotheses"].is_array());
    assert!(value["assumptions"].is_array());
}

#[test]
fn test_repeated_runs_are_identical() {
    let input = backend_repo();
    let config = AnalysisConfig::default();
    let first = analyze(&input, &config).unwrap();
    let second = analyze(&input, &config).unwrap();
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}
