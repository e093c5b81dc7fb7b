//! TypeScript/JavaScript language configuration for tree-sitter extraction.
//!
//! One query serves all four surface syntaxes. Plain TypeScript uses the
//! typescript grammar; the JSX-capable variants (.tsx, .jsx) and plain
//! JavaScript use the tsx grammar, which is a superset of javascript.

use crate::extract::treesitter::{CaptureSpec, Config, TreeSitterExtractor};
use crate::extract::{Extractor, SymbolKind};

/// Tree-sitter query for TS/JS imports, classes and functions.
///
/// Import records carry the source specifier with quotes stripped
/// (`import x from './utils'` yields "./utils"). Arrow functions and
/// function expressions bound to a `const`/`let` name count as functions,
/// as do call-expression wrappers like `React.memo(...)` or
/// `forwardRef(...)` so that wrapped components are not lost.
const QUERY: &str = r#"
(import_statement source: (string) @import_source)
(class_declaration name: (type_identifier) @class_name)
(function_declaration name: (identifier) @function_name)
(generator_function_declaration name: (identifier) @function_name)
(method_definition name: (property_identifier) @function_name)
(variable_declarator
  name: (identifier) @function_name
  value: [(arrow_function) (function_expression) (call_expression)])
"#;

static CAPTURES: &[CaptureSpec] = &[
    CaptureSpec {
        capture: "import_source",
        kind: SymbolKind::Import,
        trim_quotes: true,
    },
    CaptureSpec {
        capture: "class_name",
        kind: SymbolKind::Class,
        trim_quotes: false,
    },
    CaptureSpec {
        capture: "function_name",
        kind: SymbolKind::Function,
        trim_quotes: false,
    },
];

/// Create a new extractor for plain TypeScript.
pub fn new_typescript_extractor() -> Box<dyn Extractor> {
    Box::new(TreeSitterExtractor::new(Config {
        language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        language_name: "typescript",
        query: QUERY,
        captures: CAPTURES,
    }))
}

/// Create a new extractor for the JSX-capable syntaxes (.tsx, .jsx, .js).
pub fn new_tsx_extractor() -> Box<dyn Extractor> {
    Box::new(TreeSitterExtractor::new(Config {
        language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        language_name: "typescript",
        query: QUERY,
        captures: CAPTURES,
    }))
}

/// Register extractors for the four surface syntaxes.
pub fn register() {
    crate::extract::register(".ts", new_typescript_extractor);
    crate::extract::register(".tsx", new_tsx_extractor);
    crate::extract::register(".js", new_tsx_extractor);
    crate::extract::register(".jsx", new_tsx_extractor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SymbolKind;

    #[test]
    fn test_typescript_imports_quotes_stripped() {
        let extractor = new_typescript_extractor();
        let source = r#"
import React from 'react';
import { api } from "./lib/api";
import type { User } from '../models/user';
"#;

        let records = extractor.extract("src/App.ts", source).unwrap();
        let imports: Vec<&str> = records
            .iter()
            .filter(|r| r.kind == SymbolKind::Import)
            .map(|r| r.name.as_str())
            .collect();

        assert_eq!(imports, vec!["react", "./lib/api", "../models/user"]);
    }

    #[test]
    fn test_typescript_symbols() {
        let extractor = new_typescript_extractor();
        let source = r#"
class ApiClient {
    request(path: string): Promise<Response> {
        return fetch(path);
    }
}

function parse(input: string): number {
    return Number(input);
}
"#;

        let records = extractor.extract("src/client.ts", source).unwrap();

        assert!(records
            .iter()
            .any(|r| r.name == "ApiClient" && r.kind == SymbolKind::Class));
        assert!(records
            .iter()
            .any(|r| r.name == "request" && r.kind == SymbolKind::Function));
        assert!(records
            .iter()
            .any(|r| r.name == "parse" && r.kind == SymbolKind::Function));
    }

    #[test]
    fn test_tsx_components_count_as_functions() {
        let extractor = new_tsx_extractor();
        let source = r#"
import React from 'react';

const Button = () => <button>go</button>;

const Legacy = function () {
    return <span />;
};

const Wrapped = React.memo(Button);

export default function Page() {
    return <Button />;
}
"#;

        let records = extractor.extract("src/components/Button.tsx", source).unwrap();

        for name in ["Button", "Legacy", "Wrapped", "Page"] {
            assert!(
                records
                    .iter()
                    .any(|r| r.name == name && r.kind == SymbolKind::Function),
                "expected component {name} as function"
            );
        }
    }

    #[test]
    fn test_javascript_uses_tsx_grammar() {
        let extractor = new_tsx_extractor();
        let source = r#"
const express = require('express');

function handler(req, res) {
    res.send('ok');
}
"#;

        let records = extractor.extract("server/index.js", source).unwrap();
        // require() is a call expression, not an import statement, so no
        // import record is produced for it.
        assert!(!records.iter().any(|r| r.kind == SymbolKind::Import));
        assert!(records
            .iter()
            .any(|r| r.name == "handler" && r.kind == SymbolKind::Function));
    }

    #[test]
    fn test_empty_file_yields_no_records() {
        let extractor = new_tsx_extractor();
        let records = extractor.extract("src/empty.jsx", "").unwrap();
        assert!(records.is_empty());
    }
}
