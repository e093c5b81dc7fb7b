//! Python language configuration for tree-sitter extraction.

use crate::extract::treesitter::{CaptureSpec, Config, TreeSitterExtractor};
use crate::extract::{Extractor, SymbolKind};

/// Tree-sitter query for Python imports, classes and functions.
///
/// Import names are captured exactly as written: `import a.b` yields "a.b",
/// `from x.y import z` yields "x.y", and `from .sub import z` yields ".sub".
/// A statement importing several modules yields one record per module.
/// Function definitions match at any nesting depth, so methods and inner
/// functions are included; imports inside functions or conditionals count
/// the same as module-level ones.
const QUERY: &str = r#"
(import_statement name: (dotted_name) @import_name)
(import_statement name: (aliased_import name: (dotted_name) @import_name))
(import_from_statement module_name: (dotted_name) @import_name)
(import_from_statement module_name: (relative_import) @import_name)
(class_definition name: (identifier) @class_name)
(function_definition name: (identifier) @function_name)
"#;

static CAPTURES: &[CaptureSpec] = &[
    CaptureSpec {
        capture: "import_name",
        kind: SymbolKind::Import,
        trim_quotes: false,
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

/// Create a new Python extractor.
pub fn new_extractor() -> Box<dyn Extractor> {
    Box::new(TreeSitterExtractor::new(Config {
        language: tree_sitter_python::LANGUAGE.into(),
        language_name: "python",
        query: QUERY,
        captures: CAPTURES,
    }))
}

/// Register the Python extractor for the .py extension.
pub fn register() {
    crate::extract::register(".py", new_extractor);
}
