//! Tree-sitter based extractor implementation.
//!
//! This module provides a generic query-driven extractor that can be
//! configured for different language families. Each language supplies one
//! query whose captures are mapped onto symbol kinds.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser as TsParser, Query, QueryCursor};

use super::{Extractor, SymbolKind, SymbolRecord};

/// Defines how one query capture maps onto a symbol record.
#[derive(Debug, Clone)]
pub struct CaptureSpec {
    /// Capture name in the query (e.g., "import_name").
    pub capture: &'static str,
    /// Symbol kind to emit for this capture.
    pub kind: SymbolKind,
    /// Strip one layer of matching string quotes from the captured text.
    /// Used for import specifiers captured as string literals.
    pub trim_quotes: bool,
}

/// Configuration for a tree-sitter language extractor.
#[derive(Clone)]
pub struct Config {
    /// The tree-sitter grammar.
    pub language: Language,
    /// Language family name (e.g., "python", "typescript").
    pub language_name: &'static str,
    /// Tree-sitter query matching imports, classes and functions.
    pub query: &'static str,
    /// How to map query captures to symbol records.
    pub captures: &'static [CaptureSpec],
}

/// Generic tree-sitter extractor.
pub struct TreeSitterExtractor {
    config: Config,
}

impl TreeSitterExtractor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn parse(&self, source: &[u8]) -> anyhow::Result<tree_sitter::Tree> {
        let mut parser = TsParser::new();
        parser.set_language(&self.config.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse source"))
    }
}

/// Find the line of the first error or missing node in the tree.
fn first_error_line(node: Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if child.has_error() || child.is_missing() {
            return first_error_line(child);
        }
    }
    node.start_position().row + 1
}

/// Strip one layer of matching quotes ('x', "x", `x`) from a string literal.
fn trim_string_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"' || first == b'`') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

impl Extractor for TreeSitterExtractor {
    fn extract(&self, path: &str, content: &str) -> anyhow::Result<Vec<SymbolRecord>> {
        let source = content.as_bytes();
        let tree = self.parse(source)?;
        let root = tree.root_node();

        // Malformed files are a per-file failure, not a crash: the
        // dispatcher records the message and continues with the batch.
        if root.has_error() {
            anyhow::bail!(
                "{} syntax error near line {}",
                self.config.language_name,
                first_error_line(root)
            );
        }

        let query = Query::new(&self.config.language, self.config.query)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, source);

        // (start_byte, record) pairs; sorted afterwards so that records
        // come out in source-appearance order regardless of which query
        // pattern produced them.
        let mut found: Vec<(usize, SymbolRecord)> = Vec::new();

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                let Some(spec) = self.config.captures.iter().find(|s| s.capture == capture_name)
                else {
                    continue;
                };
                let raw = capture.node.utf8_text(source).unwrap_or("");
                let name = if spec.trim_quotes {
                    trim_string_quotes(raw)
                } else {
                    raw
                };
                if name.is_empty() {
                    continue;
                }
                found.push((
                    capture.node.start_byte(),
                    SymbolRecord {
                        file: path.to_string(),
                        kind: spec.kind,
                        name: name.to_string(),
                        line: Some(capture.node.start_position().row + 1),
                        language: self.config.language_name.to_string(),
                    },
                ));
            }
        }

        found.sort_by_key(|(byte, _)| *byte);
        Ok(found.into_iter().map(|(_, record)| record).collect())
    }

    fn language(&self) -> &'static str {
        self.config.language_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_string_quotes() {
        assert_eq!(trim_string_quotes("'./utils'"), "./utils");
        assert_eq!(trim_string_quotes("\"react\""), "react");
        assert_eq!(trim_string_quotes("`x`"), "x");
        assert_eq!(trim_string_quotes("plain"), "plain");
        assert_eq!(trim_string_quotes("'"), "'");
        assert_eq!(trim_string_quotes("'mismatched\""), "'mismatched\"");
    }

    #[test]
    fn test_records_in_source_order() {
        use crate::extract::languages::python;

        let extractor = python::new_extractor();
        let source = "import zlib\nimport abc\n\ndef later():\n    pass\n";
        let records = extractor.extract("m.py", source).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zlib", "abc", "later"]);
        assert_eq!(records[0].line, Some(1));
        assert_eq!(records[1].line, Some(2));
    }

    #[test]
    fn test_syntax_error_is_failure() {
        use crate::extract::languages::python;

        let extractor = python::new_extractor();
        let err = extractor
            .extract("broken.py", "def broken(:\n    pass\n")
            .unwrap_err();
        assert!(err.to_string().contains("syntax error"), "got: {err}");
    }
}
