//! Language-dispatching symbol extraction.
//!
//! This module provides:
//! - `SymbolRecord`: the normalized unit of extracted information
//! - `Extractor` trait: abstract interface for language extractors
//! - Registry: factory-based extractor lookup by file extension
//! - `extract_all`: the batch dispatcher with per-file failure isolation

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub mod languages;

/// The kind of an extracted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Import,
    Class,
    Function,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Import => "import",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One extracted fact about a file.
///
/// For imports, `name` is the module/path exactly as written in source;
/// resolution against the file set happens later, in graph building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Repo-relative source file path.
    pub file: String,
    /// What this record describes.
    pub kind: SymbolKind,
    /// Symbol name, or the imported module as written.
    pub name: String,
    /// 1-indexed source line, when the extractor could attribute one.
    pub line: Option<usize>,
    /// Language family that produced this record (e.g. "python").
    pub language: String,
}

/// Extractor trait: parse one file's text into symbol records.
///
/// Implementations must be deterministic for identical input and must not
/// mutate shared state. Empty files and files with zero recognized
/// constructs yield `Ok(vec![])`, never an error.
pub trait Extractor: Send + Sync {
    /// Extract all symbol records from source, in source-appearance order.
    fn extract(&self, path: &str, content: &str) -> anyhow::Result<Vec<SymbolRecord>>;

    /// The language family this extractor handles (e.g. "python").
    fn language(&self) -> &'static str;
}

/// Factory function type for creating extractor instances.
pub type ExtractorFactory = fn() -> Box<dyn Extractor>;

lazy_static::lazy_static! {
    /// Global extractor registry mapping file extensions to factories.
    static ref REGISTRY: RwLock<HashMap<String, ExtractorFactory>> = RwLock::new(HashMap::new());
}

/// Register an extractor factory for a file extension.
/// Extension should include the dot (e.g., ".py", ".tsx").
pub fn register(ext: &str, factory: ExtractorFactory) {
    let mut registry = REGISTRY.write().unwrap();
    registry.insert(ext.to_string(), factory);
}

/// Get an extractor for the given file extension.
/// Returns None if no extractor is registered for the extension.
pub fn for_extension(ext: &str) -> Option<Box<dyn Extractor>> {
    let registry = REGISTRY.read().unwrap();
    registry.get(ext).map(|factory| factory())
}

/// Return all registered file extensions.
pub fn supported_extensions() -> Vec<String> {
    let registry = REGISTRY.read().unwrap();
    registry.keys().cloned().collect()
}

/// Initialize the extractor registry with all built-in language families.
/// Idempotent; call before dispatching.
#[cfg(feature = "tree-sitter")]
pub fn init() {
    languages::register_all();
}

/// Initialize (no-op when tree-sitter is disabled).
#[cfg(not(feature = "tree-sitter"))]
pub fn init() {
    // No extractors available
}

/// The extension of a path, including the dot (".py" for "src/a.py").
/// Returns None for paths without an extension.
fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(name[dot..].to_ascii_lowercase())
}

/// Result of dispatching a batch of files through the extractors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionOutcome {
    /// Per-file records in source order. Every successfully extracted file
    /// has an entry, even when it contains zero recognized constructs.
    pub records: BTreeMap<String, Vec<SymbolRecord>>,
    /// Files that failed extraction, with a reason.
    pub failures: BTreeMap<String, String>,
}

impl ExtractionOutcome {
    /// Iterate over all records across all files.
    pub fn all_records(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.records.values().flatten()
    }
}

/// Route each file to the extractor registered for its extension and
/// aggregate the results.
///
/// Files whose extension has no registered extractor are skipped silently;
/// they are outside the symbol model. A parse failure in one file never
/// aborts the batch: the file lands in `failures` with a message and the
/// remaining files proceed. Per-file extraction runs in parallel; outputs
/// land in disjoint keys, so a cancelled run simply drops the collection.
pub fn extract_all(files: &BTreeMap<String, String>) -> ExtractionOutcome {
    let results: Vec<(String, Result<Vec<SymbolRecord>, String>)> = files
        .par_iter()
        .filter_map(|(path, content)| {
            let ext = extension_of(path)?;
            let extractor = for_extension(&ext)?;
            let result = extractor
                .extract(path, content)
                .map_err(|e| e.to_string());
            Some((path.clone(), result))
        })
        .collect();

    let mut outcome = ExtractionOutcome::default();
    for (path, result) in results {
        match result {
            Ok(records) => {
                outcome.records.insert(path, records);
            }
            Err(message) => {
                warn!(file = %path, %message, "extraction failed");
                outcome.failures.insert(path, message);
            }
        }
    }

    debug!(
        extracted = outcome.records.len(),
        failed = outcome.failures.len(),
        skipped = files.len() - outcome.records.len() - outcome.failures.len(),
        "extraction batch finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockExtractor;

    impl Extractor for MockExtractor {
        fn extract(&self, path: &str, content: &str) -> anyhow::Result<Vec<SymbolRecord>> {
            if content.contains("!!bad!!") {
                anyhow::bail!("mock parse failure");
            }
            Ok(vec![SymbolRecord {
                file: path.to_string(),
                kind: SymbolKind::Function,
                name: "probe".to_string(),
                line: Some(1),
                language: "mock".to_string(),
            }])
        }

        fn language(&self) -> &'static str {
            "mock"
        }
    }

    fn mock_factory() -> Box<dyn Extractor> {
        Box::new(MockExtractor)
    }

    #[test]
    fn test_registry_roundtrip() {
        register(".mock", mock_factory);

        let extractor = for_extension(".mock").expect("registered extension");
        assert_eq!(extractor.language(), "mock");

        let records = extractor.extract("a.mock", "fn").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "probe");
    }

    #[test]
    fn test_unregistered_extension() {
        assert!(for_extension(".nope").is_none());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("src/a.py").as_deref(), Some(".py"));
        assert_eq!(extension_of("src/App.TSX").as_deref(), Some(".tsx"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("src/.env"), None);
        assert_eq!(extension_of("weird."), None);
    }

    #[test]
    fn test_dispatch_isolates_failures() {
        register(".mock", mock_factory);

        let mut files = BTreeMap::new();
        files.insert("ok.mock".to_string(), "fine".to_string());
        files.insert("broken.mock".to_string(), "!!bad!!".to_string());
        files.insert("skipped.toml".to_string(), "key = 1".to_string());

        let outcome = extract_all(&files);
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records.contains_key("ok.mock"));
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures["broken.mock"].contains("mock parse failure"));
        // Unsupported extension: neither extracted nor failed.
        assert!(!outcome.records.contains_key("skipped.toml"));
        assert!(!outcome.failures.contains_key("skipped.toml"));
    }
}
