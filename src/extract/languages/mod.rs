//! Language-specific tree-sitter configurations.
//!
//! Each language module provides the extraction query, the capture-to-kind
//! mapping, and a factory plus `register()` entry for its file extensions.

pub mod python;
pub mod typescript;

/// Register all built-in language extractors.
pub fn register_all() {
    python::register();
    typescript::register();
}
