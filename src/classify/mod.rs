//! Repository-level classification: project archetype and per-file layers.

pub mod archetype;
pub mod layers;

pub use archetype::{classify_archetype, Archetype, ArchetypeReport};
pub use layers::{infer_layer, infer_layers, LayerMap, UNCLASSIFIED};
