//! Analysis configuration.
//!
//! All thresholds used by metrics, hypothesis detectors and assumption
//! rules live here, so the documented formulas are inspectable and
//! adjustable without touching detector code.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Tunable thresholds for one analysis run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// How many entries the hub ranking keeps after sorting.
    #[serde(default = "default_hub_limit")]
    pub hub_limit: usize,
    /// A file counts as a hub-and-spoke hub when its fan-in exceeds this.
    #[serde(default = "default_hub_fan_in_cutoff")]
    pub hub_fan_in_cutoff: usize,
    /// Fan-in above which a file is listed among the god modules.
    #[serde(default = "default_god_module_fan_in")]
    pub god_module_fan_in: usize,
    /// Fan-in and fan-out both above this mark a god-module coupling smell.
    #[serde(default = "default_god_module_coupling")]
    pub god_module_coupling: usize,
    /// Minimum ui-layer file count for the component-centric detector.
    #[serde(default = "default_component_centric_min_ui")]
    pub component_centric_min_ui: usize,
    /// Unresolved-external share of all imports above which the external
    /// dependency assumption escalates to high risk.
    #[serde(default = "default_external_high_ratio")]
    pub external_high_ratio: f64,
}

fn default_hub_limit() -> usize {
    10
}

fn default_hub_fan_in_cutoff() -> usize {
    8
}

fn default_god_module_fan_in() -> usize {
    15
}

fn default_god_module_coupling() -> usize {
    10
}

fn default_component_centric_min_ui() -> usize {
    20
}

fn default_external_high_ratio() -> f64 {
    0.5
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hub_limit: default_hub_limit(),
            hub_fan_in_cutoff: default_hub_fan_in_cutoff(),
            god_module_fan_in: default_god_module_fan_in(),
            god_module_coupling: default_god_module_coupling(),
            component_centric_min_ui: default_component_centric_min_ui(),
            external_high_ratio: default_external_high_ratio(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from YAML. Missing keys fall back to defaults.
    pub fn parse_str(content: &str) -> Result<Self, PipelineError> {
        let config: AnalysisConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.hub_limit, 10);
        assert_eq!(config.hub_fan_in_cutoff, 8);
        assert_eq!(config.god_module_fan_in, 15);
        assert_eq!(config.component_centric_min_ui, 20);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config = AnalysisConfig::parse_str("hub_fan_in_cutoff: 4\n").unwrap();
        assert_eq!(config.hub_fan_in_cutoff, 4);
        assert_eq!(config.hub_limit, 10);
    }

    #[test]
    fn test_empty_yaml_is_all_defaults() {
        let config = AnalysisConfig::parse_str("{}").unwrap();
        assert_eq!(config.god_module_coupling, 10);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(AnalysisConfig::parse_str("hub_limit: [oops").is_err());
    }
}
