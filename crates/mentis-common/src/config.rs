//! Engine configuration.
//! Loaded from a TOML file; every field has a default so an empty file (or
//! `EngineConfig::default()`) is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MentisError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub propagation: PropagationConfig,
    #[serde(default)]
    pub references: ReferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// A known specificity score must exceed this for a match to propagate.
    #[serde(default = "default_specificity_threshold")]
    pub specificity_threshold: f64,
    /// Matched terms shorter than this are skipped.
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,
    /// Single-character terms exempt from `min_term_len` ("R" is a real
    /// software name).
    #[serde(default = "default_short_term_whitelist")]
    pub short_term_whitelist: Vec<String>,
}

fn default_specificity_threshold() -> f64 { 0.001 }
fn default_min_term_len() -> usize { 2 }
fn default_short_term_whitelist() -> Vec<String> { vec!["R".to_string()] }

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            specificity_threshold: default_specificity_threshold(),
            min_term_len: default_min_term_len(),
            short_term_whitelist: default_short_term_whitelist(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Maximum characters of punctuation/space between a mention boundary
    /// and a reference callout for the callout to attach.
    #[serde(default = "default_max_gap")]
    pub max_gap: usize,
}

fn default_max_gap() -> usize { 5 }

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self { max_gap: default_max_gap() }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let cfg = toml::from_str(&raw).map_err(|e| MentisError::Config(e.to_string()))?;
        tracing::info!("engine configuration loaded from {}", path.as_ref().display());
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.propagation.specificity_threshold, 0.001);
        assert_eq!(cfg.propagation.min_term_len, 2);
        assert_eq!(cfg.propagation.short_term_whitelist, vec!["R"]);
        assert_eq!(cfg.references.max_gap, 5);
    }

    #[test]
    fn test_empty_toml_is_valid() {
        let cfg: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.references.max_gap, 5);
    }

    #[test]
    fn test_partial_override() {
        let cfg: EngineConfig = toml::from_str(
            "[references]\nmax_gap = 3\n",
        )
        .unwrap();
        assert_eq!(cfg.references.max_gap, 3);
        assert_eq!(cfg.propagation.specificity_threshold, 0.001);
    }
}
