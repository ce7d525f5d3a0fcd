//! Configuration types and management for ontomatch-rs.
//!
//! One nested structure covers the whole engine: the matching section feeds
//! the matcher, the segmentation section feeds the time-series splitter.
//! Everything round-trips through YAML and is validated before a run starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analyzers::matcher::StrategyKind;
use crate::core::errors::{OntomatchError, Result};

/// Main configuration for the matching engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Method/concept matching configuration
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Trace time-series segmentation configuration
    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            segmentation: SegmentationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            OntomatchError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            OntomatchError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;
        self.segmentation.validate()?;
        Ok(())
    }
}

/// Method/concept matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Named matching strategy to run ("tfidf-cosine", "term-overlap")
    pub strategy: String,

    /// Minimum similarity score an edge must exceed to be kept
    pub threshold: f64,

    /// Terms dropped before stemming; empty means the built-in default list
    #[serde(default)]
    pub rejected_words: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::TfIdfCosine.name().to_string(),
            threshold: 0.0,
            rejected_words: Vec::new(),
        }
    }
}

impl MatchingConfig {
    /// Validate matching configuration
    pub fn validate(&self) -> Result<()> {
        StrategyKind::parse(&self.strategy)?;

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(OntomatchError::config_field(
                format!(
                    "threshold must be between 0.0 and 1.0, got {}",
                    self.threshold
                ),
                "matching.threshold",
            ));
        }
        Ok(())
    }

    /// Resolve the configured strategy
    pub fn strategy_kind(&self) -> Result<StrategyKind> {
        StrategyKind::parse(&self.strategy)
    }
}

/// Trace time-series segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Number of segments the trace axis is split into
    pub segment_count: usize,

    /// Weight a cell must exceed to count toward its segment
    pub threshold: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            segment_count: 10,
            threshold: 0.5,
        }
    }
}

impl SegmentationConfig {
    /// Validate segmentation configuration
    pub fn validate(&self) -> Result<()> {
        if self.segment_count == 0 {
            return Err(OntomatchError::config_field(
                "segment_count must be at least 1",
                "segmentation.segment_count",
            ));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(OntomatchError::config_field(
                format!(
                    "threshold must be between 0.0 and 1.0, got {}",
                    self.threshold
                ),
                "segmentation.threshold",
            ));
        }
        Ok(())
    }
}
