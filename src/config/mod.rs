//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `OVERLAP_*` environment variables
//! or load a JSON document with [`EngineConfig::from_json_str`].

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::citation::{CitationRule, CitationWeights};
use crate::constants::{
    DEFAULT_EVIDENCE_CAP, DEFAULT_PARAGRAPH_THRESHOLD, DEFAULT_QUERY_TOP_K,
    DEFAULT_QUOTE_MIN_FRACTION, DEFAULT_SENTENCE_THRESHOLD, DimConfig,
};
use crate::corpus::Granularity;
use crate::embedding::ExecutionMode;
use crate::index::IndexPartitioning;
use crate::scoring::{FusionWeights, ScoreWeights};

/// Retrieval settings of one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GranularityConfig {
    /// Minimum similarity for a hit to be retrieved and (after citation
    /// dampening) to qualify.
    pub threshold: f32,
    /// Neighbors requested per query.
    pub query_top_k: usize,
}

/// Engine configuration.
///
/// Use [`EngineConfig::from_env`] to read `OVERLAP_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sentence retrieval. Default threshold: `0.80`, top-k `50`.
    pub sentence: GranularityConfig,

    /// Paragraph retrieval. Default threshold: `0.75`, top-k `50`.
    pub paragraph: GranularityConfig,

    /// Run the paragraph granularity at all. Default: `true`.
    pub paragraph_check: bool,

    /// Match across languages through one shared index. Default: `false`.
    pub cross_language: bool,

    /// Flag citation-bearing segments. Default: `true`.
    pub citation_check: bool,

    /// Share of a segment that must be quoted for the quotation rule. Default: `0.2`.
    pub quote_min_fraction: f32,

    /// Extra citation rules evaluated after the built-in ones.
    pub citation_patterns: Vec<CitationRule>,

    pub citation_weights: CitationWeights,

    pub score_weights: ScoreWeights,

    pub fusion_weights: FusionWeights,

    /// Evidence hits kept per pair. Default: `20`.
    pub evidence_cap: usize,

    /// Oracle scheduling. Default: CPU pool sized to the machine.
    pub execution: ExecutionMode,

    /// Expected embedding dimension; `None` accepts the oracle's.
    pub embedding_dim: Option<usize>,

    /// Wall-clock budget for one batch, in seconds.
    pub batch_budget_secs: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sentence: GranularityConfig {
                threshold: DEFAULT_SENTENCE_THRESHOLD,
                query_top_k: DEFAULT_QUERY_TOP_K,
            },
            paragraph: GranularityConfig {
                threshold: DEFAULT_PARAGRAPH_THRESHOLD,
                query_top_k: DEFAULT_QUERY_TOP_K,
            },
            paragraph_check: true,
            cross_language: false,
            citation_check: true,
            quote_min_fraction: DEFAULT_QUOTE_MIN_FRACTION,
            citation_patterns: Vec::new(),
            citation_weights: CitationWeights::default(),
            score_weights: ScoreWeights::default(),
            fusion_weights: FusionWeights::default(),
            evidence_cap: DEFAULT_EVIDENCE_CAP,
            execution: ExecutionMode::default(),
            embedding_dim: None,
            batch_budget_secs: None,
        }
    }
}

impl EngineConfig {
    const ENV_SENTENCE_THRESHOLD: &'static str = "OVERLAP_SENTENCE_THRESHOLD";
    const ENV_PARAGRAPH_THRESHOLD: &'static str = "OVERLAP_PARAGRAPH_THRESHOLD";
    const ENV_QUERY_TOP_K: &'static str = "OVERLAP_QUERY_TOP_K";
    const ENV_EVIDENCE_CAP: &'static str = "OVERLAP_EVIDENCE_CAP";
    const ENV_HIT_COUNT_CAP: &'static str = "OVERLAP_HIT_COUNT_CAP";
    const ENV_CROSS_LANGUAGE: &'static str = "OVERLAP_CROSS_LANGUAGE";
    const ENV_CITATION_CHECK: &'static str = "OVERLAP_CITATION_CHECK";
    const ENV_PARAGRAPH_CHECK: &'static str = "OVERLAP_PARAGRAPH_CHECK";
    const ENV_EXECUTION_MODE: &'static str = "OVERLAP_EXECUTION_MODE";
    const ENV_CPU_WORKERS: &'static str = "OVERLAP_CPU_WORKERS";
    const ENV_BATCH_BUDGET_SECS: &'static str = "OVERLAP_BATCH_BUDGET_SECS";
    const ENV_EMBEDDING_DIM: &'static str = "OVERLAP_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let sentence_threshold =
            Self::parse_f32_from_env(Self::ENV_SENTENCE_THRESHOLD, defaults.sentence.threshold)?;
        let paragraph_threshold =
            Self::parse_f32_from_env(Self::ENV_PARAGRAPH_THRESHOLD, defaults.paragraph.threshold)?;
        let query_top_k =
            Self::parse_usize_from_env(Self::ENV_QUERY_TOP_K, defaults.sentence.query_top_k)?;
        let evidence_cap = Self::parse_usize_from_env(Self::ENV_EVIDENCE_CAP, defaults.evidence_cap)?;
        let hit_count_cap = Self::parse_usize_from_env(
            Self::ENV_HIT_COUNT_CAP,
            defaults.score_weights.hit_count_cap,
        )?;
        let cross_language =
            Self::parse_bool_from_env(Self::ENV_CROSS_LANGUAGE, defaults.cross_language)?;
        let citation_check =
            Self::parse_bool_from_env(Self::ENV_CITATION_CHECK, defaults.citation_check)?;
        let paragraph_check =
            Self::parse_bool_from_env(Self::ENV_PARAGRAPH_CHECK, defaults.paragraph_check)?;
        let execution = Self::parse_execution_from_env(defaults.execution)?;
        let batch_budget_secs = Self::parse_optional_f64_from_env(Self::ENV_BATCH_BUDGET_SECS)?;
        let embedding_dim = Self::parse_optional_usize_from_env(Self::ENV_EMBEDDING_DIM)?;

        Ok(Self {
            sentence: GranularityConfig {
                threshold: sentence_threshold,
                query_top_k,
            },
            paragraph: GranularityConfig {
                threshold: paragraph_threshold,
                query_top_k,
            },
            paragraph_check,
            cross_language,
            citation_check,
            evidence_cap,
            score_weights: ScoreWeights {
                hit_count_cap,
                ..defaults.score_weights
            },
            execution,
            embedding_dim,
            batch_budget_secs,
            ..defaults
        })
    }

    /// Parses a JSON config document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks ranges and weight invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for granularity in Granularity::ALL {
            let settings = self.granularity(granularity);
            if !(0.0..=1.0).contains(&settings.threshold) {
                return Err(ConfigError::ThresholdOutOfRange {
                    granularity,
                    value: settings.threshold,
                });
            }
            if settings.query_top_k == 0 {
                return Err(ConfigError::ZeroLimit {
                    name: "query_top_k",
                });
            }
        }

        if self.evidence_cap == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "evidence_cap",
            });
        }
        self.dims()
            .validate()
            .map_err(|_| ConfigError::ZeroDimension)?;
        if let Some(value) = self.batch_budget_secs
            && !(value.is_finite() && value > 0.0)
        {
            return Err(ConfigError::InvalidBudget { value });
        }

        self.citation_weights.validate()?;
        self.score_weights.validate()?;
        self.fusion_weights.validate()?;
        Ok(())
    }

    pub fn granularity(&self, granularity: Granularity) -> &GranularityConfig {
        match granularity {
            Granularity::Sentence => &self.sentence,
            Granularity::Paragraph => &self.paragraph,
        }
    }

    /// Granularities the engine runs, in pipeline order.
    pub fn enabled_granularities(&self) -> Vec<Granularity> {
        Granularity::ALL
            .into_iter()
            .filter(|g| *g == Granularity::Sentence || self.paragraph_check)
            .collect()
    }

    pub fn partitioning(&self) -> IndexPartitioning {
        IndexPartitioning::from_cross_language(self.cross_language)
    }

    pub fn dims(&self) -> DimConfig {
        DimConfig {
            embedding_dim: self.embedding_dim,
        }
    }

    pub fn batch_budget(&self) -> Option<Duration> {
        self.batch_budget_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Weights used by aggregation; identity weights when citation checking is off.
    pub fn effective_citation_weights(&self) -> CitationWeights {
        if self.citation_check {
            self.citation_weights
        } else {
            CitationWeights::disabled()
        }
    }

    fn parse_f32_from_env(name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match Self::non_empty_var(name) {
            Some(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name,
                value,
                source: e,
            }),
            None => Ok(default),
        }
    }

    fn parse_optional_f64_from_env(name: &'static str) -> Result<Option<f64>, ConfigError> {
        match Self::non_empty_var(name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::FloatParseError {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(None),
        }
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        Ok(Self::parse_optional_usize_from_env(name)?.unwrap_or(default))
    }

    fn parse_optional_usize_from_env(name: &'static str) -> Result<Option<usize>, ConfigError> {
        match Self::non_empty_var(name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::IntParseError {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(None),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match Self::non_empty_var(name) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool { name, value }),
            },
            None => Ok(default),
        }
    }

    fn parse_execution_from_env(default: ExecutionMode) -> Result<ExecutionMode, ConfigError> {
        let mode = match Self::non_empty_var(Self::ENV_EXECUTION_MODE) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidExecutionMode { value })?,
            None => default,
        };
        match mode {
            ExecutionMode::Cpu { workers } => Ok(ExecutionMode::Cpu {
                workers: Self::parse_usize_from_env(Self::ENV_CPU_WORKERS, workers)?,
            }),
            ExecutionMode::Gpu => Ok(ExecutionMode::Gpu),
        }
    }

    fn non_empty_var(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Input and output locations of the `overlap` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoConfig {
    /// JSON corpus to read.
    pub corpus_path: Option<PathBuf>,
    /// Report destination; stdout when unset.
    pub output_path: Option<PathBuf>,
}

impl IoConfig {
    const ENV_CORPUS_PATH: &'static str = "OVERLAP_CORPUS_PATH";
    const ENV_OUTPUT_PATH: &'static str = "OVERLAP_OUTPUT_PATH";

    pub fn from_env() -> Self {
        Self {
            corpus_path: Self::parse_optional_path_from_env(Self::ENV_CORPUS_PATH),
            output_path: Self::parse_optional_path_from_env(Self::ENV_OUTPUT_PATH),
        }
    }

    /// Returns an error when a corpus path is set but is not a readable file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.corpus_path
            && !path.is_file()
        {
            return Err(ConfigError::Io {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a file"),
            });
        }
        Ok(())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
