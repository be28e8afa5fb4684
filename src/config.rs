//! Configuration management for the resume signals tool

use crate::error::{Result, SignalScorerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ontology: OntologyConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Optional path to a user ontology JSON file. When unset, the
    /// compiled-in default ontology is used.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// How occurrences are counted.
    pub match_policy: MatchPolicy,
    /// How terms declared by multiple domains are credited.
    pub overlap_policy: OverlapPolicy,
    /// Tokens shorter than this are dropped during normalization.
    pub min_token_len: usize,
    /// Jaro-Winkler similarity above which a missing term is annotated
    /// with its closest resume token as a near miss.
    pub near_miss_threshold: f64,
    /// Domain coverage (percent) above which a gap-carrying domain still
    /// counts toward the visibility score.
    pub visibility_threshold: f64,
    /// Cap on reported missing terms per domain.
    pub max_gaps_per_domain: usize,
}

/// Occurrence counting policy. Frequency counts every occurrence of a term;
/// Presence credits each term at most once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    Frequency,
    Presence,
}

/// Resolution policy for terms declared by more than one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// First-domain-wins by ontology declaration order.
    FirstDeclared,
    /// Every declaring domain is credited.
    AllDomains,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ontology: OntologyConfig { path: None },
            scoring: ScoringConfig {
                match_policy: MatchPolicy::Frequency,
                overlap_policy: OverlapPolicy::FirstDeclared,
                min_token_len: 3,
                near_miss_threshold: 0.85,
                visibility_threshold: 40.0,
                max_gaps_per_domain: 20,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load the default config file, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicitly named config file. Unlike [`Config::load`], a
    /// missing file is an error, never silently replaced with defaults.
    pub fn load_from(config_path: &PathBuf) -> Result<Self> {
        if !config_path.exists() {
            return Err(SignalScorerError::Configuration(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            SignalScorerError::Configuration(format!("Failed to parse config: {}", e))
        })?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            SignalScorerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-signals")
            .join("config.toml")
    }
}
