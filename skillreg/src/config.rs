//! Registry configuration.
//!
//! Optional settings live in `<registry root>/config.toml`:
//!
//! ```toml
//! strict_threshold = 85
//! default_gate = "strict"
//! default_output = "text"
//!
//! [targets]
//! codex = "~/.codex/skills"
//! claude = ".claude/skills"
//! ```
//!
//! Every key is optional. `[targets]` entries override the directory a given
//! agent receives skills in.

use std::{collections::BTreeMap, fmt, fs, io, path::Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use skillcheck::{DEFAULT_STRICT_THRESHOLD, VerificationReport};
use thiserror::Error;

use crate::agent::Agent;

/// Errors raised while loading `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("`strict_threshold` must be between 0 and 100, got {0}")]
    Threshold(u32),

    #[error("Unknown agent in [targets]: {0}")]
    UnknownAgent(String),
}

/// Which grade decides success of `verify` and `register`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    /// Portable Agent Skills checks only.
    #[default]
    Spec,
    /// Registry workflow quality gate.
    Strict,
}

impl Gate {
    pub fn passed(self, report: &VerificationReport) -> bool {
        match self {
            Gate::Spec => report.spec_passed,
            Gate::Strict => report.strict_passed,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gate::Spec => "spec",
            Gate::Strict => "strict",
        })
    }
}

/// Verification report rendering.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Coloured, grouped output for terminals.
    #[default]
    Pretty,
    /// Plain `[verify]` lines.
    Text,
    /// Pretty-printed JSON payload.
    Json,
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Minimum strict grade for a strict pass.
    pub strict_threshold: u32,
    pub default_gate: Gate,
    pub default_output: OutputFormat,
    /// Agent name to skills directory overrides.
    pub targets: BTreeMap<String, String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_threshold: u32::from(DEFAULT_STRICT_THRESHOLD),
            default_gate: Gate::default(),
            default_output: OutputFormat::default(),
            targets: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    /// Loads the configuration at `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unreadable or malformed files and for
    /// values outside their allowed range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "config.toml".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.strict_threshold > 100 {
            return Err(ConfigError::Threshold(self.strict_threshold));
        }
        for key in self.targets.keys() {
            if key.parse::<Agent>().is_err() {
                return Err(ConfigError::UnknownAgent(key.clone()));
            }
        }
        Ok(())
    }

    /// Threshold as passed to the verifier.
    pub fn threshold(&self) -> u8 {
        u8::try_from(self.strict_threshold).unwrap_or(100)
    }

    /// Configured directory override for `agent`.
    pub fn target(&self, agent: Agent) -> Option<&str> {
        self.targets.get(agent.name()).map(String::as_str)
    }
}
