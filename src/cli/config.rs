//! Saved evaluation settings (`concord config ...`).
//!
//! Configs are TOML files named `<name>.toml` in the user config directory.
//! Every key is optional; command-line flags override stored values.
//!
//! ```toml
//! aggregation = "macro"
//! tie_break = "random-with-seed"
//! seed = 42
//! k = 5
//! partial = true
//! target_complete = true
//! threshold = 0.3
//! beta = 2.0
//! ```

use crate::eval::{AggregationMode, GoldStandardCompleteness, SameConfidenceRanking};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stored evaluation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Micro or macro averaging over several test cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationMode>,
    /// Tie-break policy name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<String>,
    /// Seed for `random-with-seed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// K for HITS@K.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
    /// Treat the reference as a partial gold standard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
    /// Partial gold standard lists all partners of each source entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_complete: Option<bool>,
    /// Partial gold standard lists all partners of each target entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_complete: Option<bool>,
    /// Confidence cut applied to system alignments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Beta of the additional F-measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl EvalConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, String> {
        toml::to_string(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    /// Read `<dir>/<name>.toml`.
    pub fn load(dir: &Path, name: &str) -> Result<Self, String> {
        let path = dir.join(format!("{}.toml", name));
        if !path.exists() {
            return Err(format!("Config '{}' not found", name));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;
        Self::from_toml_str(&content)
    }

    /// Write `<dir>/<name>.toml`, replacing an existing file.
    pub fn save(&self, dir: &Path, name: &str) -> Result<(), String> {
        let path = dir.join(format!("{}.toml", name));
        std::fs::write(&path, self.to_toml_string()?)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Tie-break policy, combining `tie_break` and `seed`.
    pub fn tie_break(&self) -> Result<Option<SameConfidenceRanking>, String> {
        let Some(name) = &self.tie_break else {
            return Ok(None);
        };
        let parsed: SameConfidenceRanking = name.parse()?;
        Ok(Some(match (parsed, self.seed) {
            (SameConfidenceRanking::RandomWithSeed(_), Some(seed)) => {
                SameConfidenceRanking::RandomWithSeed(seed)
            }
            (other, _) => other,
        }))
    }

    /// Gold standard completeness described by the partial flags.
    #[must_use]
    pub fn completeness(&self) -> GoldStandardCompleteness {
        if self.partial.unwrap_or(false) {
            GoldStandardCompleteness::partial(
                self.source_complete.unwrap_or(false),
                self.target_complete.unwrap_or(false),
            )
        } else {
            GoldStandardCompleteness::Complete
        }
    }
}
