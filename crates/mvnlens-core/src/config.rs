use std::path::Path;

use mvnlens_util::errors::LensError;
use serde::{Deserialize, Serialize};

use crate::record::DependencyScope;

/// Options recognized by conflict detection, read from the `[analyzer]`
/// table of a TOML config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Whether `test`-scoped nodes take part in conflict detection.
    #[serde(default = "default_true", rename = "include-test-scope")]
    pub include_test_scope: bool,

    /// Whether `provided`-scoped nodes take part in conflict detection.
    #[serde(default = "default_true", rename = "treat-provided-as-conflicting")]
    pub treat_provided_as_conflicting: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include_test_scope: true,
            treat_provided_as_conflicting: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// On-disk layout of the config file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    analyzer: AnalyzerConfig,
}

impl AnalyzerConfig {
    /// Parse a TOML document; a missing `[analyzer]` table yields defaults.
    pub fn parse_toml(content: &str) -> Result<Self, LensError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| LensError::Config {
            message: format!("Failed to parse config: {e}"),
        })?;
        Ok(file.analyzer)
    }

    /// Load the config file at `path`, or return defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, LensError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| LensError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Whether a node in `scope` participates in conflict grouping.
    pub fn participates(&self, scope: DependencyScope) -> bool {
        match scope {
            DependencyScope::Test => self.include_test_scope,
            DependencyScope::Provided => self.treat_provided_as_conflicting,
            _ => true,
        }
    }
}
