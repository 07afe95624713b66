//! Depth-annotated records produced by an external dependency resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Maven-compatible dependency scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Import,
}

impl DependencyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyScope::Compile => "compile",
            DependencyScope::Runtime => "runtime",
            DependencyScope::Provided => "provided",
            DependencyScope::Test => "test",
            DependencyScope::System => "system",
            DependencyScope::Import => "import",
        }
    }
}

impl FromStr for DependencyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compile" => Ok(DependencyScope::Compile),
            "runtime" => Ok(DependencyScope::Runtime),
            "provided" => Ok(DependencyScope::Provided),
            "test" => Ok(DependencyScope::Test),
            "system" => Ok(DependencyScope::System),
            "import" => Ok(DependencyScope::Import),
            other => Err(format!("unknown scope `{other}`")),
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the resolver claims it did with a node.
///
/// Only a hint: the analyzer verifies duplicates itself and never trusts
/// an unverified claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawState {
    Included,
    OmittedForDuplicate,
    OmittedForConflict,
}

impl fmt::Display for RawState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RawState::Included => "included",
            RawState::OmittedForDuplicate => "omitted-for-duplicate",
            RawState::OmittedForConflict => "omitted-for-conflict",
        })
    }
}

/// One entry of the resolver's pre-order traversal.
///
/// `depth` is 1 for the project's direct dependencies; the project itself
/// is never a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverRecord {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub version: String,
    #[serde(default)]
    pub scope: DependencyScope,
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_state: Option<RawState>,
}

impl ResolverRecord {
    pub fn new(coordinate: Coordinate, version: impl Into<String>, depth: usize) -> Self {
        Self {
            coordinate,
            version: version.into(),
            scope: DependencyScope::Compile,
            depth,
            raw_state: None,
        }
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_raw_state(mut self, state: RawState) -> Self {
        self.raw_state = Some(state);
        self
    }
}

impl fmt::Display for ResolverRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.coordinate, self.version, self.scope)
    }
}
