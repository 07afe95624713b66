use std::fmt;

use serde::{Deserialize, Serialize};

/// Default Maven packaging when a record omits `type`.
pub const DEFAULT_TYPE: &str = "jar";

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

/// Identity of a Maven artifact, excluding its version.
///
/// Two nodes with equal coordinates compete for the same slot on the
/// classpath, so `Coordinate` doubles as the conflict grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(rename = "type", default = "default_type")]
    pub packaging: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl Coordinate {
    /// A `jar` coordinate without classifier.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            packaging: default_type(),
            classifier: None,
        }
    }

    pub fn with_type(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Parse `group:artifact[:type[:classifier]]`.
    ///
    /// Returns `None` unless there are two to four parts.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [g, a] => Some(Self::new(*g, *a)),
            [g, a, t] => Some(Self::new(*g, *a).with_type(*t)),
            [g, a, t, c] => Some(Self::new(*g, *a).with_type(*t).with_classifier(*c)),
            _ => None,
        }
    }

    /// A coordinate is malformed when the group or artifact is blank.
    pub fn is_malformed(&self) -> bool {
        self.group_id.trim().is_empty() || self.artifact_id.trim().is_empty()
    }

    /// The `groupId:artifactId` pair an `<exclusion>` refers to.
    pub fn exclusion(&self) -> Exclusion {
        Exclusion {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
        }
    }

    /// `group:artifact` identifier, ignoring type and classifier.
    pub fn short_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.packaging)?;
        if let Some(ref classifier) = self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// A transitive artifact to exclude, matched by group and artifact only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    /// Parse `group:artifact`. A `*` artifact is kept verbatim.
    pub fn parse(s: &str) -> Option<Self> {
        let (g, a) = s.split_once(':')?;
        if g.is_empty() || a.is_empty() || a.contains(':') {
            return None;
        }
        Some(Self {
            group_id: g.to_string(),
            artifact_id: a.to_string(),
        })
    }

    /// Whether this exclusion removes `coordinate`, honouring `*` wildcards.
    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        (self.group_id == "*" || self.group_id == coordinate.group_id)
            && (self.artifact_id == "*" || self.artifact_id == coordinate.artifact_id)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}
