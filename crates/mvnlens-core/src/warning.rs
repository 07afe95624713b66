//! Non-fatal anomalies found while reading resolver output.

use std::fmt;

use serde::Serialize;

/// Category of a [`ParseWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Version string is empty, not UTF-8, or contains unusual characters.
    UnusualVersion,
    /// Coordinate lacks a group or artifact id.
    MalformedCoordinate,
    /// Resolver claimed a duplicate that could not be confirmed.
    UnverifiedHint,
    /// Scope string outside the Maven set; treated as `compile`.
    UnknownScope,
    /// Tree text line that could not be read as a dependency.
    UnreadableLine,
}

/// Where in the input a warning was raised. Both indexes are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    /// Index into the record sequence.
    Record(usize),
    /// Line of a text input file.
    Line(usize),
}

/// A syntactically unusual input that degraded to best-effort handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub location: Option<Location>,
    pub message: String,
}

impl ParseWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, record: usize) -> Self {
        self.location = Some(Location::Record(record));
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.location = Some(Location::Line(line));
        self
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(Location::Record(index)) => write!(f, "record {index}: {}", self.message),
            Some(Location::Line(index)) => write!(f, "line {}: {}", index + 1, self.message),
            None => f.write_str(&self.message),
        }
    }
}
