use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all mvnlens operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LensError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The resolver record sequence cannot be turned into a tree.
    ///
    /// `position` is the zero-based index of the offending record.
    #[error("Malformed dependency sequence at record {position} (depth {depth}): {message}")]
    #[diagnostic(help(
        "Records must be emitted in pre-order; each record needs an ancestor exactly one level shallower"
    ))]
    Structural {
        position: usize,
        depth: usize,
        message: String,
    },

    /// Resolver output could not be read (bad JSON, unreadable tree text).
    #[error("Input error: {message}")]
    Input { message: String },

    /// Invalid analyzer configuration file.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check the [analyzer] table of your config file"))]
    Config { message: String },

    /// Project model (pom.xml) could not be read.
    #[error("POM error: {message}")]
    Pom { message: String },

    /// A background analysis task panicked or was cancelled.
    #[error("Analysis task failed: {message}")]
    Task { message: String },
}

impl LensError {
    pub fn is_structural(&self) -> bool {
        matches!(self, LensError::Structural { .. })
    }
}
