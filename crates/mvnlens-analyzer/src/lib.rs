//! Maven dependency conflict analysis: version ordering, tree reconstruction
//! from resolver output, nearest-wins mediation, and exclusion advice.

pub mod conflict;
pub mod exclusion;
pub mod filter;
pub mod input;
pub mod pom;
pub mod render;
pub mod session;
pub mod tree;
pub mod version;

use mvnlens_core::config::AnalyzerConfig;
use mvnlens_core::coordinate::Coordinate;
use mvnlens_core::record::ResolverRecord;
use mvnlens_core::warning::ParseWarning;
use mvnlens_util::errors::LensError;

use crate::conflict::ConflictReport;
use crate::exclusion::ExclusionAdvice;
use crate::input::ResolverOutput;
use crate::tree::DependencyTree;

/// A finished analysis of one resolver output.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tree: DependencyTree,
    pub report: ConflictReport,
    pub advice: ExclusionAdvice,
    /// Anomalies found while reading the input, before the tree existed.
    pub input_warnings: Vec<ParseWarning>,
}

impl Analysis {
    /// Detect conflicts and advise exclusions on an already built tree.
    pub fn of_tree(tree: DependencyTree, config: &AnalyzerConfig) -> Self {
        let report = conflict::detect(&tree, config);
        let advice = exclusion::advise(&tree, &report);
        Self {
            tree,
            report,
            advice,
            input_warnings: Vec::new(),
        }
    }

    /// Build, detect and advise from the output of an input reader.
    pub fn from_output(output: ResolverOutput, config: &AnalyzerConfig) -> Result<Self, LensError> {
        let mut analysis = analyze(
            output.project,
            &output.project_version,
            output.records,
            config,
        )?;
        analysis.input_warnings = output.warnings;
        Ok(analysis)
    }

    /// Every warning, in the order the stages produced them.
    pub fn warnings(&self) -> impl Iterator<Item = &ParseWarning> {
        self.input_warnings
            .iter()
            .chain(self.tree.warnings())
            .chain(&self.report.warnings)
    }
}

/// Run the whole pipeline over pre-order records.
pub fn analyze<I>(
    project: Coordinate,
    version: &str,
    records: I,
    config: &AnalyzerConfig,
) -> Result<Analysis, LensError>
where
    I: IntoIterator<Item = ResolverRecord>,
{
    let tree = DependencyTree::build(project, version, records)?;
    Ok(Analysis::of_tree(tree, config))
}
