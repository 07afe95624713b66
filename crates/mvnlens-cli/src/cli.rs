//! CLI argument definitions for mvnlens.
//!
//! Uses `clap` derive macros. Each command corresponds to a handler in the
//! [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mvnlens_analyzer::version::VersionRange;
use mvnlens_core::record::DependencyScope;

#[derive(Parser, Debug)]
#[command(
    name = "mvnlens",
    version,
    about = "Find Maven dependency version conflicts and the exclusions that fix them",
    long_about = "mvnlens reads resolver output (a JSON record list or the text of \
                  `mvn dependency:tree -Dverbose`), reconstructs the dependency tree, applies \
                  Maven's nearest-wins mediation and suggests <exclusions> for losing versions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Options shared by every command that runs an analysis.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Config file (defaults to the nearest mvnlens.toml)
    #[arg(long, global = true, env = "MVNLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Leave test-scoped dependencies out of conflict detection
    #[arg(long, global = true)]
    pub no_test_scope: bool,

    /// Leave provided-scoped dependencies out of conflict detection
    #[arg(long, global = true)]
    pub ignore_provided: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List version conflicts and the version Maven picks
    Conflicts {
        /// Resolver output: .json records or dependency:tree text
        input: PathBuf,
        /// Also list artifacts reached over several paths at one version
        #[arg(long)]
        duplicates: bool,
        /// Show the path leading to each losing version
        #[arg(long)]
        paths: bool,
    },

    /// Suggest <exclusions> that remove losing versions
    Exclusions {
        /// Resolver output: .json records or dependency:tree text
        input: PathBuf,
        /// Print pasteable <exclusion> XML
        #[arg(long)]
        xml: bool,
        /// Skip exclusions this pom.xml already declares
        #[arg(long)]
        pom: Option<PathBuf>,
    },

    /// Display the dependency tree
    Tree {
        /// Resolver output: .json records or dependency:tree text
        input: PathBuf,
        /// Only show conflicting artifacts and their paths
        #[arg(long, conflicts_with_all = ["duplicates", "search"])]
        conflicts: bool,
        /// Only show duplicated artifacts and their paths
        #[arg(long, conflicts_with = "search")]
        duplicates: bool,
        /// Only show artifacts whose group:artifact:version contains this text
        #[arg(long)]
        search: Option<String>,
        /// Restrict --search to one scope
        #[arg(long, value_parser = parse_scope, requires = "search")]
        scope: Option<DependencyScope>,
        /// Restrict --search to a version range such as [1.0,2.0)
        #[arg(long, value_parser = parse_range, requires = "search")]
        version_range: Option<VersionRange>,
        /// Maximum depth
        #[arg(long)]
        depth: Option<usize>,
        /// Explain how a dependency (group:artifact) is reached
        #[arg(long)]
        why: Option<String>,
    },

    /// Flat list of artifacts with requested and resolved versions
    List {
        /// Resolver output: .json records or dependency:tree text
        input: PathBuf,
        /// Only list artifacts with competing versions
        #[arg(long)]
        conflicts: bool,
    },
}

fn parse_scope(s: &str) -> Result<DependencyScope, String> {
    s.parse()
}

fn parse_range(s: &str) -> Result<VersionRange, String> {
    VersionRange::parse(s).ok_or_else(|| format!("`{s}` is not a version range"))
}

pub fn parse() -> Cli {
    Cli::parse()
}
