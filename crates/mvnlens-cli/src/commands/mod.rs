//! Command dispatch and handler modules.

mod conflicts;
mod exclusions;
mod list;
mod tree;

use std::path::Path;
use std::sync::Arc;

use miette::Result;
use mvnlens_analyzer::input;
use mvnlens_analyzer::session::{AnalysisSession, BuildOutcome};
use mvnlens_analyzer::Analysis;
use mvnlens_core::config::AnalyzerConfig;
use mvnlens_util::errors::LensError;
use mvnlens_util::fs::find_ancestor_with;
use mvnlens_util::progress::{status, status_warn};
use tokio::sync::mpsc;

use crate::cli::{AnalysisArgs, Cli, Command};

const CONFIG_FILE: &str = "mvnlens.toml";

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let args = cli.analysis;
    match cli.command {
        Command::Conflicts {
            input,
            duplicates,
            paths,
        } => {
            let analysis = load(&input, &args, cli.verbose).await?;
            conflicts::exec(&analysis, duplicates, paths)
        }
        Command::Exclusions { input, xml, pom } => {
            let analysis = load(&input, &args, cli.verbose).await?;
            exclusions::exec(&analysis, xml, pom.as_deref())
        }
        Command::Tree {
            input,
            conflicts,
            duplicates,
            search,
            scope,
            version_range,
            depth,
            why,
        } => {
            let analysis = load(&input, &args, cli.verbose).await?;
            let opts = tree::TreeOptions {
                conflicts,
                duplicates,
                search,
                scope,
                version_range,
                depth,
                why,
            };
            tree::exec(&analysis, &opts)
        }
        Command::List { input, conflicts } => {
            let analysis = load(&input, &args, cli.verbose).await?;
            list::exec(&analysis, conflicts)
        }
    }
}

/// Resolve the analyzer config: explicit `--config`, else the nearest
/// `mvnlens.toml` above the working directory, then flag overrides.
fn resolve_config(args: &AnalysisArgs) -> Result<AnalyzerConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            if !path.is_file() {
                return Err(LensError::Config {
                    message: format!("config file {} does not exist", path.display()),
                }
                .into());
            }
            AnalyzerConfig::load(path)?
        }
        None => {
            let cwd = std::env::current_dir().map_err(LensError::Io)?;
            match find_ancestor_with(&cwd, CONFIG_FILE) {
                Some(dir) => AnalyzerConfig::load(&dir.join(CONFIG_FILE))?,
                None => AnalyzerConfig::default(),
            }
        }
    };
    if args.no_test_scope {
        config.include_test_scope = false;
    }
    if args.ignore_provided {
        config.treat_provided_as_conflicting = false;
    }
    Ok(config)
}

/// Read `path` and analyze it, streaming the records through a session.
async fn load(path: &Path, args: &AnalysisArgs, verbose: bool) -> Result<Arc<Analysis>> {
    let config = resolve_config(args)?;
    tracing::debug!("analyzer config: {config:?}");
    let output = input::load(path)?;
    if verbose {
        status("Analyzing", &format!("{} ({} records)", path.display(), output.records.len()));
    }
    for warning in &output.warnings {
        status_warn("warning", &warning.to_string());
    }

    let session = AnalysisSession::new(config);
    let (tx, rx) = mpsc::channel(64);
    let records = output.records;
    let producer = tokio::spawn(async move {
        for record in records {
            if tx.send(record).await.is_err() {
                break;
            }
        }
    });

    let outcome = session
        .rebuild(output.project, &output.project_version, rx)
        .await?;
    producer.await.map_err(|e| LensError::Task {
        message: e.to_string(),
    })?;

    let analysis = match outcome {
        BuildOutcome::Published(analysis) => analysis,
        BuildOutcome::Superseded => {
            return Err(LensError::Task {
                message: "analysis was superseded".to_string(),
            }
            .into())
        }
    };

    for warning in analysis.tree.warnings().iter().chain(&analysis.report.warnings) {
        status_warn("warning", &warning.to_string());
    }
    Ok(analysis)
}
