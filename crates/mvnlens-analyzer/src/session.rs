//! Long-lived analysis state for callers that rebuild repeatedly.
//!
//! Records are streamed in over a channel. Each rebuild takes a new
//! generation number; a build that notices a newer generation stops and
//! drops everything it built. Only finished analyses are ever published.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mvnlens_core::config::AnalyzerConfig;
use mvnlens_core::coordinate::Coordinate;
use mvnlens_core::record::ResolverRecord;
use mvnlens_util::errors::LensError;
use tokio::sync::{mpsc, RwLock};

use crate::tree::TreeBuilder;
use crate::{conflict, exclusion, Analysis};

/// What happened to a rebuild.
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// The analysis is now the session's current one.
    Published(Arc<Analysis>),
    /// A newer rebuild started first; nothing was published.
    Superseded,
}

impl BuildOutcome {
    pub fn analysis(&self) -> Option<&Arc<Analysis>> {
        match self {
            BuildOutcome::Published(analysis) => Some(analysis),
            BuildOutcome::Superseded => None,
        }
    }
}

pub struct AnalysisSession {
    config: AnalyzerConfig,
    generation: Arc<AtomicU64>,
    current: RwLock<Option<Arc<Analysis>>>,
}

impl AnalysisSession {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            generation: Arc::new(AtomicU64::new(0)),
            current: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The most recently published analysis.
    pub async fn current(&self) -> Option<Arc<Analysis>> {
        self.current.read().await.clone()
    }

    /// Start a rebuild from `records`, superseding any rebuild in flight.
    ///
    /// The generation is taken when this is called, not when the returned
    /// future is first polled. A structural error leaves the current
    /// analysis untouched.
    pub fn rebuild(
        &self,
        project: Coordinate,
        version: &str,
        mut records: mpsc::Receiver<ResolverRecord>,
    ) -> impl Future<Output = Result<BuildOutcome, LensError>> + '_ {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut builder = TreeBuilder::new(project, version);

        async move {
            while let Some(record) = records.recv().await {
                if self.is_stale(generation) {
                    tracing::debug!(
                        "build {generation} superseded after {} records",
                        builder.position()
                    );
                    return Ok(BuildOutcome::Superseded);
                }
                builder.push(record)?;
            }

            let config = self.config;
            let latest = Arc::clone(&self.generation);
            let analysis = tokio::task::spawn_blocking(move || {
                let tree = builder.finish();
                let report = conflict::detect(&tree, &config);
                if latest.load(Ordering::SeqCst) != generation {
                    return None;
                }
                let advice = exclusion::advise(&tree, &report);
                Some(Analysis {
                    tree,
                    report,
                    advice,
                    input_warnings: Vec::new(),
                })
            })
            .await
            .map_err(|e| LensError::Task {
                message: e.to_string(),
            })?;

            let Some(analysis) = analysis else {
                tracing::debug!("build {generation} superseded during detection");
                return Ok(BuildOutcome::Superseded);
            };

            let mut current = self.current.write().await;
            if self.is_stale(generation) {
                tracing::debug!("build {generation} superseded before publishing");
                return Ok(BuildOutcome::Superseded);
            }
            let analysis = Arc::new(analysis);
            *current = Some(Arc::clone(&analysis));
            tracing::debug!("published build {generation}");
            Ok(BuildOutcome::Published(analysis))
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(group: &str, artifact: &str, version: &str, depth: usize) -> ResolverRecord {
        ResolverRecord::new(Coordinate::new(group, artifact), version, depth)
    }

    fn project() -> Coordinate {
        Coordinate::new("com.example", "app")
    }

    async fn feed(records: Vec<ResolverRecord>) -> mpsc::Receiver<ResolverRecord> {
        let (tx, rx) = mpsc::channel(records.len().max(1));
        for record in records {
            tx.send(record).await.unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn publishes_finished_analysis() {
        let session = AnalysisSession::new(AnalyzerConfig::default());
        assert!(session.current().await.is_none());

        let rx = feed(vec![
            rec("com.x", "lib", "1.0", 1),
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "2.0", 2),
        ])
        .await;
        let outcome = session.rebuild(project(), "1.0", rx).await.unwrap();
        let published = outcome.analysis().unwrap();
        assert_eq!(published.report.conflict_count(), 1);

        let current = session.current().await.unwrap();
        assert!(Arc::ptr_eq(&current, published));
    }

    #[tokio::test]
    async fn structural_error_keeps_previous_analysis() {
        let session = AnalysisSession::new(AnalyzerConfig::default());
        let rx = feed(vec![rec("org.a", "a", "1.0", 1)]).await;
        session.rebuild(project(), "1.0", rx).await.unwrap();

        let rx = feed(vec![rec("org.a", "a", "1.0", 1), rec("org.b", "b", "1.0", 3)]).await;
        let err = session.rebuild(project(), "1.0", rx).await.unwrap_err();
        assert!(err.is_structural());

        let current = session.current().await.unwrap();
        assert_eq!(current.tree.len(), 1);
    }

    #[tokio::test]
    async fn newer_rebuild_supersedes_older() {
        let session = AnalysisSession::new(AnalyzerConfig::default());

        let (tx_old, rx_old) = mpsc::channel(4);
        let older = session.rebuild(project(), "1.0", rx_old);
        let (tx_new, rx_new) = mpsc::channel(4);
        let newer = session.rebuild(project(), "2.0", rx_new);

        tx_old.send(rec("org.a", "a", "1.0", 1)).await.unwrap();
        drop(tx_old);
        tx_new.send(rec("org.b", "b", "1.0", 1)).await.unwrap();
        drop(tx_new);

        let (older, newer) = tokio::join!(older, newer);
        assert!(matches!(older.unwrap(), BuildOutcome::Superseded));
        assert!(newer.unwrap().analysis().is_some());

        let current = session.current().await.unwrap();
        assert_eq!(current.tree.project().version.as_str(), "2.0");
    }

    #[tokio::test]
    async fn empty_stream_publishes_empty_tree() {
        let session = AnalysisSession::new(AnalyzerConfig::default());
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let outcome = session.rebuild(project(), "1.0", rx).await.unwrap();
        let analysis = outcome.analysis().unwrap();
        assert!(analysis.tree.is_empty());
        assert!(analysis.report.is_empty());
    }
}
