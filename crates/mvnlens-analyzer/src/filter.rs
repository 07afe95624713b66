//! Read-only projections over a built tree for display.
//!
//! Every projection is a lazy iterator in tree order that can be cloned to
//! restart it; nothing here mutates the tree or the report.

use std::collections::BTreeMap;

use mvnlens_core::coordinate::Coordinate;
use mvnlens_core::record::DependencyScope;

use crate::conflict::{ConflictReport, GroupKind};
use crate::tree::{DependencyNode, DependencyTree, NodeId};
use crate::version::{Version, VersionRange};

/// Nodes whose coordinate has two or more competing versions.
pub fn conflicts_only<'a>(
    tree: &'a DependencyTree,
    report: &'a ConflictReport,
) -> impl Iterator<Item = (NodeId, &'a DependencyNode)> + Clone + 'a {
    of_kind(tree, report, GroupKind::Conflict)
}

/// Nodes whose coordinate is reached over several paths at one version.
pub fn duplicates_only<'a>(
    tree: &'a DependencyTree,
    report: &'a ConflictReport,
) -> impl Iterator<Item = (NodeId, &'a DependencyNode)> + Clone + 'a {
    of_kind(tree, report, GroupKind::Duplicate)
}

fn of_kind<'a>(
    tree: &'a DependencyTree,
    report: &'a ConflictReport,
    kind: GroupKind,
) -> impl Iterator<Item = (NodeId, &'a DependencyNode)> + Clone + 'a {
    tree.iter()
        .filter(move |(id, _)| report.group_of(*id).is_some_and(|g| g.kind == kind))
}

/// Nodes matching an arbitrary predicate.
pub fn search<'a, P>(
    tree: &'a DependencyTree,
    predicate: P,
) -> impl Iterator<Item = (NodeId, &'a DependencyNode)> + Clone + 'a
where
    P: Fn(&DependencyNode) -> bool + Clone + 'a,
{
    tree.iter().filter(move |(_, node)| predicate(node))
}

/// A text search as typed into a filter box.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring of `group:artifact:version`.
    pub text: Option<String>,
    pub scope: Option<DependencyScope>,
    pub versions: Option<VersionRange>,
}

impl SearchQuery {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_lowercase()),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_versions(mut self, range: VersionRange) -> Self {
        self.versions = Some(range);
        self
    }

    pub fn matches(&self, node: &DependencyNode) -> bool {
        if let Some(ref text) = self.text {
            let haystack = format!(
                "{}:{}:{}",
                node.coordinate.group_id, node.coordinate.artifact_id, node.version
            )
            .to_lowercase();
            if !haystack.contains(text.to_lowercase().as_str()) {
                return false;
            }
        }
        if self.scope.is_some_and(|s| s != node.scope) {
            return false;
        }
        if let Some(ref range) = self.versions {
            if !range.contains(&node.version) {
                return false;
            }
        }
        true
    }
}

/// Visibility mask for tree display: matches plus every ancestor, so each
/// match is shown with the path that leads to it. Indexed by `NodeId`.
pub fn with_ancestors<I>(tree: &DependencyTree, matches: I) -> Vec<bool>
where
    I: IntoIterator<Item = NodeId>,
{
    let mut visible = vec![false; tree.node_count()];
    visible[tree.root().index()] = true;
    for id in matches {
        if visible[id.index()] {
            continue;
        }
        visible[id.index()] = true;
        for ancestor in tree.ancestors(id) {
            if visible[ancestor.index()] && ancestor != tree.root() {
                break;
            }
            visible[ancestor.index()] = true;
        }
    }
    visible
}

/// One row of the flat artifact list.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactEntry {
    pub coordinate: Coordinate,
    /// Every requested version, ascending, without repeats.
    pub requested: Vec<Version>,
    /// The version the mediation kept.
    pub resolved: Version,
    pub occurrences: usize,
    /// Whether the report holds a conflict group for this coordinate.
    /// Scopes the analyzer config leaves out never make one.
    pub conflict: bool,
}

impl ArtifactEntry {
    pub fn has_conflict(&self) -> bool {
        self.conflict
    }
}

/// All artifacts in the tree, sorted by coordinate.
pub fn artifact_list(tree: &DependencyTree, report: &ConflictReport) -> Vec<ArtifactEntry> {
    let mut entries: BTreeMap<&Coordinate, ArtifactEntry> = BTreeMap::new();
    for (id, node) in tree.iter() {
        let entry = entries
            .entry(&node.coordinate)
            .or_insert_with(|| ArtifactEntry {
                coordinate: node.coordinate.clone(),
                requested: Vec::new(),
                resolved: node.version.clone(),
                occurrences: 0,
                conflict: false,
            });
        entry.occurrences += 1;
        if !entry.requested.contains(&node.version) {
            entry.requested.push(node.version.clone());
        }
        if let Some(group) = report.group_of(id) {
            entry.conflict |= group.is_conflict();
            if group.winner == id {
                entry.resolved = node.version.clone();
            }
        }
    }
    entries
        .into_values()
        .map(|mut entry| {
            entry.requested.sort();
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use mvnlens_core::config::AnalyzerConfig;
    use mvnlens_core::record::ResolverRecord;

    use super::*;
    use crate::conflict::detect;

    fn rec(group: &str, artifact: &str, version: &str, depth: usize) -> ResolverRecord {
        ResolverRecord::new(Coordinate::new(group, artifact), version, depth)
    }

    fn sample() -> (DependencyTree, ConflictReport) {
        let tree = DependencyTree::build(
            Coordinate::new("com.example", "app"),
            "1.0",
            vec![
                rec("com.y", "app", "1.0", 1),
                rec("com.x", "lib", "2.0", 2),
                rec("org.log", "log", "1.2", 2),
                rec("com.x", "lib", "1.0", 1),
                rec("com.z", "other", "1.0", 1),
                rec("org.log", "log", "1.2", 2),
                rec("org.t", "junit", "4.13", 1).with_scope(DependencyScope::Test),
            ],
        )
        .unwrap();
        let report = detect(&tree, &AnalyzerConfig::default());
        (tree, report)
    }

    fn names<'a>(it: impl Iterator<Item = (NodeId, &'a DependencyNode)>) -> Vec<String> {
        it.map(|(_, n)| format!("{}:{}", n.coordinate.artifact_id, n.version))
            .collect()
    }

    #[test]
    fn conflicts_only_in_tree_order() {
        let (tree, report) = sample();
        assert_eq!(names(conflicts_only(&tree, &report)), ["lib:2.0", "lib:1.0"]);
    }

    #[test]
    fn duplicates_only_in_tree_order() {
        let (tree, report) = sample();
        assert_eq!(names(duplicates_only(&tree, &report)), ["log:1.2", "log:1.2"]);
    }

    #[test]
    fn projections_are_restartable() {
        let (tree, report) = sample();
        let it = conflicts_only(&tree, &report);
        assert_eq!(it.clone().count(), 2);
        assert_eq!(it.count(), 2);
    }

    #[test]
    fn search_by_predicate() {
        let (tree, _) = sample();
        let hits = search(&tree, |n| n.depth == 1);
        assert_eq!(hits.count(), 4);
    }

    #[test]
    fn search_query_text_is_case_insensitive() {
        let (tree, _) = sample();
        let query = SearchQuery::text("COM.X:LIB:1");
        assert_eq!(names(search(&tree, move |n| query.matches(n))), ["lib:1.0"]);
    }

    #[test]
    fn search_query_scope_and_range() {
        let (tree, _) = sample();
        let tests = SearchQuery::default().with_scope(DependencyScope::Test);
        assert_eq!(names(search(&tree, move |n| tests.matches(n))), ["junit:4.13"]);

        let range = SearchQuery::text("lib").with_versions(VersionRange::parse("[1.5,)").unwrap());
        assert_eq!(names(search(&tree, move |n| range.matches(n))), ["lib:2.0"]);
    }

    #[test]
    fn ancestors_made_visible() {
        let (tree, report) = sample();
        let hits: Vec<NodeId> = conflicts_only(&tree, &report).map(|(id, _)| id).collect();
        let visible = with_ancestors(&tree, hits);
        let shown: Vec<String> = tree
            .iter()
            .filter(|(id, _)| visible[id.index()])
            .map(|(_, n)| n.coordinate.artifact_id.clone())
            .collect();
        assert_eq!(shown, ["app", "lib", "lib"]);
        assert!(visible[tree.root().index()]);
    }

    #[test]
    fn flat_artifact_list() {
        let (tree, report) = sample();
        let list = artifact_list(&tree, &report);
        let lib = list
            .iter()
            .find(|e| e.coordinate.artifact_id == "lib")
            .unwrap();
        assert!(lib.has_conflict());
        assert_eq!(lib.resolved.as_str(), "1.0");
        let requested: Vec<&str> = lib.requested.iter().map(|v| v.as_str()).collect();
        assert_eq!(requested, ["1.0", "2.0"]);

        let log = list
            .iter()
            .find(|e| e.coordinate.artifact_id == "log")
            .unwrap();
        assert!(!log.has_conflict());
        assert_eq!(log.occurrences, 2);

        let keys: Vec<String> = list.iter().map(|e| e.coordinate.short_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn artifact_list_follows_config_scopes() {
        let tree = DependencyTree::build(
            Coordinate::new("com.example", "app"),
            "1.0",
            vec![
                rec("com.x", "lib", "1.0", 1),
                rec("org.t", "junit", "4.13", 1).with_scope(DependencyScope::Test),
                rec("com.x", "lib", "2.0", 2).with_scope(DependencyScope::Test),
            ],
        )
        .unwrap();
        let config = AnalyzerConfig {
            include_test_scope: false,
            ..AnalyzerConfig::default()
        };
        let report = detect(&tree, &config);
        assert_eq!(report.conflict_count(), 0);

        let list = artifact_list(&tree, &report);
        let lib = list
            .iter()
            .find(|e| e.coordinate.artifact_id == "lib")
            .unwrap();
        assert!(!lib.has_conflict());
        assert_eq!(lib.requested.len(), 2);
        assert_eq!(lib.occurrences, 2);

        let report = detect(&tree, &AnalyzerConfig::default());
        let list = artifact_list(&tree, &report);
        assert!(list.iter().any(|e| e.has_conflict()));
    }
}
