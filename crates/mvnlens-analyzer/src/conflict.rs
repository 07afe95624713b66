//! Conflict detection under Maven's nearest-wins mediation.

use std::collections::HashMap;
use std::fmt;

use mvnlens_core::config::AnalyzerConfig;
use mvnlens_core::coordinate::Coordinate;
use mvnlens_core::record::RawState;
use mvnlens_core::warning::{ParseWarning, WarningKind};

use crate::tree::{DependencyTree, NodeId};
use crate::version::Version;

/// The detector's verdict on a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolutionState {
    #[default]
    Included,
    /// Same coordinate and version as the node that was kept.
    OmittedDuplicate,
    /// A different version than the mediated winner.
    OmittedConflictLoser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Two or more distinct versions requested.
    Conflict,
    /// One version reached over several paths; informational.
    Duplicate,
}

/// All nodes of a group requesting one particular version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionBucket {
    pub version: Version,
    pub nodes: Vec<NodeId>,
}

/// Every occurrence of one coordinate in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictGroup {
    pub key: Coordinate,
    pub kind: GroupKind,
    /// Distinct versions in first-seen order.
    pub versions: Vec<VersionBucket>,
    pub winner: NodeId,
    /// Nodes whose version differs from the winner's, in tree order.
    pub losers: Vec<NodeId>,
    /// Other nodes carrying the winner's version, in tree order.
    pub duplicates: Vec<NodeId>,
    /// The key lacks a group or artifact id.
    pub malformed: bool,
}

impl ConflictGroup {
    pub fn is_conflict(&self) -> bool {
        self.kind == GroupKind::Conflict
    }

    /// All member nodes in tree order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut all: Vec<NodeId> = self
            .versions
            .iter()
            .flat_map(|b| b.nodes.iter().copied())
            .collect();
        all.sort();
        all
    }

    pub fn winning_version<'t>(&self, tree: &'t DependencyTree) -> &'t Version {
        &tree.node(self.winner).version
    }
}

/// Result of [`detect`]: groups plus a per-node verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictReport {
    pub groups: Vec<ConflictGroup>,
    states: Vec<ResolutionState>,
    membership: Vec<Option<usize>>,
    pub warnings: Vec<ParseWarning>,
}

impl ConflictReport {
    /// Verdict for `id`; nodes outside any group are `Included`.
    pub fn state(&self, id: NodeId) -> ResolutionState {
        self.states.get(id.index()).copied().unwrap_or_default()
    }

    /// The group `id` belongs to, if its coordinate occurs more than once.
    pub fn group_of(&self, id: NodeId) -> Option<&ConflictGroup> {
        let index = (*self.membership.get(id.index())?)?;
        self.groups.get(index)
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &ConflictGroup> + Clone {
        self.groups.iter().filter(|g| g.kind == GroupKind::Conflict)
    }

    pub fn duplicates(&self) -> impl Iterator<Item = &ConflictGroup> + Clone {
        self.groups.iter().filter(|g| g.kind == GroupKind::Duplicate)
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts().count()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Render the conflict groups against the tree they came from.
    pub fn display<'a>(&'a self, tree: &'a DependencyTree) -> ReportDisplay<'a> {
        ReportDisplay { report: self, tree }
    }
}

/// Detect conflicting and duplicated coordinates in `tree`.
///
/// Pure: running it twice on the same tree gives equal reports.
pub fn detect(tree: &DependencyTree, config: &AnalyzerConfig) -> ConflictReport {
    let mut order: Vec<Coordinate> = Vec::new();
    let mut buckets: HashMap<&Coordinate, Vec<Member>> = HashMap::new();
    let mut first_exact: HashMap<(&Coordinate, &Version), NodeId> = HashMap::new();
    let mut warnings = Vec::new();

    for (id, node) in tree.iter() {
        if !config.participates(node.scope) {
            continue;
        }

        let key = (&node.coordinate, &node.version);
        let verified_duplicate = match node.raw_state {
            Some(RawState::OmittedForDuplicate) => match first_exact.get(&key) {
                Some(&first) if !tree.is_ancestor(first, id) => true,
                _ => {
                    let warning = ParseWarning::new(
                        WarningKind::UnverifiedHint,
                        format!(
                            "{node} is marked omitted-for-duplicate but no earlier occurrence exists on another path"
                        ),
                    );
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                    false
                }
            },
            _ => false,
        };
        first_exact.entry(key).or_insert(id);

        let members = buckets.entry(&node.coordinate).or_insert_with(|| {
            order.push(node.coordinate.clone());
            Vec::new()
        });
        members.push(Member {
            id,
            verified_duplicate,
        });
    }

    let mut report = ConflictReport {
        groups: Vec::new(),
        states: vec![ResolutionState::Included; tree.node_count()],
        membership: vec![None; tree.node_count()],
        warnings,
    };

    for key in order {
        let Some(members) = buckets.get(&key) else {
            continue;
        };
        if members.len() < 2 {
            continue;
        }
        let group = mediate(tree, key, members);

        if group.malformed {
            let warning = ParseWarning::new(
                WarningKind::MalformedCoordinate,
                format!("grouping `{}` by its raw key", group.key),
            );
            tracing::warn!("{warning}");
            report.warnings.push(warning);
        }

        let index = report.groups.len();
        for id in group.nodes() {
            report.membership[id.index()] = Some(index);
        }
        for &id in &group.duplicates {
            report.states[id.index()] = ResolutionState::OmittedDuplicate;
        }
        for &id in &group.losers {
            report.states[id.index()] = ResolutionState::OmittedConflictLoser;
        }
        report.groups.push(group);
    }

    tracing::debug!(
        "detected {} conflicts and {} duplicates",
        report.conflict_count(),
        report.groups.len() - report.conflict_count()
    );
    report
}

#[derive(Debug, Clone, Copy)]
struct Member {
    id: NodeId,
    /// The resolver's duplicate hint checked out; never a winner.
    verified_duplicate: bool,
}

fn mediate(tree: &DependencyTree, key: Coordinate, members: &[Member]) -> ConflictGroup {
    let mut versions: Vec<VersionBucket> = Vec::new();
    for member in members {
        let version = &tree.node(member.id).version;
        match versions.iter_mut().find(|b| &b.version == version) {
            Some(bucket) => bucket.nodes.push(member.id),
            None => versions.push(VersionBucket {
                version: version.clone(),
                nodes: vec![member.id],
            }),
        }
    }

    let kind = if versions.len() > 1 {
        GroupKind::Conflict
    } else {
        GroupKind::Duplicate
    };

    // Nearest wins; ids follow pre-order, so the id breaks depth ties by
    // declaration order. Duplicates only keep the first occurrence.
    let candidates = members.iter().filter(|m| !m.verified_duplicate);
    let winner = match kind {
        GroupKind::Conflict => candidates.min_by_key(|m| (tree.node(m.id).depth, m.id)),
        GroupKind::Duplicate => candidates.min_by_key(|m| m.id),
    }
    .map(|m| m.id)
    .unwrap_or(members[0].id);

    let winner_node = tree.node(winner);
    let (mut losers, mut duplicates) = (Vec::new(), Vec::new());
    for member in members.iter().filter(|m| m.id != winner) {
        let node = tree.node(member.id);
        debug_assert!(
            kind == GroupKind::Duplicate
                || member.verified_duplicate
                || (node.depth, member.id) > (winner_node.depth, winner),
            "mediation must pick the nearest, earliest node"
        );
        if node.version == winner_node.version {
            duplicates.push(member.id);
        } else {
            losers.push(member.id);
        }
    }

    ConflictGroup {
        malformed: key.is_malformed(),
        key,
        kind,
        versions,
        winner,
        losers,
        duplicates,
    }
}

/// Text rendering of a [`ConflictReport`], see [`ConflictReport::display`].
pub struct ReportDisplay<'a> {
    report: &'a ConflictReport,
    tree: &'a DependencyTree,
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conflicts: Vec<&ConflictGroup> = self.report.conflicts().collect();
        if conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", conflicts.len())?;
        for group in conflicts {
            let winner = self.tree.node(group.winner);
            let marker = if group.malformed { " [malformed]" } else { "" };
            writeln!(f, "  {}{marker} resolved {}", group.key, winner.version)?;
            for &loser in &group.losers {
                let node = self.tree.node(loser);
                writeln!(
                    f,
                    "    requested {} (nearest wins: depth {} vs {})",
                    node.version, winner.depth, node.depth
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mvnlens_core::record::{DependencyScope, ResolverRecord};

    use super::*;

    fn rec(group: &str, artifact: &str, version: &str, depth: usize) -> ResolverRecord {
        ResolverRecord::new(Coordinate::new(group, artifact), version, depth)
    }

    fn build(records: Vec<ResolverRecord>) -> DependencyTree {
        DependencyTree::build(Coordinate::new("com.example", "app"), "1.0", records).unwrap()
    }

    #[test]
    fn empty_tree_has_no_groups() {
        let tree = build(Vec::new());
        let report = detect(&tree, &AnalyzerConfig::default());
        assert!(report.is_empty());
        assert_eq!(report.display(&tree).to_string(), "No version conflicts.");
    }

    #[test]
    fn single_occurrence_is_not_grouped() {
        let tree = build(vec![rec("org.a", "a", "1.0", 1)]);
        let report = detect(&tree, &AnalyzerConfig::default());
        assert!(report.is_empty());
        assert_eq!(report.state(NodeId::ROOT), ResolutionState::Included);
    }

    #[test]
    fn nearer_lower_version_wins() {
        let tree = build(vec![
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "2.0", 2),
            rec("com.x", "lib", "1.0", 1),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        let group = &report.groups[0];
        assert!(group.is_conflict());
        assert_eq!(group.winning_version(&tree).as_str(), "1.0");
        assert_eq!(group.losers.len(), 1);
        assert_eq!(
            report.state(group.losers[0]),
            ResolutionState::OmittedConflictLoser
        );
        assert_eq!(report.state(group.winner), ResolutionState::Included);
    }

    #[test]
    fn equal_depth_first_declared_wins() {
        let tree = build(vec![
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "1.0", 2),
            rec("org.b", "b", "1.0", 1),
            rec("com.x", "lib", "3.0", 2),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        assert_eq!(report.groups[0].winning_version(&tree).as_str(), "1.0");
    }

    #[test]
    fn equivalent_version_strings_are_one_version() {
        let tree = build(vec![
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "1.0", 2),
            rec("org.b", "b", "1.0", 1),
            rec("com.x", "lib", "1", 2),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        assert_eq!(report.groups[0].kind, GroupKind::Duplicate);
    }

    #[test]
    fn same_version_in_conflict_group_is_duplicate_not_loser() {
        let tree = build(vec![
            rec("com.x", "lib", "1.0", 1),
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "1.0", 2),
            rec("com.x", "lib", "2.0", 2),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        let group = &report.groups[0];
        assert_eq!(group.duplicates.len(), 1);
        assert_eq!(group.losers.len(), 1);
        assert_eq!(
            report.state(group.duplicates[0]),
            ResolutionState::OmittedDuplicate
        );
    }

    #[test]
    fn test_scope_excluded_when_configured() {
        let tree = build(vec![
            rec("com.x", "lib", "1.0", 1),
            rec("com.x", "lib", "2.0", 1).with_scope(DependencyScope::Test),
        ]);
        let config = AnalyzerConfig {
            include_test_scope: false,
            ..AnalyzerConfig::default()
        };
        assert!(detect(&tree, &config).is_empty());
        assert_eq!(detect(&tree, &AnalyzerConfig::default()).len(), 1);
    }

    #[test]
    fn provided_scope_excluded_when_configured() {
        let tree = build(vec![
            rec("com.x", "lib", "1.0", 1).with_scope(DependencyScope::Provided),
            rec("com.x", "lib", "2.0", 1),
        ]);
        let config = AnalyzerConfig {
            treat_provided_as_conflicting: false,
            ..AnalyzerConfig::default()
        };
        assert!(detect(&tree, &config).is_empty());
    }

    #[test]
    fn verified_duplicate_hint_never_wins() {
        let tree = build(vec![
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "2.0", 2),
            rec("com.x", "lib", "1.0", 1),
            rec("org.b", "b", "1.0", 1),
            rec("com.x", "lib", "2.0", 2).with_raw_state(RawState::OmittedForDuplicate),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        assert!(report.warnings.is_empty());
        let group = &report.groups[0];
        assert_eq!(tree.node(group.winner).depth, 1);
        assert_eq!(group.losers.len(), 2);
    }

    #[test]
    fn unverified_duplicate_hint_is_ignored_with_warning() {
        let tree = build(vec![
            rec("com.x", "lib", "1.0", 1).with_raw_state(RawState::OmittedForDuplicate),
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "2.0", 2),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::UnverifiedHint);
        assert_eq!(report.groups[0].winning_version(&tree).as_str(), "1.0");
    }

    #[test]
    fn malformed_coordinates_still_grouped() {
        let tree = build(vec![rec("", "lib", "1.0", 1), rec("", "lib", "2.0", 1)]);
        let report = detect(&tree, &AnalyzerConfig::default());
        assert_eq!(report.len(), 1);
        assert!(report.groups[0].malformed);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::MalformedCoordinate));
    }

    #[test]
    fn group_membership_lookup() {
        let tree = build(vec![
            rec("com.x", "lib", "1.0", 1),
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "2.0", 2),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        let ids: Vec<NodeId> = tree.iter().map(|(id, _)| id).collect();
        assert!(report.group_of(ids[0]).is_some());
        assert!(report.group_of(ids[1]).is_none());
        assert_eq!(report.group_of(ids[2]).map(|g| g.winner), Some(ids[0]));
    }

    #[test]
    fn report_display() {
        let tree = build(vec![
            rec("com.x", "lib", "1.0", 1),
            rec("org.a", "a", "1.0", 1),
            rec("com.x", "lib", "2.0", 2),
        ]);
        let report = detect(&tree, &AnalyzerConfig::default());
        let s = report.display(&tree).to_string();
        assert!(s.contains("Version conflicts (1):"));
        assert!(s.contains("com.x:lib:jar resolved 1.0"));
        assert!(s.contains("requested 2.0 (nearest wins: depth 1 vs 2)"));
    }
}
