//! Exclusion suggestions for conflict losers.
//!
//! Maven declares `<exclusions>` on the project's own (depth-1) dependencies
//! and matches them by `groupId:artifactId` only, so every suggestion names
//! a direct dependency and a version-less artifact.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use mvnlens_core::coordinate::{Coordinate, Exclusion};
use quick_xml::escape::escape;

use crate::conflict::ConflictReport;
use crate::pom::DeclaredExclusions;
use crate::tree::{DependencyTree, NodeId};

/// Exclude `excluded` from `direct_coordinate` to drop `loser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSuggestion {
    /// First loser (in tree order) that produced this suggestion.
    pub loser: NodeId,
    pub direct_dependency: NodeId,
    pub direct_coordinate: Coordinate,
    pub excluded: Exclusion,
}

impl ExclusionSuggestion {
    /// The `<exclusion>` element to paste into the direct dependency.
    pub fn to_xml(&self) -> String {
        format!(
            "<exclusion>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n</exclusion>",
            escape(self.excluded.group_id.as_str()),
            escape(self.excluded.artifact_id.as_str()),
        )
    }
}

impl fmt::Display for ExclusionSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exclude {} from {}",
            self.excluded,
            self.direct_coordinate.short_key()
        )
    }
}

/// A loser that exclusions cannot remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// The loser is itself declared in the project next to the winner;
    /// only a version change fixes it.
    ConflictingDirectDependencies { loser: NodeId, winner: NodeId },
    /// Loser and winner come through the same direct dependency, so
    /// excluding the artifact there would drop the winner as well.
    SharedDirectDependency { loser: NodeId, direct: NodeId },
}

impl Unresolved {
    pub fn loser(&self) -> NodeId {
        match *self {
            Unresolved::ConflictingDirectDependencies { loser, .. }
            | Unresolved::SharedDirectDependency { loser, .. } => loser,
        }
    }
}

/// Output of [`advise`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionAdvice {
    pub suggestions: Vec<ExclusionSuggestion>,
    pub unresolved: Vec<Unresolved>,
}

impl ExclusionAdvice {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty() && self.unresolved.is_empty()
    }

    /// Suggestions grouped by the direct dependency they apply to.
    pub fn by_direct_dependency(&self) -> BTreeMap<&Coordinate, Vec<&Exclusion>> {
        let mut grouped: BTreeMap<&Coordinate, Vec<&Exclusion>> = BTreeMap::new();
        for suggestion in &self.suggestions {
            grouped
                .entry(&suggestion.direct_coordinate)
                .or_default()
                .push(&suggestion.excluded);
        }
        grouped
    }

    /// Drop suggestions the project's POM already declares.
    pub fn without_declared(mut self, declared: &DeclaredExclusions) -> Self {
        self.suggestions
            .retain(|s| !declared.excludes(&s.direct_coordinate, &s.excluded));
        self
    }
}

/// Suggest exclusions for every conflict loser in `report`.
///
/// One suggestion per (direct dependency, excluded artifact) pair.
pub fn advise(tree: &DependencyTree, report: &ConflictReport) -> ExclusionAdvice {
    let mut advice = ExclusionAdvice::default();
    let mut seen: HashSet<(Coordinate, Exclusion)> = HashSet::new();

    for group in report.conflicts() {
        let winner_direct = tree.direct_dependency_of(group.winner);

        for &loser in &group.losers {
            let Some(direct) = tree.direct_dependency_of(loser) else {
                continue;
            };

            if direct == loser {
                advice.unresolved.push(Unresolved::ConflictingDirectDependencies {
                    loser,
                    winner: group.winner,
                });
                continue;
            }
            if Some(direct) == winner_direct {
                advice
                    .unresolved
                    .push(Unresolved::SharedDirectDependency { loser, direct });
                continue;
            }

            let direct_coordinate = tree.node(direct).coordinate.clone();
            let excluded = tree.node(loser).coordinate.exclusion();
            if seen.insert((direct_coordinate.clone(), excluded.clone())) {
                advice.suggestions.push(ExclusionSuggestion {
                    loser,
                    direct_dependency: direct,
                    direct_coordinate,
                    excluded,
                });
            }
        }
    }

    tracing::debug!(
        "suggested {} exclusions ({} losers unresolvable by exclusion)",
        advice.suggestions.len(),
        advice.unresolved.len()
    );
    advice
}
