//! Text rendering of a dependency tree, optionally annotated with the
//! detector's verdicts.

use std::fmt;

use crate::conflict::{ConflictReport, ResolutionState};
use crate::tree::{DependencyTree, NodeId};

/// Box-drawing renderer for a [`DependencyTree`].
///
/// ```text
/// com.example:app:jar:1.0
/// ├── com.y:app:jar:1.0:compile
/// │   └── com.x:lib:jar:2.0:compile (omitted for conflict with 1.0)
/// └── com.x:lib:jar:1.0:compile
/// ```
#[derive(Clone, Copy)]
pub struct TreeRenderer<'a> {
    tree: &'a DependencyTree,
    report: Option<&'a ConflictReport>,
    max_depth: Option<usize>,
    visible: Option<&'a [bool]>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(tree: &'a DependencyTree) -> Self {
        Self {
            tree,
            report: None,
            max_depth: None,
            visible: None,
        }
    }

    /// Annotate omitted nodes with the reason they were omitted.
    pub fn with_report(mut self, report: &'a ConflictReport) -> Self {
        self.report = Some(report);
        self
    }

    /// Stop descending below `depth` (1 shows direct dependencies only).
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Only render nodes whose entry in `visible` is set, see
    /// [`crate::filter::with_ancestors`].
    pub fn only(mut self, visible: &'a [bool]) -> Self {
        self.visible = Some(visible);
        self
    }

    fn is_visible(&self, id: NodeId) -> bool {
        self.visible
            .map_or(true, |mask| mask.get(id.index()).copied().unwrap_or(false))
    }

    fn annotation(&self, id: NodeId) -> Option<String> {
        let report = self.report?;
        match report.state(id) {
            ResolutionState::Included => None,
            ResolutionState::OmittedDuplicate => Some("omitted for duplicate".to_string()),
            ResolutionState::OmittedConflictLoser => {
                let group = report.group_of(id)?;
                Some(format!(
                    "omitted for conflict with {}",
                    group.winning_version(self.tree)
                ))
            }
        }
    }

    fn write_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let connector = if is_last { "└── " } else { "├── " };
        let node = self.tree.node(id);
        write!(f, "{prefix}{connector}{node}")?;
        if let Some(note) = self.annotation(id) {
            write!(f, " ({note})")?;
        }
        writeln!(f)?;

        if self.max_depth.is_some_and(|max| node.depth >= max) {
            return Ok(());
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        self.write_children(f, id, &child_prefix)
    }

    fn write_children(&self, f: &mut fmt::Formatter<'_>, id: NodeId, prefix: &str) -> fmt::Result {
        let children: Vec<NodeId> = self
            .tree
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_visible(child))
            .collect();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.write_subtree(f, child, prefix, i + 1 == count)?;
        }
        Ok(())
    }
}

impl fmt::Display for TreeRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.tree.project())?;
        if self.max_depth == Some(0) {
            return Ok(());
        }
        self.write_children(f, self.tree.root(), "")
    }
}
