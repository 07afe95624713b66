//! Dependency tree reconstruction and traversal.
//!
//! Nodes live in a flat arena indexed by [`NodeId`]. Because records arrive
//! in pre-order and each becomes the next arena slot, arena order is also
//! traversal order: comparing two ids compares their declaration order.

use std::fmt;

use mvnlens_core::coordinate::Coordinate;
use mvnlens_core::record::{DependencyScope, RawState, ResolverRecord};
use mvnlens_core::warning::{ParseWarning, WarningKind};
use mvnlens_util::errors::LensError;

use crate::version::Version;

/// Index of a node in its tree's arena. Only meaningful for that tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The synthetic project root.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the dependency tree.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub coordinate: Coordinate,
    pub version: Version,
    pub scope: DependencyScope,
    /// 0 for the project root, 1 for its direct dependencies.
    pub depth: usize,
    pub raw_state: Option<RawState>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DependencyNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Declared in the project's own POM.
    pub fn declared_directly(&self) -> bool {
        self.depth == 1
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)?;
        if self.depth > 0 {
            write!(f, ":{}", self.scope)?;
        }
        Ok(())
    }
}

/// An immutable, fully linked dependency tree rooted at the project.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    nodes: Vec<DependencyNode>,
    warnings: Vec<ParseWarning>,
}

impl DependencyTree {
    /// Build a tree from pre-order records in one go.
    pub fn build<I>(project: Coordinate, version: &str, records: I) -> Result<Self, LensError>
    where
        I: IntoIterator<Item = ResolverRecord>,
    {
        let mut builder = TreeBuilder::new(project, version);
        for record in records {
            builder.push(record)?;
        }
        Ok(builder.finish())
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn project(&self) -> &DependencyNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &DependencyNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&DependencyNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Ancestors of `id`, nearest first, ending with the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Whether `ancestor` lies on the path from the root to `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Coordinates from the root down to the parent of `id`.
    pub fn source_path(&self, id: NodeId) -> Vec<&Coordinate> {
        let mut path: Vec<&Coordinate> = self
            .ancestors(id)
            .map(|a| &self.node(a).coordinate)
            .collect();
        path.reverse();
        path
    }

    /// The depth-1 node whose subtree contains `id` (possibly `id` itself).
    ///
    /// `None` for the root.
    pub fn direct_dependency_of(&self, id: NodeId) -> Option<NodeId> {
        if self.node(id).depth == 1 {
            return Some(id);
        }
        self.ancestors(id).find(|&a| self.node(a).depth == 1)
    }

    /// All non-root nodes in pre-order.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            tree: self,
            next: 1,
        }
    }

    /// Number of nodes (excluding root).
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arena size including the root; valid ids are `0..node_count()`.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Anomalies noticed while building.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Flatten back into pre-order records.
    pub fn to_records(&self) -> Vec<ResolverRecord> {
        self.iter()
            .map(|(_, node)| ResolverRecord {
                coordinate: node.coordinate.clone(),
                version: node.version.as_str().to_string(),
                scope: node.scope,
                depth: node.depth,
                raw_state: node.raw_state,
            })
            .collect()
    }
}

/// Iterator over ancestors, see [`DependencyTree::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    tree: &'a DependencyTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over non-root nodes, see [`DependencyTree::iter`].
#[derive(Clone)]
pub struct Nodes<'a> {
    tree: &'a DependencyTree,
    next: usize,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (NodeId, &'a DependencyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.nodes.get(self.next)?;
        let id = NodeId(self.next);
        self.next += 1;
        Some((id, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tree.nodes.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

/// Incremental tree construction from a stream of pre-order records.
///
/// A caller that loses interest midway simply drops the builder; nothing
/// is observable until [`TreeBuilder::finish`].
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<DependencyNode>,
    /// Current ancestor chain, root at the bottom.
    stack: Vec<NodeId>,
    position: usize,
    warnings: Vec<ParseWarning>,
}

impl TreeBuilder {
    pub fn new(project: Coordinate, version: &str) -> Self {
        let root = DependencyNode {
            coordinate: project,
            version: Version::parse(version),
            scope: DependencyScope::Compile,
            depth: 0,
            raw_state: None,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            stack: vec![NodeId::ROOT],
            position: 0,
            warnings: Vec::new(),
        }
    }

    /// Number of records accepted so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Attach the next record under the nearest shallower ancestor.
    ///
    /// Depth may drop by any amount but may only grow by one per record.
    pub fn push(&mut self, record: ResolverRecord) -> Result<NodeId, LensError> {
        if record.depth == 0 {
            return Err(self.structural(&record, "depth 0 is reserved for the project root"));
        }

        while let Some(&top) = self.stack.last() {
            if top != NodeId::ROOT && self.nodes[top.0].depth >= record.depth {
                self.stack.pop();
            } else {
                break;
            }
        }
        let parent = self.stack.last().copied().unwrap_or(NodeId::ROOT);
        let parent_depth = self.nodes[parent.0].depth;
        if parent_depth + 1 != record.depth {
            let message = format!(
                "no ancestor at depth {} (deepest open ancestor is at depth {parent_depth})",
                record.depth - 1
            );
            return Err(self.structural(&record, &message));
        }

        self.check(&record);

        let id = NodeId(self.nodes.len());
        self.nodes.push(DependencyNode {
            version: Version::parse(&record.version),
            coordinate: record.coordinate,
            scope: record.scope,
            depth: record.depth,
            raw_state: record.raw_state,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        self.stack.push(id);
        self.position += 1;
        Ok(id)
    }

    /// Seal the tree.
    pub fn finish(self) -> DependencyTree {
        tracing::debug!(
            "built dependency tree with {} nodes ({} warnings)",
            self.nodes.len() - 1,
            self.warnings.len()
        );
        DependencyTree {
            nodes: self.nodes,
            warnings: self.warnings,
        }
    }

    fn check(&mut self, record: &ResolverRecord) {
        if let Some(reason) = Version::unusual(&record.version) {
            let warning = ParseWarning::new(
                WarningKind::UnusualVersion,
                format!("{}: {reason} `{}`", record.coordinate, record.version),
            )
            .at(self.position);
            tracing::warn!("{warning}");
            self.warnings.push(warning);
        }
        if record.coordinate.is_malformed() {
            let warning = ParseWarning::new(
                WarningKind::MalformedCoordinate,
                format!("coordinate `{}` lacks a group or artifact id", record.coordinate),
            )
            .at(self.position);
            tracing::warn!("{warning}");
            self.warnings.push(warning);
        }
    }

    fn structural(&self, record: &ResolverRecord, message: &str) -> LensError {
        LensError::Structural {
            position: self.position,
            depth: record.depth,
            message: format!("{record}: {message}"),
        }
    }
}
