//! Handler for `mvnlens tree`.

use miette::Result;
use mvnlens_analyzer::filter::{self, SearchQuery};
use mvnlens_analyzer::render::TreeRenderer;
use mvnlens_analyzer::tree::NodeId;
use mvnlens_analyzer::version::VersionRange;
use mvnlens_analyzer::Analysis;
use mvnlens_core::coordinate::Exclusion;
use mvnlens_core::record::DependencyScope;

/// Options for `mvnlens tree`.
#[derive(Default)]
pub struct TreeOptions {
    pub conflicts: bool,
    pub duplicates: bool,
    pub search: Option<String>,
    pub scope: Option<DependencyScope>,
    pub version_range: Option<VersionRange>,
    pub depth: Option<usize>,
    /// Show every path to a `group:artifact` instead of the tree.
    pub why: Option<String>,
}

pub fn exec(analysis: &Analysis, opts: &TreeOptions) -> Result<()> {
    let tree = &analysis.tree;
    let report = &analysis.report;

    if let Some(ref target) = opts.why {
        return why(analysis, target);
    }

    let matches: Option<Vec<NodeId>> = if opts.conflicts {
        Some(filter::conflicts_only(tree, report).map(|(id, _)| id).collect())
    } else if opts.duplicates {
        Some(filter::duplicates_only(tree, report).map(|(id, _)| id).collect())
    } else if let Some(ref text) = opts.search {
        let mut query = SearchQuery::text(text);
        if let Some(scope) = opts.scope {
            query = query.with_scope(scope);
        }
        if let Some(ref range) = opts.version_range {
            query = query.with_versions(range.clone());
        }
        Some(
            filter::search(tree, move |node| query.matches(node))
                .map(|(id, _)| id)
                .collect(),
        )
    } else {
        None
    };

    let renderer = TreeRenderer::new(tree)
        .with_report(report)
        .max_depth(opts.depth);

    match matches {
        Some(ids) if ids.is_empty() => println!("No matching dependencies."),
        Some(ids) => {
            let visible = filter::with_ancestors(tree, ids);
            print!("{}", renderer.only(&visible));
        }
        None => print!("{renderer}"),
    }
    Ok(())
}

fn why(analysis: &Analysis, target: &str) -> Result<()> {
    let tree = &analysis.tree;
    let Some(wanted) = Exclusion::parse(target) else {
        println!("Dependency '{target}' is not of the form group:artifact.");
        return Ok(());
    };

    let hits: Vec<NodeId> = filter::search(tree, move |node| wanted.matches(&node.coordinate))
        .map(|(id, _)| id)
        .collect();
    if hits.is_empty() {
        println!("Dependency '{target}' not found in the tree.");
        return Ok(());
    }

    for id in hits {
        let node = tree.node(id);
        println!("Path to {}:{}:", node.coordinate.short_key(), node.version);
        let path = tree.source_path(id);
        for (i, coordinate) in path.iter().enumerate() {
            println!("{}{}", "  ".repeat(i), coordinate.short_key());
        }
        println!("{}{node}", "  ".repeat(path.len()));
    }
    Ok(())
}
