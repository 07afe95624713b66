//! Handler for `mvnlens conflicts`.

use miette::Result;
use mvnlens_analyzer::tree::NodeId;
use mvnlens_analyzer::Analysis;

pub fn exec(analysis: &Analysis, duplicates: bool, paths: bool) -> Result<()> {
    let tree = &analysis.tree;
    let report = &analysis.report;

    if !paths {
        print!("{}", report.display(tree));
        if report.conflict_count() == 0 {
            println!();
        }
    } else if report.conflict_count() == 0 {
        println!("No version conflicts.");
    } else {
        println!("Version conflicts ({}):", report.conflict_count());
        for group in report.conflicts() {
            let winner = tree.node(group.winner);
            println!("  {} resolved {}", group.key, winner.version);
            println!("    via {}", path_of(analysis, group.winner));
            for &loser in &group.losers {
                println!(
                    "    requested {} via {}",
                    tree.node(loser).version,
                    path_of(analysis, loser)
                );
            }
        }
    }

    if duplicates {
        let dups: Vec<_> = report.duplicates().collect();
        if dups.is_empty() {
            println!("No duplicated dependencies.");
        } else {
            println!("Duplicated dependencies ({}):", dups.len());
            for group in dups {
                println!(
                    "  {}:{} ({} paths)",
                    group.key,
                    group.winning_version(tree),
                    group.nodes().len()
                );
            }
        }
    }

    Ok(())
}

/// `direct > ... > node`, without the project itself.
fn path_of(analysis: &Analysis, id: NodeId) -> String {
    analysis
        .tree
        .source_path(id)
        .iter()
        .skip(1)
        .map(|c| c.short_key())
        .chain(std::iter::once(
            analysis.tree.node(id).coordinate.short_key(),
        ))
        .collect::<Vec<_>>()
        .join(" > ")
}
