//! Handler for `mvnlens exclusions`.

use std::path::Path;

use miette::Result;
use mvnlens_analyzer::exclusion::Unresolved;
use mvnlens_analyzer::pom::DeclaredExclusions;
use mvnlens_analyzer::Analysis;
use mvnlens_util::fs::read_text;
use mvnlens_util::progress::{status_info, status_warn};

pub fn exec(analysis: &Analysis, xml: bool, pom: Option<&Path>) -> Result<()> {
    let mut advice = analysis.advice.clone();
    if let Some(pom) = pom {
        let declared = DeclaredExclusions::from_pom_xml(&read_text(pom)?)?;
        let before = advice.suggestions.len();
        advice = advice.without_declared(&declared);
        let skipped = before - advice.suggestions.len();
        if skipped > 0 {
            status_info(
                "Skipped",
                &format!("{skipped} exclusions already declared in {}", pom.display()),
            );
        }
    }

    if advice.suggestions.is_empty() {
        println!("No exclusions needed.");
    }

    for (direct, exclusions) in advice.by_direct_dependency() {
        if xml {
            println!("<!-- {} -->", direct.short_key());
            println!("<exclusions>");
            for suggestion in advice
                .suggestions
                .iter()
                .filter(|s| &s.direct_coordinate == direct)
            {
                for line in suggestion.to_xml().lines() {
                    println!("    {line}");
                }
            }
            println!("</exclusions>");
        } else {
            println!("{}", direct.short_key());
            for exclusion in exclusions {
                println!("    exclude {exclusion}");
            }
        }
    }

    let tree = &analysis.tree;
    for unresolved in &advice.unresolved {
        let loser = tree.node(unresolved.loser());
        let message = match *unresolved {
            Unresolved::ConflictingDirectDependencies { winner, .. } => format!(
                "{}:{} is declared directly next to {}; align the versions instead",
                loser.coordinate.short_key(),
                loser.version,
                tree.node(winner).version
            ),
            Unresolved::SharedDirectDependency { direct, .. } => format!(
                "{}:{} comes through {} like the winning version; use dependency management",
                loser.coordinate.short_key(),
                loser.version,
                tree.node(direct).coordinate.short_key()
            ),
        };
        status_warn("unresolved", &message);
    }

    Ok(())
}
