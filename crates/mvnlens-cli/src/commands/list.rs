//! Handler for `mvnlens list`.

use console::Style;
use miette::Result;
use mvnlens_analyzer::filter::artifact_list;
use mvnlens_analyzer::Analysis;

pub fn exec(analysis: &Analysis, conflicts_only: bool) -> Result<()> {
    let entries: Vec<_> = artifact_list(&analysis.tree, &analysis.report)
        .into_iter()
        .filter(|e| !conflicts_only || e.has_conflict())
        .collect();

    if entries.is_empty() {
        println!("No dependencies.");
        return Ok(());
    }

    let conflict = Style::new().yellow();
    for entry in entries {
        let key = entry.coordinate.to_string();
        if entry.has_conflict() {
            let requested: Vec<&str> = entry.requested.iter().map(|v| v.as_str()).collect();
            println!(
                "{key}:{} {}",
                entry.resolved,
                conflict.apply_to(format!("(requested {})", requested.join(", ")))
            );
        } else if entry.occurrences > 1 {
            println!("{key}:{} ({} paths)", entry.resolved, entry.occurrences);
        } else {
            println!("{key}:{}", entry.resolved);
        }
    }
    Ok(())
}
