//! Readers for resolver output.
//!
//! Two formats are understood: a JSON document of pre-order records, and the
//! text printed by `mvn dependency:tree -Dverbose`.

use std::path::Path;

use mvnlens_core::coordinate::Coordinate;
use mvnlens_core::record::{DependencyScope, RawState, ResolverRecord};
use mvnlens_core::warning::{ParseWarning, WarningKind};
use mvnlens_util::errors::LensError;
use serde::Deserialize;

/// Project and records read from one input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOutput {
    pub project: Coordinate,
    pub project_version: String,
    pub records: Vec<ResolverRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Stand-in root for JSON input that does not name its project.
const UNNAMED_GROUP: &str = "local";
const UNNAMED_ARTIFACT: &str = "project";
const UNNAMED_VERSION: &str = "unspecified";

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsDocument {
    Bare(Vec<ResolverRecord>),
    Wrapped {
        #[serde(default)]
        project: Option<ProjectRef>,
        records: Vec<ResolverRecord>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRef {
    #[serde(flatten)]
    coordinate: Coordinate,
    version: String,
}

/// Read resolver records from JSON.
///
/// Accepts either a bare array of records or an object with an optional
/// `project` (`groupId`, `artifactId`, `version`) and a `records` array.
pub fn parse_records_json(json: &str) -> Result<ResolverOutput, LensError> {
    let document: RecordsDocument = serde_json::from_str(json).map_err(|e| LensError::Input {
        message: format!("invalid resolver records: {e}"),
    })?;
    let (project, records) = match document {
        RecordsDocument::Bare(records) => (None, records),
        RecordsDocument::Wrapped { project, records } => (project, records),
    };
    let (project, project_version) = match project {
        Some(p) => (p.coordinate, p.version),
        None => (
            Coordinate::new(UNNAMED_GROUP, UNNAMED_ARTIFACT),
            UNNAMED_VERSION.to_string(),
        ),
    };
    tracing::debug!("read {} records from JSON", records.len());
    Ok(ResolverOutput {
        project,
        project_version,
        records,
        warnings: Vec::new(),
    })
}

/// Read the text tree printed by `mvn dependency:tree -Dverbose`.
///
/// Log prefixes like `[INFO] ` are stripped. Lines before the project line
/// are ignored, and the first line that is not part of the tree ends it, so
/// only the first module of a multi-module build is read.
pub fn parse_dependency_tree(text: &str) -> Result<ResolverOutput, LensError> {
    let mut lines = text.lines().enumerate().map(|(n, l)| (n, strip_log_prefix(l)));

    let (project, project_version) = lines
        .by_ref()
        .find_map(|(_, line)| parse_project_line(line))
        .ok_or_else(|| LensError::Input {
            message: "no project line found in dependency tree output".to_string(),
        })?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (line_no, line) in lines {
        let Some((depth, entry)) = split_indent(line) else {
            break;
        };
        match parse_entry(entry) {
            Ok((record, warning)) => {
                if let Some(warning) = warning {
                    let warning = warning.at_line(line_no);
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                }
                records.push(ResolverRecord { depth, ..record });
            }
            Err(message) => {
                let warning =
                    ParseWarning::new(WarningKind::UnreadableLine, message).at_line(line_no);
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    tracing::debug!(
        "read {} records for {project}:{project_version} from dependency tree text",
        records.len()
    );
    Ok(ResolverOutput {
        project,
        project_version,
        records,
        warnings,
    })
}

/// Read `path`, choosing the format by extension (`.json` or tree text).
///
/// Bytes that are not UTF-8 are replaced rather than rejected; the versions
/// they land in are reported as unusual once the tree is built.
pub fn load(path: &Path) -> Result<ResolverOutput, LensError> {
    let (content, replaced) = mvnlens_util::fs::read_text_lossy(path)?;
    if replaced {
        tracing::warn!("{} contains bytes that are not UTF-8", path.display());
    }
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_records_json(&content)
    } else {
        parse_dependency_tree(&content)
    }
}

fn strip_log_prefix(line: &str) -> &str {
    let line = line.trim_end();
    if line.starts_with('[') {
        if let Some(end) = line.find("] ") {
            return &line[end + 2..];
        }
    }
    line
}

/// `g:a:type:version` or `g:a:type:classifier:version`, no indentation.
fn parse_project_line(line: &str) -> Option<(Coordinate, String)> {
    if line.is_empty() || line.contains(' ') {
        return None;
    }
    let parts: Vec<&str> = line.split(':').collect();
    let (coordinate, version) = match parts.as_slice() {
        [g, a, t, v] => (Coordinate::new(*g, *a).with_type(*t), *v),
        [g, a, t, c, v] => (Coordinate::new(*g, *a).with_type(*t).with_classifier(*c), *v),
        _ => return None,
    };
    if coordinate.is_malformed() {
        return None;
    }
    Some((coordinate, version.to_string()))
}

/// Split tree-drawing indentation off a line; depth is the number of
/// three-character columns up to and including the connector.
fn split_indent(line: &str) -> Option<(usize, &str)> {
    let mut rest = line;
    let mut depth = 0;
    loop {
        let column = rest.get(..3)?;
        rest = &rest[3..];
        depth += 1;
        match column {
            "+- " | "\\- " => return Some((depth, rest)),
            "|  " | "   " => continue,
            _ => return None,
        }
    }
}

/// One dependency entry, without indentation:
/// `g:a:type[:classifier]:version:scope [annotations]` or, for omitted
/// nodes, `(g:a:type:version:scope - omitted for duplicate)`.
fn parse_entry(entry: &str) -> Result<(ResolverRecord, Option<ParseWarning>), String> {
    let (body, note) = match entry.strip_prefix('(') {
        Some(inner) => {
            let inner = inner.strip_suffix(')').unwrap_or(inner);
            match inner.split_once(" - ") {
                Some((body, note)) => (body, Some(note)),
                None => (inner, None),
            }
        }
        None => (entry, None),
    };

    let token = body.split_whitespace().next().unwrap_or_default();
    let parts: Vec<&str> = token.split(':').collect();
    let (coordinate, version, scope) = match parts.as_slice() {
        [g, a, t, v, s] => (Coordinate::new(*g, *a).with_type(*t), *v, *s),
        [g, a, t, c, v, s] => (
            Coordinate::new(*g, *a).with_type(*t).with_classifier(*c),
            *v,
            *s,
        ),
        _ => return Err(format!("cannot read dependency `{entry}`")),
    };

    let mut warning = None;
    let scope = scope.parse::<DependencyScope>().unwrap_or_else(|e| {
        warning = Some(ParseWarning::new(
            WarningKind::UnknownScope,
            format!("{coordinate}:{version}: {e}, treating as compile"),
        ));
        DependencyScope::Compile
    });

    let raw_state = match note {
        Some(note) if note.contains("omitted for duplicate") => Some(RawState::OmittedForDuplicate),
        Some(note) if note.contains("omitted for conflict") => Some(RawState::OmittedForConflict),
        Some(_) | None if entry.starts_with('(') => None,
        _ => Some(RawState::Included),
    };

    let record = ResolverRecord {
        coordinate,
        version: version.to_string(),
        scope,
        depth: 0,
        raw_state,
    };
    Ok((record, warning))
}
