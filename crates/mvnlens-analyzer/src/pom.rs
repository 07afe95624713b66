//! Exclusions already declared on a project's direct dependencies.
//!
//! Only `<project><dependencies><dependency>` entries are read; managed
//! dependencies do not declare exclusions for the project itself.

use std::collections::BTreeMap;

use mvnlens_core::coordinate::{Coordinate, Exclusion};
use mvnlens_util::errors::LensError;
use quick_xml::events::Event;
use quick_xml::Reader;

const DEPENDENCY: &str = "project>dependencies>dependency";
const EXCLUSION: &str = "project>dependencies>dependency>exclusions>exclusion";

/// `groupId:artifactId` of each direct dependency mapped to its exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredExclusions {
    by_dependency: BTreeMap<String, Vec<Exclusion>>,
}

impl DeclaredExclusions {
    /// Read the `<exclusions>` of every direct dependency in a POM.
    pub fn from_pom_xml(xml: &str) -> Result<Self, LensError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut declared = Self::default();
        let mut path: Vec<String> = Vec::new();
        let mut text_buf = String::new();

        let mut dep_key: (String, String) = Default::default();
        let mut dep_exclusions: Vec<Exclusion> = Vec::new();
        let mut excl: (String, String) = Default::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                    text_buf.clear();
                    match path.join(">").as_str() {
                        DEPENDENCY => {
                            dep_key = Default::default();
                            dep_exclusions.clear();
                        }
                        EXCLUSION => excl = Default::default(),
                        _ => {}
                    }
                }
                Ok(Event::Text(ref e)) => {
                    text_buf = e.unescape().unwrap_or_default().to_string();
                }
                Ok(Event::End(_)) => {
                    let ctx = path.join(">");
                    match ctx.strip_prefix(DEPENDENCY) {
                        Some(">groupId") => dep_key.0 = text_buf.clone(),
                        Some(">artifactId") => dep_key.1 = text_buf.clone(),
                        Some(">exclusions>exclusion>groupId") => excl.0 = text_buf.clone(),
                        Some(">exclusions>exclusion>artifactId") => excl.1 = text_buf.clone(),
                        Some(">exclusions>exclusion") => {
                            let (group_id, artifact_id) = std::mem::take(&mut excl);
                            dep_exclusions.push(Exclusion {
                                group_id,
                                artifact_id: if artifact_id.is_empty() {
                                    "*".to_string()
                                } else {
                                    artifact_id
                                },
                            });
                        }
                        Some("") => {
                            let key = format!("{}:{}", dep_key.0, dep_key.1);
                            declared
                                .by_dependency
                                .entry(key)
                                .or_default()
                                .append(&mut dep_exclusions);
                        }
                        _ => {}
                    }
                    path.pop();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(LensError::Pom {
                        message: format!(
                            "XML parse error at position {}: {e}",
                            reader.buffer_position()
                        ),
                    })
                }
                _ => {}
            }
        }

        Ok(declared)
    }

    /// Whether `direct` already excludes `exclusion` (wildcards honoured).
    pub fn excludes(&self, direct: &Coordinate, exclusion: &Exclusion) -> bool {
        let target = Coordinate::new(
            exclusion.group_id.as_str(),
            exclusion.artifact_id.as_str(),
        );
        self.by_dependency
            .get(&direct.short_key())
            .is_some_and(|declared| declared.iter().any(|d| d.matches(&target)))
    }

    /// Exclusions declared on `direct`, if it is declared at all.
    pub fn get(&self, direct: &Coordinate) -> Option<&[Exclusion]> {
        self.by_dependency
            .get(&direct.short_key())
            .map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.by_dependency.values().all(|v| v.is_empty())
    }
}
