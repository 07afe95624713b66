//! Right-aligned status lines on stderr, so stdout stays clean for reports.
//!
//! ```text
//!    Analyzing deps.txt (42 records)
//!      Skipped 2 exclusions already declared in pom.xml
//!      warning line 7: cannot read dependency `garbage`
//!   unresolved com.x:lib:1.0 is declared directly next to 2.0; align the versions instead
//! ```

use std::io::Write;

use console::Style;

const LABEL_WIDTH: usize = 12;

/// What a status line reports; picks the label colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Work being done, in bold green.
    Action,
    /// Something skipped or noted, in bold cyan.
    Info,
    /// Degraded input or advice that needs a human, in bold yellow.
    Warning,
}

impl Status {
    fn style(self) -> Style {
        let style = Style::new().for_stderr().bold();
        match self {
            Status::Action => style.green(),
            Status::Info => style.cyan(),
            Status::Warning => style.yellow(),
        }
    }
}

/// Render one status line without the trailing newline.
pub fn format_status(kind: Status, label: &str, message: &str) -> String {
    format!("{:>LABEL_WIDTH$} {message}", kind.style().apply_to(label))
}

fn emit(kind: Status, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", format_status(kind, label, message));
}

/// `   Analyzing deps.txt (42 records)`
pub fn status(label: &str, message: &str) {
    emit(Status::Action, label, message);
}

pub fn status_info(label: &str, message: &str) {
    emit(Status::Info, label, message);
}

/// Input anomalies and exclusions that cannot fix a conflict.
pub fn status_warn(label: &str, message: &str) {
    emit(Status::Warning, label, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(kind: Status, label: &str, message: &str) -> String {
        console::strip_ansi_codes(&format_status(kind, label, message)).into_owned()
    }

    #[test]
    fn labels_are_right_aligned() {
        assert_eq!(
            plain(Status::Action, "Analyzing", "deps.txt (3 records)"),
            "   Analyzing deps.txt (3 records)"
        );
        assert_eq!(
            plain(Status::Warning, "warning", "record 1: empty version"),
            "     warning record 1: empty version"
        );
    }

    #[test]
    fn long_labels_are_not_truncated() {
        let line = plain(Status::Info, "already-declared", "com.x:lib");
        assert_eq!(line, "already-declared com.x:lib");
    }
}
