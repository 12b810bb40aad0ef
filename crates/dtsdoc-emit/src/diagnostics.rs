//! Integrity warnings collected during a run.
//!
//! Warnings never stop output generation. Each one is kept in the
//! [`Diagnostics`] sink for the caller and logged through `tracing`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A `memberof` reference names no known doclet.
    UnresolvedParent,
    /// Attaching a node would create a cycle or a second parent.
    CyclicMembership,
    /// A synthesized child is not valid inside its container.
    InvalidChild,
    /// A documented type expression failed to parse.
    TypeSyntax,
}

impl WarningKind {
    fn label(&self) -> &'static str {
        match self {
            WarningKind::UnresolvedParent => "unresolved parent",
            WarningKind::CyclicMembership => "cyclic membership",
            WarningKind::InvalidChild => "invalid child",
            WarningKind::TypeSyntax => "type syntax",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single non-fatal warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Per-run warning sink.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, "{message}");
        self.warnings.push(Warning { kind, message });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Forget the warnings of a previous run.
    pub fn clear(&mut self) {
        self.warnings.clear();
    }

    /// Render the warnings as a markdown report.
    pub fn report(&self) -> String {
        let mut content = String::new();
        content.push_str("# dtsdoc report\n\n");
        if self.warnings.is_empty() {
            content.push_str("No warnings.\n");
        } else {
            content.push_str("## Warnings\n\n");
            for w in &self.warnings {
                content.push_str("- **");
                content.push_str(w.kind.label());
                content.push_str("**: ");
                content.push_str(&w.message);
                content.push('\n');
            }
        }
        content
    }

    /// Write the report next to `output_path` as `<stem>.dts-report.md`.
    pub fn write_report(&self, output_path: &Path) -> std::io::Result<PathBuf> {
        let report_path = report_path(output_path);
        fs::write(&report_path, self.report())?;
        Ok(report_path)
    }
}

/// `types/index.d.ts` reports to `types/index.dts-report.md`.
pub fn report_path(output_path: &Path) -> PathBuf {
    let file_name = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(".d.ts")
        .or_else(|| file_name.strip_suffix(".ts"))
        .unwrap_or(&file_name);
    output_path.with_file_name(format!("{stem}.dts-report.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_clear() {
        let mut diags = Diagnostics::new();
        diags.warn(WarningKind::UnresolvedParent, "no parent `Nope`");
        diags.warn(WarningKind::TypeSyntax, "bad type `Array.<`");
        diags.warn(WarningKind::UnresolvedParent, "no parent `Gone`");
        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count(WarningKind::UnresolvedParent), 2);
        diags.clear();
        assert!(diags.is_empty());
    }

    #[test]
    fn test_report_contents() {
        let mut diags = Diagnostics::new();
        assert!(diags.report().contains("No warnings."));

        diags.warn(WarningKind::InvalidChild, "dropped `x` from class `Foo`");
        let report = diags.report();
        assert!(report.contains("## Warnings"), "report:\n{report}");
        assert!(
            report.contains("- **invalid child**: dropped `x` from class `Foo`"),
            "report:\n{report}"
        );
    }

    #[test]
    fn test_report_path() {
        assert_eq!(
            report_path(Path::new("types/index.d.ts")),
            PathBuf::from("types/index.dts-report.md")
        );
        assert_eq!(
            report_path(Path::new("out/api.txt")),
            PathBuf::from("out/api.txt.dts-report.md")
        );
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let diags = Diagnostics::new();
        let written = diags.write_report(&dir.path().join("lib.d.ts")).unwrap();
        assert_eq!(written, dir.path().join("lib.dts-report.md"));
        let content = fs::read_to_string(written).unwrap();
        assert!(content.starts_with("# dtsdoc report"));
    }
}
