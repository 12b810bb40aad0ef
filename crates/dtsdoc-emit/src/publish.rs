//! Writing the generated declarations to their destination.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::doclet::{Doclet, DocletKind};
use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::options::{Destination, EmitOptions};

/// File name used when neither `out_file` nor a package doclet names one.
pub const DEFAULT_OUT_FILE: &str = "types.d.ts";

/// What a publish run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// The written file; `None` when printed to the console.
    pub path: Option<PathBuf>,
    /// Number of top-level declarations.
    pub declarations: usize,
}

/// Generate declarations for `docs` and write them to the configured
/// destination. Console output goes to `console`.
///
/// Undocumented doclets are dropped before the tree is built, and `diags`
/// is cleared so it only holds this run's warnings.
pub fn publish<W: Write>(
    docs: &[Doclet],
    options: &EmitOptions,
    diags: &mut Diagnostics,
    console: &mut W,
) -> Result<PublishOutcome, EmitError> {
    diags.clear();

    let documented: Vec<Doclet> = docs.iter().filter(|d| !d.undocumented).cloned().collect();
    debug!(
        total = docs.len(),
        documented = documented.len(),
        "filtered undocumented doclets"
    );

    let mut emitter = Emitter::new(options);
    emitter.parse(&documented, diags)?;
    let output = emitter.emit();
    let declarations = emitter.results().len();

    match &options.destination {
        Destination::Console => {
            writeln!(console, "{output}").map_err(|source| EmitError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
            Ok(PublishOutcome {
                path: None,
                declarations,
            })
        }
        Destination::Directory(dir) => {
            fs::create_dir_all(dir).map_err(|source| EmitError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = dir.join(output_file_name(docs, options));
            fs::write(&path, output).map_err(|source| EmitError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), declarations, "wrote declarations");
            Ok(PublishOutcome {
                path: Some(path),
                declarations,
            })
        }
    }
}

/// `out_file`, else `<package name>.d.ts`, else [`DEFAULT_OUT_FILE`].
///
/// Scoped package names keep their last segment: `@scope/pkg` gives
/// `pkg.d.ts`.
pub fn output_file_name(docs: &[Doclet], options: &EmitOptions) -> String {
    if let Some(out_file) = options.out_file.as_deref().filter(|f| !f.is_empty()) {
        return out_file.to_string();
    }
    docs.iter()
        .find(|d| d.kind == DocletKind::Package)
        .and_then(|package| package.name.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(|name| format!("{name}.d.ts"))
        .unwrap_or_else(|| DEFAULT_OUT_FILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str) -> Doclet {
        Doclet::new(DocletKind::Package, name, format!("package:{name}"))
    }

    #[test]
    fn test_output_file_name() {
        let options = EmitOptions::default();
        assert_eq!(output_file_name(&[], &options), "types.d.ts");
        assert_eq!(output_file_name(&[package("@acme/widgets")], &options), "widgets.d.ts");
        assert_eq!(output_file_name(&[package("")], &options), "types.d.ts");

        let explicit = EmitOptions {
            out_file: Some("index.d.ts".to_string()),
            ..EmitOptions::default()
        };
        assert_eq!(output_file_name(&[package("acme")], &explicit), "index.d.ts");
    }

    #[test]
    fn test_publish_to_console() {
        let options = EmitOptions {
            destination: Destination::Console,
            ..EmitOptions::default()
        };
        let mut diags = Diagnostics::new();
        let mut console = Vec::new();
        let outcome = publish(
            &[Doclet::new(DocletKind::Function, "run", "run")],
            &options,
            &mut diags,
            &mut console,
        )
        .unwrap();

        assert_eq!(outcome.path, None);
        assert_eq!(outcome.declarations, 1);
        let text = String::from_utf8(console).unwrap();
        assert!(text.starts_with("declare function run(): void;\n"), "output:\n{text}");
    }

    #[test]
    fn test_publish_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/types");
        let options = EmitOptions {
            destination: Destination::Directory(target.clone()),
            ..EmitOptions::default()
        };
        let mut diags = Diagnostics::new();
        let docs = vec![package("demo"), Doclet::new(DocletKind::Function, "run", "run")];

        let outcome = publish(&docs, &options, &mut diags, &mut std::io::sink()).unwrap();
        let path = outcome.path.unwrap();
        assert_eq!(path, target.join("demo.d.ts"));
        assert!(fs::read_to_string(&path).unwrap().contains("declare function run"));

        // An existing directory is fine.
        publish(&docs, &options, &mut diags, &mut std::io::sink()).unwrap();
    }

    #[test]
    fn test_undocumented_doclets_skipped_and_diagnostics_reset() {
        let options = EmitOptions {
            destination: Destination::Console,
            ..EmitOptions::default()
        };
        let mut hidden = Doclet::new(DocletKind::Function, "hidden", "hidden");
        hidden.undocumented = true;
        let mut orphan = Doclet::new(DocletKind::Function, "orphan", "Nope.orphan");
        orphan.memberof = Some("Nope".to_string());

        let mut diags = Diagnostics::new();
        let mut console = Vec::new();
        let outcome = publish(&[hidden, orphan.clone()], &options, &mut diags, &mut console).unwrap();
        assert_eq!(outcome.declarations, 0);
        assert_eq!(diags.len(), 1);

        publish(&[orphan], &options, &mut diags, &mut Vec::new()).unwrap();
        assert_eq!(diags.len(), 1, "warnings from the previous run were kept");
    }
}
