//! Doclet tree building and TypeScript declaration synthesis.
//!
//! The pipeline is filter, link, synthesize, print:
//!
//! ```no_run
//! use dtsdoc_emit::{Diagnostics, Doclet, EmitOptions, generate};
//!
//! let json = std::fs::read_to_string("doclets.json")?;
//! let docs = Doclet::parse_list(&json)?;
//! let mut diags = Diagnostics::new();
//! let dts = generate(&docs, &EmitOptions::default(), &mut diags)?;
//! print!("{dts}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod comment;
mod diagnostics;
mod doclet;
mod emitter;
mod error;
mod options;
mod props;
mod publish;
mod resolve;
mod synth;
mod tree;

pub use diagnostics::{Diagnostics, Warning, WarningKind, report_path};
pub use doclet::{
    DocCode, DocMeta, DocParam, DocReturn, DocTag, DocType, Doclet, DocletKind, Scope, UnknownKind,
};
pub use emitter::Emitter;
pub use error::EmitError;
pub use options::{AccessLevel, Destination, EmitOptions};
pub use publish::{DEFAULT_OUT_FILE, PublishOutcome, output_file_name, publish};
pub use synth::Declaration;
pub use tree::{
    DocletTree, MergeKind, NodeId, TreeNode, interface_merge_key, namespace_merge_key,
};

/// Generate `.d.ts` text for `docs` without writing it anywhere.
pub fn generate(
    docs: &[Doclet],
    options: &EmitOptions,
    diags: &mut Diagnostics,
) -> Result<String, EmitError> {
    let mut emitter = Emitter::new(options);
    emitter.parse(docs, diags)?;
    Ok(emitter.emit())
}
