use std::path::PathBuf;

use thiserror::Error;

use crate::doclet::DocletKind;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("invalid doclet input: {0}")]
    Input(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("doclet `{longname}` has kind `{kind}`, which has no declaration mapping")]
    UnsupportedKind { kind: DocletKind, longname: String },
}
