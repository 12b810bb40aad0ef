//! Run options for the emitter.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::doclet::{Doclet, DocletKind};

/// Documented access level, ordered `private < package < protected < public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    Package,
    Protected,
    Public,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Private => write!(f, "private"),
            AccessLevel::Package => write!(f, "package"),
            AccessLevel::Protected => write!(f, "protected"),
            AccessLevel::Public => write!(f, "public"),
        }
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(AccessLevel::Private),
            "package" => Ok(AccessLevel::Package),
            "protected" => Ok(AccessLevel::Protected),
            "public" => Ok(AccessLevel::Public),
            other => Err(format!(
                "invalid access level `{other}` (expected private, package, protected or public)"
            )),
        }
    }
}

/// Where the generated declarations go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Destination {
    /// Standard output.
    Console,
    /// A directory, created on demand.
    Directory(PathBuf),
}

impl Destination {
    /// The sentinel destination value selecting the console.
    pub const CONSOLE: &'static str = "console";
}

impl Default for Destination {
    fn default() -> Self {
        Destination::Directory(PathBuf::from("out"))
    }
}

impl From<String> for Destination {
    fn from(value: String) -> Self {
        if value == Destination::CONSOLE {
            Destination::Console
        } else {
            Destination::Directory(PathBuf::from(value))
        }
    }
}

impl From<&str> for Destination {
    fn from(value: &str) -> Self {
        Destination::from(value.to_string())
    }
}

/// Options controlling what is emitted and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Minimum access level kept.
    pub access: AccessLevel,
    /// Keep `private` doclets regardless of `access`.
    pub private: bool,
    pub destination: Destination,
    /// Explicit output file name inside `destination`.
    pub out_file: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            access: AccessLevel::Package,
            private: false,
            destination: Destination::default(),
            out_file: None,
        }
    }
}

impl EmitOptions {
    /// Whether a doclet survives filtering and enters the tree.
    pub fn keeps(&self, doclet: &Doclet) -> bool {
        if doclet.kind == DocletKind::Package || doclet.ignore {
            return false;
        }
        match doclet.access {
            None => true,
            Some(AccessLevel::Private) => self.private || self.access == AccessLevel::Private,
            Some(level) => level >= self.access,
        }
    }
}
