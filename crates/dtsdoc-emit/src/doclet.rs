//! Doclet records as produced by `jsdoc -X`.
//!
//! Only the fields the emitter reads are modelled; everything else in the
//! JSON dump is ignored by serde.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::EmitError;
use crate::options::AccessLevel;

/// The closed set of doclet kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum DocletKind {
    Package,
    Class,
    Interface,
    Mixin,
    Module,
    Namespace,
    Typedef,
    Function,
    Callback,
    Member,
    Constant,
    Event,
    File,
}

impl DocletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocletKind::Package => "package",
            DocletKind::Class => "class",
            DocletKind::Interface => "interface",
            DocletKind::Mixin => "mixin",
            DocletKind::Module => "module",
            DocletKind::Namespace => "namespace",
            DocletKind::Typedef => "typedef",
            DocletKind::Function => "function",
            DocletKind::Callback => "callback",
            DocletKind::Member => "member",
            DocletKind::Constant => "constant",
            DocletKind::Event => "event",
            DocletKind::File => "file",
        }
    }

    /// Class, interface or mixin.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            DocletKind::Class | DocletKind::Interface | DocletKind::Mixin
        )
    }

    /// Module or namespace.
    pub fn is_module_like(&self) -> bool {
        matches!(self, DocletKind::Module | DocletKind::Namespace)
    }

    /// Interface or mixin; both synthesize to an interface declaration.
    pub fn is_interface_like(&self) -> bool {
        matches!(self, DocletKind::Interface | DocletKind::Mixin)
    }
}

impl fmt::Display for DocletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a `kind` string outside [`DocletKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown doclet kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl TryFrom<String> for DocletKind {
    type Error = UnknownKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let kind = match value.as_str() {
            "package" => DocletKind::Package,
            "class" => DocletKind::Class,
            "interface" => DocletKind::Interface,
            "mixin" => DocletKind::Mixin,
            "module" => DocletKind::Module,
            "namespace" => DocletKind::Namespace,
            "typedef" => DocletKind::Typedef,
            "function" => DocletKind::Function,
            "callback" => DocletKind::Callback,
            "member" => DocletKind::Member,
            "constant" => DocletKind::Constant,
            "event" => DocletKind::Event,
            "file" => DocletKind::File,
            _ => return Err(UnknownKind(value)),
        };
        Ok(kind)
    }
}

/// Doclet scope relative to its `memberof` parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Static,
    Instance,
    Inner,
    Global,
}

/// A documented type: `{ "names": ["string", "Array.<number>"] }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocType {
    #[serde(default)]
    pub names: Vec<String>,
}

impl DocType {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// One `@param` or `@property` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<DocType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub variable: bool,
    #[serde(default)]
    pub defaultvalue: Option<Value>,
}

impl DocParam {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One `@returns` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocReturn {
    #[serde(rename = "type", default)]
    pub ty: Option<DocType>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A raw tag kept by jsdoc, e.g. `@template`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocTag {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocMeta {
    #[serde(default)]
    pub code: Option<DocCode>,
}

/// Source snippet information; `kind` is the AST node type (`Literal`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocCode {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

/// One documented program element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doclet {
    pub kind: DocletKind,
    #[serde(default)]
    pub name: String,
    pub longname: String,
    #[serde(default)]
    pub memberof: Option<String>,
    #[serde(default)]
    pub scope: Option<Scope>,
    #[serde(default)]
    pub access: Option<AccessLevel>,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub undocumented: bool,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub variable: bool,
    #[serde(default)]
    pub augments: Vec<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub mixes: Vec<String>,
    #[serde(rename = "type", default)]
    pub ty: Option<DocType>,
    #[serde(default)]
    pub properties: Vec<DocParam>,
    #[serde(default)]
    pub params: Vec<DocParam>,
    #[serde(default)]
    pub returns: Vec<DocReturn>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub classdesc: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub defaultvalue: Option<Value>,
    #[serde(default)]
    pub meta: Option<DocMeta>,
    #[serde(default)]
    pub tags: Vec<DocTag>,
}

impl Doclet {
    /// A bare doclet with every optional field empty.
    pub fn new(kind: DocletKind, name: impl Into<String>, longname: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            longname: longname.into(),
            memberof: None,
            scope: None,
            access: None,
            ignore: false,
            undocumented: false,
            is_enum: false,
            readonly: false,
            optional: false,
            nullable: None,
            variable: false,
            augments: Vec::new(),
            implements: Vec::new(),
            mixes: Vec::new(),
            ty: None,
            properties: Vec::new(),
            params: Vec::new(),
            returns: Vec::new(),
            description: None,
            classdesc: None,
            comment: String::new(),
            examples: Vec::new(),
            defaultvalue: None,
            meta: None,
            tags: Vec::new(),
        }
    }

    /// Parse the JSON array written by `jsdoc -X`.
    pub fn parse_list(json: &str) -> Result<Vec<Doclet>, EmitError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_static(&self) -> bool {
        self.scope == Some(Scope::Static)
    }

    /// An enum-tagged member or constant.
    pub fn is_enum(&self) -> bool {
        self.is_enum && matches!(self.kind, DocletKind::Member | DocletKind::Constant)
    }

    /// Whether a doclet under a class-like parent belongs in the parent's
    /// companion namespace instead of the class body.
    pub fn moves_out_of_class(&self) -> bool {
        self.kind.is_class_like()
            || self.kind.is_module_like()
            || self.kind == DocletKind::Typedef
            || self.is_enum()
    }

    /// The literal value of a constant, from `defaultvalue` or a literal
    /// initializer recorded in `meta.code`.
    pub fn literal_value(&self) -> Option<&Value> {
        self.defaultvalue.as_ref().or_else(|| {
            self.meta
                .as_ref()
                .and_then(|meta| meta.code.as_ref())
                .filter(|code| code.kind.as_deref() == Some("Literal"))
                .and_then(|code| code.value.as_ref())
        })
    }

    /// Text of every `@template` tag.
    pub fn template_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter(|tag| tag.title == "template")
            .filter_map(|tag| tag.value.as_deref().or(tag.text.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jsdoc_dump() {
        let json = r#"[
            {"kind": "class", "name": "Foo", "longname": "Foo", "scope": "global",
             "comment": "/** A foo. */", "description": "A foo.", "meta": {"lineno": 3}},
            {"kind": "function", "name": "bar", "longname": "Foo#bar", "memberof": "Foo",
             "scope": "instance", "access": "protected",
             "params": [{"name": "x", "type": {"names": ["number"]}, "optional": true}]},
            {"kind": "member", "name": "Color", "longname": "Color", "isEnum": true,
             "properties": [{"name": "RED", "defaultvalue": "red"}]}
        ]"#;
        let docs = Doclet::parse_list(json).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].kind, DocletKind::Class);
        assert_eq!(docs[0].description.as_deref(), Some("A foo."));
        assert_eq!(docs[1].memberof.as_deref(), Some("Foo"));
        assert_eq!(docs[1].scope, Some(Scope::Instance));
        assert_eq!(docs[1].access, Some(AccessLevel::Protected));
        assert!(docs[1].params[0].optional);
        assert!(docs[2].is_enum());
        assert_eq!(docs[2].properties[0].defaultvalue, Some(Value::from("red")));
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let json = r#"[{"kind": "widget", "name": "w", "longname": "w"}]"#;
        let err = Doclet::parse_list(json).unwrap_err();
        assert!(
            err.to_string().contains("unknown doclet kind `widget`"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_move_out_eligibility() {
        assert!(Doclet::new(DocletKind::Class, "A", "A").moves_out_of_class());
        assert!(Doclet::new(DocletKind::Typedef, "T", "T").moves_out_of_class());
        assert!(!Doclet::new(DocletKind::Function, "f", "f").moves_out_of_class());

        let mut member = Doclet::new(DocletKind::Member, "E", "E");
        assert!(!member.moves_out_of_class());
        member.is_enum = true;
        assert!(member.moves_out_of_class());
    }

    #[test]
    fn test_literal_value_falls_back_to_meta() {
        let mut doclet = Doclet::new(DocletKind::Constant, "MAX", "MAX");
        doclet.meta = Some(DocMeta {
            code: Some(DocCode {
                kind: Some("Literal".to_string()),
                value: Some(Value::from(10)),
            }),
        });
        assert_eq!(doclet.literal_value(), Some(&Value::from(10)));

        doclet.meta = Some(DocMeta {
            code: Some(DocCode {
                kind: Some("CallExpression".to_string()),
                value: None,
            }),
        });
        assert_eq!(doclet.literal_value(), None);
    }
}
