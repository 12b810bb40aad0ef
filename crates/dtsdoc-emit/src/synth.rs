//! Declaration synthesizer.
//!
//! Walks the doclet tree in post-order and maps each node to a declaration
//! construct chosen by its kind and by the kind of its structural parent.

use dtsdoc_ast::{
    ClassMember, ClassMethod, ClassProperty, Constructor, DtsClass, DtsEnum, DtsFunction,
    DtsInterface, DtsItem, DtsModule, DtsNamespace, DtsTypeAlias, DtsVariable, EnumMember,
    InterfaceMember, Literal, MethodMember, PropertyMember, VarKind, Visibility,
};
use serde_json::Value;

use crate::comment::{description_comment, doc_comment};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::doclet::{Doclet, DocletKind};
use crate::error::EmitError;
use crate::options::AccessLevel;
use crate::props::PropTree;
use crate::resolve::{
    prop_node_type, resolve_heritage, resolve_params, resolve_return_type, resolve_type,
    resolve_type_params,
};
use crate::tree::{DocletTree, NodeId};

/// Name prefix jsdoc gives members of a default export.
const EXPORTS_PREFIX: &str = "exports.";

/// One synthesized construct, before it is placed in a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A declaration statement, valid at top level and in namespaces.
    Item(DtsItem),
    ClassMember(ClassMember),
    InterfaceMember(InterfaceMember),
}

impl Declaration {
    fn describe(&self) -> &'static str {
        match self {
            Declaration::Item(_) => "declaration",
            Declaration::ClassMember(_) => "class member",
            Declaration::InterfaceMember(_) => "interface member",
        }
    }

    fn name(&self) -> &str {
        match self {
            Declaration::Item(item) => item.name(),
            Declaration::ClassMember(ClassMember::Property(p)) => &p.name,
            Declaration::ClassMember(ClassMember::Method(m)) => &m.name,
            Declaration::ClassMember(ClassMember::Constructor(_)) => "constructor",
            Declaration::InterfaceMember(InterfaceMember::Property(p)) => &p.name,
            Declaration::InterfaceMember(InterfaceMember::Method(m)) => &m.name,
        }
    }
}

/// The body a parent declaration accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Class,
    Interface,
    Namespace,
}

impl Container {
    fn label(&self) -> &'static str {
        match self {
            Container::Class => "class",
            Container::Interface => "interface",
            Container::Namespace => "namespace",
        }
    }
}

/// The context a member or function is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Class,
    Interface,
    Namespace,
}

pub struct Synthesizer<'a> {
    tree: &'a DocletTree,
    diags: &'a mut Diagnostics,
}

impl<'a> Synthesizer<'a> {
    pub fn new(tree: &'a DocletTree, diags: &'a mut Diagnostics) -> Self {
        Self { tree, diags }
    }

    /// Synthesize every root of the tree into top-level declarations.
    pub fn synthesize(&mut self) -> Result<Vec<DtsItem>, EmitError> {
        let tree = self.tree;
        let mut items: Vec<DtsItem> = Vec::new();
        for &root in tree.roots() {
            if let Some(declaration) = self.node(root, None)? {
                let top: Vec<DtsItem> =
                    self.validate(Container::Namespace, "<top level>", vec![declaration]);
                items.extend(top);
            }
        }
        Ok(items)
    }

    /// Synthesize one node after all of its children.
    fn node(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
    ) -> Result<Option<Declaration>, EmitError> {
        let tree = self.tree;
        let node = tree.node(id);
        let mut children = Vec::with_capacity(node.children.len());
        for &child in &node.children {
            if let Some(declaration) = self.node(child, Some(id))? {
                children.push(declaration);
            }
        }

        let doclet = &node.doclet;
        let owner = match parent.map(|p| tree.node(p).doclet.kind) {
            Some(DocletKind::Class) => Owner::Class,
            Some(kind) if kind.is_interface_like() => Owner::Interface,
            _ => Owner::Namespace,
        };

        let declaration = match doclet.kind {
            DocletKind::Class => Some(Declaration::Item(self.class(doclet, children))),
            DocletKind::Interface | DocletKind::Mixin => {
                Some(Declaration::Item(self.interface(doclet, children)))
            }
            DocletKind::Module => Some(Declaration::Item(self.module(doclet, node.is_nested, children))),
            DocletKind::Namespace => {
                Some(Declaration::Item(self.namespace(doclet, node.is_nested, children)))
            }
            DocletKind::Typedef => Some(Declaration::Item(self.typedef(doclet))),
            DocletKind::Member | DocletKind::Constant if doclet.is_enum() => {
                Some(Declaration::Item(self.enumeration(doclet)))
            }
            DocletKind::Member | DocletKind::Constant => Some(self.member(doclet, owner)),
            DocletKind::Function | DocletKind::Callback => Some(self.function(doclet, owner)),
            DocletKind::File | DocletKind::Event => None,
            DocletKind::Package => {
                return Err(EmitError::UnsupportedKind {
                    kind: doclet.kind,
                    longname: doclet.longname.clone(),
                });
            }
        };
        Ok(declaration)
    }

    /// Keep the children valid in `container`, warning about the rest.
    fn validate<T>(&mut self, container: Container, owner: &str, children: Vec<Declaration>) -> Vec<T>
    where
        T: FromDeclaration,
    {
        let mut valid = Vec::with_capacity(children.len());
        for child in children {
            match T::from_declaration(child) {
                Ok(accepted) => valid.push(accepted),
                Err(rejected) => self.diags.warn(
                    WarningKind::InvalidChild,
                    format!(
                        "Dropping {} '{}': not valid in the body of {} '{owner}'.",
                        rejected.describe(),
                        rejected.name(),
                        container.label()
                    ),
                ),
            }
        }
        valid
    }

    fn class(&mut self, doclet: &Doclet, children: Vec<Declaration>) -> DtsItem {
        let name = declaration_name(doclet);
        let mut members: Vec<ClassMember> = self.validate(Container::Class, &name, children);

        if !doclet.params.is_empty() {
            let params = resolve_params(&doclet.params, self.diags);
            members.insert(0, ClassMember::Constructor(Constructor { params }));
        }

        for prop in &PropTree::new(&doclet.properties).roots {
            members.push(ClassMember::Property(ClassProperty {
                name: prop.name.clone(),
                ty: Some(prop_node_type(prop, self.diags)),
                optional: prop.optional(),
                readonly: false,
                is_static: false,
                visibility: None,
                comment: description_comment(prop.description()),
            }));
        }

        DtsItem::Class(DtsClass {
            name,
            type_params: resolve_type_params(doclet, self.diags),
            extends: resolve_heritage(&doclet.augments[..doclet.augments.len().min(1)], self.diags)
                .pop(),
            implements: Vec::new(),
            members,
            declare: doclet.memberof.is_none(),
            comment: doc_comment(doclet),
        })
    }

    fn interface(&mut self, doclet: &Doclet, children: Vec<Declaration>) -> DtsItem {
        let name = declaration_name(doclet);
        let members = self.validate(Container::Interface, &name, children);
        DtsItem::Interface(DtsInterface {
            name,
            type_params: resolve_type_params(doclet, self.diags),
            extends: resolve_heritage(&doclet.augments, self.diags),
            members,
            declare: doclet.memberof.is_none(),
            comment: doc_comment(doclet),
        })
    }

    fn module(&mut self, doclet: &Doclet, nested: bool, children: Vec<Declaration>) -> DtsItem {
        let name = declaration_name(doclet);
        let items = self.validate(Container::Namespace, &name, children);
        if nested {
            // String-named modules are only legal at top level.
            return DtsItem::Namespace(DtsNamespace {
                name: identifier_from(&name),
                items,
                nested,
                declare: false,
                comment: doc_comment(doclet),
            });
        }
        DtsItem::Module(DtsModule {
            name,
            items,
            declare: doclet.memberof.is_none(),
            comment: doc_comment(doclet),
        })
    }

    fn namespace(&mut self, doclet: &Doclet, nested: bool, children: Vec<Declaration>) -> DtsItem {
        let name = declaration_name(doclet);
        let items = self.validate(Container::Namespace, &name, children);
        DtsItem::Namespace(DtsNamespace {
            name,
            items,
            nested,
            declare: doclet.memberof.is_none(),
            comment: doc_comment(doclet),
        })
    }

    fn typedef(&mut self, doclet: &Doclet) -> DtsItem {
        DtsItem::TypeAlias(DtsTypeAlias {
            name: declaration_name(doclet),
            type_params: resolve_type_params(doclet, self.diags),
            ty: resolve_type(doclet, self.diags),
            declare: doclet.memberof.is_none(),
            comment: doc_comment(doclet),
        })
    }

    fn enumeration(&mut self, doclet: &Doclet) -> DtsItem {
        let members = doclet
            .properties
            .iter()
            .map(|prop| EnumMember {
                name: prop.name.clone(),
                value: prop.defaultvalue.as_ref().and_then(enum_value),
            })
            .collect();
        DtsItem::Enum(DtsEnum {
            name: declaration_name(doclet),
            members,
            is_const: doclet.kind == DocletKind::Constant,
            declare: doclet.memberof.is_none(),
            comment: doc_comment(doclet),
        })
    }

    fn member(&mut self, doclet: &Doclet, owner: Owner) -> Declaration {
        let (name, optional) = optional_name(doclet);
        let readonly = doclet.kind == DocletKind::Constant || doclet.readonly;
        match owner {
            Owner::Class => Declaration::ClassMember(ClassMember::Property(ClassProperty {
                name,
                ty: Some(resolve_type(doclet, self.diags)),
                optional,
                readonly,
                is_static: doclet.is_static(),
                visibility: visibility(doclet),
                comment: doc_comment(doclet),
            })),
            Owner::Interface => Declaration::InterfaceMember(InterfaceMember::Property(PropertyMember {
                name,
                ty: resolve_type(doclet, self.diags),
                optional,
                readonly,
                comment: doc_comment(doclet),
            })),
            Owner::Namespace => {
                let initializer = if readonly {
                    doclet.literal_value().and_then(literal)
                } else {
                    None
                };
                let ty = match initializer {
                    Some(_) => None,
                    None => Some(resolve_type(doclet, self.diags)),
                };
                Declaration::Item(DtsItem::Variable(DtsVariable {
                    name: declaration_name(doclet),
                    kind: if readonly { VarKind::Const } else { VarKind::Var },
                    ty,
                    initializer,
                    declare: doclet.memberof.is_none(),
                    comment: doc_comment(doclet),
                }))
            }
        }
    }

    fn function(&mut self, doclet: &Doclet, owner: Owner) -> Declaration {
        let (name, optional) = optional_name(doclet);
        let type_params = resolve_type_params(doclet, self.diags);
        let params = resolve_params(&doclet.params, self.diags);
        let return_type = Some(resolve_return_type(doclet, self.diags));
        match owner {
            Owner::Class => Declaration::ClassMember(ClassMember::Method(ClassMethod {
                name,
                type_params,
                params,
                return_type,
                optional,
                is_static: doclet.is_static(),
                visibility: visibility(doclet),
                comment: doc_comment(doclet),
            })),
            Owner::Interface => Declaration::InterfaceMember(InterfaceMember::Method(MethodMember {
                name,
                type_params,
                params,
                return_type,
                optional,
                comment: doc_comment(doclet),
            })),
            Owner::Namespace => Declaration::Item(DtsItem::Function(DtsFunction {
                name: declaration_name(doclet),
                type_params,
                params,
                return_type,
                declare: doclet.memberof.is_none(),
                comment: doc_comment(doclet),
            })),
        }
    }
}

/// Conversion of a synthesized construct into a container's body type.
trait FromDeclaration: Sized {
    fn from_declaration(declaration: Declaration) -> Result<Self, Declaration>;
}

impl FromDeclaration for ClassMember {
    fn from_declaration(declaration: Declaration) -> Result<Self, Declaration> {
        match declaration {
            Declaration::ClassMember(member) => Ok(member),
            other => Err(other),
        }
    }
}

impl FromDeclaration for InterfaceMember {
    fn from_declaration(declaration: Declaration) -> Result<Self, Declaration> {
        match declaration {
            Declaration::InterfaceMember(member) => Ok(member),
            other => Err(other),
        }
    }
}

impl FromDeclaration for DtsItem {
    fn from_declaration(declaration: Declaration) -> Result<Self, Declaration> {
        match declaration {
            Declaration::Item(item) => Ok(item),
            other => Err(other),
        }
    }
}

/// The identifier for a declaration, without the default-export prefix.
pub fn declaration_name(doclet: &Doclet) -> String {
    doclet
        .name
        .strip_prefix(EXPORTS_PREFIX)
        .unwrap_or(&doclet.name)
        .to_string()
}

/// Member name and optionality; `[name]` marks an optional member.
fn optional_name(doclet: &Doclet) -> (String, bool) {
    let name = declaration_name(doclet);
    match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
        Some(inner) => (inner.to_string(), true),
        None => (name, doclet.optional),
    }
}

fn visibility(doclet: &Doclet) -> Option<Visibility> {
    match doclet.access? {
        AccessLevel::Private => Some(Visibility::Private),
        AccessLevel::Protected => Some(Visibility::Protected),
        AccessLevel::Public => Some(Visibility::Public),
        AccessLevel::Package => None,
    }
}

/// `module:my-pkg/sub` names a namespace `my_pkg_sub`.
fn identifier_from(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if ident.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn literal(value: &Value) -> Option<Literal> {
    match value {
        Value::String(s) => Some(Literal::String(s.clone())),
        Value::Number(n) => Some(Literal::Number(n.to_string())),
        Value::Bool(b) => Some(Literal::Boolean(*b)),
        _ => None,
    }
}

/// Enum initializers may only be strings or numbers.
fn enum_value(value: &Value) -> Option<Literal> {
    literal(value).filter(|lit| !matches!(lit, Literal::Boolean(_)))
}
