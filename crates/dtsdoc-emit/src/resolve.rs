//! Doclet-level type resolution.
//!
//! Wraps the expression parser from `dtsdoc-types` with the doclet fields
//! that affect a type: `nullable`, `variable`, object `properties` and
//! function `params`/`returns`. Unparsable expressions become `any` and
//! record a [`WarningKind::TypeSyntax`] warning.

use dtsdoc_ast::{DtsType, FunctionType, ObjectMember, Param, Primitive, TypeParam};
use dtsdoc_types::{TypeExpr, parse_type, parse_type_expr, parse_type_params};

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::doclet::{DocParam, DocType, Doclet};
use crate::props::{PropNode, PropTree};

fn resolve_exprs(names: &[String], diags: &mut Diagnostics) -> TypeExpr {
    let mut types = Vec::with_capacity(names.len());
    let mut optional = false;
    let mut variadic = false;
    for name in names {
        let expr = resolve_expr(name, diags);
        optional |= expr.optional;
        variadic |= expr.variadic;
        types.push(expr.ty);
    }
    let ty = if types.is_empty() {
        DtsType::any()
    } else {
        DtsType::union(types)
    };
    TypeExpr {
        ty,
        optional,
        variadic,
    }
}

fn resolve_expr(src: &str, diags: &mut Diagnostics) -> TypeExpr {
    parse_type_expr(src).unwrap_or_else(|err| {
        diags.warn(
            WarningKind::TypeSyntax,
            format!("Unable to resolve type '{src}' ({err}), using 'any'."),
        );
        TypeExpr {
            ty: DtsType::any(),
            optional: false,
            variadic: false,
        }
    })
}

fn doc_type(ty: Option<&DocType>, diags: &mut Diagnostics) -> TypeExpr {
    match ty {
        Some(ty) => resolve_exprs(&ty.names, diags),
        None => TypeExpr {
            ty: DtsType::any(),
            optional: false,
            variadic: false,
        },
    }
}

fn with_nullable(ty: DtsType, nullable: Option<bool>) -> DtsType {
    if nullable == Some(true) && ty != DtsType::any() {
        DtsType::union(vec![ty, DtsType::Primitive(Primitive::Null)])
    } else {
        ty
    }
}

fn names_are(ty: Option<&DocType>, candidates: &[&str]) -> bool {
    ty.is_some_and(|ty| {
        !ty.names.is_empty() && ty.names.iter().all(|name| candidates.contains(&name.as_str()))
    })
}

/// The type of a member, constant or typedef doclet.
///
/// Object-typed doclets with `@property` entries become object literals and
/// function-typed doclets with `@param`/`@returns` become function types.
pub fn resolve_type(doclet: &Doclet, diags: &mut Diagnostics) -> DtsType {
    let ty = doclet.ty.as_ref();
    let resolved = if !doclet.properties.is_empty()
        && (ty.is_none() || names_are(ty, &["Object", "object"]))
    {
        object_literal(&PropTree::new(&doclet.properties).roots, diags)
    } else if names_are(ty, &["function", "Function"])
        && (!doclet.params.is_empty() || !doclet.returns.is_empty())
    {
        function_type(doclet, diags)
    } else {
        doc_type(ty, diags).ty
    };
    with_nullable(resolved, doclet.nullable)
}

/// A function type built from a doclet's `params` and `returns`.
pub fn function_type(doclet: &Doclet, diags: &mut Diagnostics) -> DtsType {
    DtsType::Function(Box::new(FunctionType {
        params: resolve_params(&doclet.params, diags),
        return_type: Box::new(resolve_return_type(doclet, diags)),
        this_param: None,
    }))
}

/// The type of one property-tree node.
pub fn prop_node_type(node: &PropNode<'_>, diags: &mut Diagnostics) -> DtsType {
    if !node.children.is_empty() {
        let object = object_literal(&node.children, diags);
        return if node.is_array {
            DtsType::Array(Box::new(object))
        } else {
            object
        };
    }
    match node.prop {
        Some(prop) => param_type(prop, diags).ty,
        None => DtsType::any(),
    }
}

fn param_type(prop: &DocParam, diags: &mut Diagnostics) -> TypeExpr {
    let mut expr = doc_type(prop.ty.as_ref(), diags);
    expr.ty = with_nullable(expr.ty, prop.nullable);
    expr.optional |= prop.optional;
    expr.variadic |= prop.variable;
    expr
}

fn object_literal(nodes: &[PropNode<'_>], diags: &mut Diagnostics) -> DtsType {
    let members = nodes
        .iter()
        .map(|node| ObjectMember::Property {
            name: node.name.clone(),
            ty: prop_node_type(node, diags),
            optional: node.optional(),
        })
        .collect();
    DtsType::Object(members)
}

/// Function parameters from `@param` entries, dotted names grouped.
///
/// An optional parameter followed by a required one stays required and
/// admits `undefined` instead, since only trailing parameters may be
/// optional.
pub fn resolve_params(params: &[DocParam], diags: &mut Diagnostics) -> Vec<Param> {
    let tree = PropTree::new(params);
    let mut resolved: Vec<Param> = tree
        .roots
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let expr = match node.prop {
                Some(prop) if node.children.is_empty() => param_type(prop, diags),
                _ => TypeExpr {
                    ty: prop_node_type(node, diags),
                    optional: node.optional(),
                    variadic: node.prop.is_some_and(|prop| prop.variable),
                },
            };
            let name = if dtsdoc_ast::is_identifier(&node.name) {
                node.name.clone()
            } else {
                format!("arg{idx}")
            };
            Param {
                name,
                ty: if expr.variadic {
                    DtsType::Array(Box::new(expr.ty))
                } else {
                    expr.ty
                },
                optional: expr.optional && !expr.variadic,
                rest: expr.variadic,
            }
        })
        .collect();

    // Rest parameters must come last.
    if let Some(pos) = resolved.iter().position(|p| p.rest) {
        if pos + 1 != resolved.len() {
            let rest = &mut resolved[pos];
            rest.rest = false;
        }
    }

    let mut required_seen = false;
    for param in resolved.iter_mut().rev() {
        if param.rest {
            continue;
        }
        if !param.optional {
            required_seen = true;
        } else if required_seen {
            param.optional = false;
            param.ty = DtsType::union(vec![
                param.ty.clone(),
                DtsType::Primitive(Primitive::Undefined),
            ]);
        }
    }
    resolved
}

/// Union of every `@returns` type; `void` when nothing is returned.
pub fn resolve_return_type(doclet: &Doclet, diags: &mut Diagnostics) -> DtsType {
    if doclet.returns.is_empty() {
        return DtsType::Primitive(Primitive::Void);
    }
    let types = doclet
        .returns
        .iter()
        .map(|ret| doc_type(ret.ty.as_ref(), diags).ty)
        .collect();
    DtsType::union(types)
}

/// Type parameters from `@template` tags.
pub fn resolve_type_params(doclet: &Doclet, diags: &mut Diagnostics) -> Vec<TypeParam> {
    let mut params = Vec::new();
    for text in doclet.template_tags() {
        match parse_type_params(text) {
            Ok(parsed) => params.extend(parsed),
            Err(err) => diags.warn(
                WarningKind::TypeSyntax,
                format!(
                    "Unable to read @template '{text}' on '{}' ({err}).",
                    doclet.longname
                ),
            ),
        }
    }
    params
}

/// Heritage clause entries from longnames such as `module:base~Widget`.
pub fn resolve_heritage(names: &[String], diags: &mut Diagnostics) -> Vec<DtsType> {
    names
        .iter()
        .map(|name| {
            parse_type(name).unwrap_or_else(|err| {
                diags.warn(
                    WarningKind::TypeSyntax,
                    format!("Unable to resolve base type '{name}' ({err}), using its raw name."),
                );
                DtsType::named(dtsdoc_types::normalize_namepath(name))
            })
        })
        .collect()
}
