//! Pretty-printer producing `.d.ts` source text from declaration items.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::ast::*;
use crate::config::PrintConfig;

/// Print a sequence of top-level items, each followed by a blank line.
pub fn print_items(items: &[DtsItem], config: &PrintConfig) -> String {
    let mut printer = Printer::new(config);
    for item in items {
        printer.item(item);
        printer.output.push('\n');
    }
    printer.output
}

/// Print a single item without the trailing blank line.
pub fn print_item(item: &DtsItem, config: &PrintConfig) -> String {
    let mut printer = Printer::new(config);
    printer.item(item);
    printer.output
}

struct Printer<'a> {
    config: &'a PrintConfig,
    indent: usize,
    output: String,
}

impl<'a> Printer<'a> {
    fn new(config: &'a PrintConfig) -> Self {
        Self {
            config,
            indent: 0,
            output: String::new(),
        }
    }

    fn write_indent(&mut self) {
        let unit = self.config.indent_str();
        for _ in 0..self.indent {
            self.output.push_str(&unit);
        }
    }

    fn line(&mut self, text: &str) {
        self.write_indent();
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn comment(&mut self, comment: Option<&DocComment>) {
        let Some(comment) = comment else {
            return;
        };
        if comment.is_empty() {
            return;
        }
        self.line("/**");
        for text in &comment.lines {
            if text.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {text}"));
            }
        }
        self.line(" */");
    }

    fn block<T>(&mut self, header: &str, entries: &[T], mut each: impl FnMut(&mut Self, &T)) {
        self.line(&format!("{header} {{"));
        self.indent += 1;
        for entry in entries {
            each(self, entry);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn item(&mut self, item: &DtsItem) {
        self.comment(item.comment());
        match item {
            DtsItem::Function(f) => {
                let text = format!(
                    "{}function {}{}{}{};",
                    declare(f.declare),
                    f.name,
                    TypeParams(&f.type_params),
                    Params(&f.params),
                    ReturnAnnotation(f.return_type.as_ref()),
                );
                self.line(&text);
            }
            DtsItem::Interface(i) => {
                let mut header = format!(
                    "{}interface {}{}",
                    declare(i.declare),
                    i.name,
                    TypeParams(&i.type_params)
                );
                if !i.extends.is_empty() {
                    let _ = write!(header, " extends {}", Joined(&i.extends, ", "));
                }
                self.block(&header, &i.members, |p, m| p.interface_member(m));
            }
            DtsItem::TypeAlias(t) => {
                let text = format!(
                    "{}type {}{} = {};",
                    declare(t.declare),
                    t.name,
                    TypeParams(&t.type_params),
                    t.ty
                );
                self.line(&text);
            }
            DtsItem::Class(c) => {
                let mut header = format!(
                    "{}class {}{}",
                    declare(c.declare),
                    c.name,
                    TypeParams(&c.type_params)
                );
                if let Some(base) = &c.extends {
                    let _ = write!(header, " extends {base}");
                }
                if !c.implements.is_empty() {
                    let _ = write!(header, " implements {}", Joined(&c.implements, ", "));
                }
                self.block(&header, &c.members, |p, m| p.class_member(m));
            }
            DtsItem::Enum(e) => {
                let header = format!(
                    "{}{}enum {}",
                    declare(e.declare),
                    if e.is_const { "const " } else { "" },
                    e.name
                );
                self.line(&format!("{header} {{"));
                self.indent += 1;
                for (idx, member) in e.members.iter().enumerate() {
                    let mut text = property_name(&member.name).into_owned();
                    if let Some(value) = &member.value {
                        let _ = write!(text, " = {value}");
                    }
                    if idx + 1 < e.members.len() {
                        text.push(',');
                    }
                    self.line(&text);
                }
                self.indent -= 1;
                self.line("}");
            }
            DtsItem::Variable(v) => {
                let mut text = format!("{}{} {}", declare(v.declare), v.kind, v.name);
                match (&v.initializer, &v.ty) {
                    (Some(init), _) if v.kind == VarKind::Const => {
                        let _ = write!(text, " = {init}");
                    }
                    (_, Some(ty)) => {
                        let _ = write!(text, ": {ty}");
                    }
                    _ => {}
                }
                text.push(';');
                self.line(&text);
            }
            DtsItem::Namespace(ns) => self.namespace(ns),
            DtsItem::Module(m) => {
                let header = format!("{}module {}", declare(m.declare), quote(&m.name));
                if m.items.is_empty() {
                    self.line(&format!("{header} {{ }}"));
                } else {
                    self.block(&header, &m.items, |p, item| p.item(item));
                }
            }
        }
    }

    fn namespace(&mut self, ns: &DtsNamespace) {
        let mut header = format!("{}namespace {}", declare(ns.declare), ns.name);
        let mut body = ns;
        // Collapse `namespace A { namespace B { .. } }` into `namespace A.B { .. }`.
        while let [DtsItem::Namespace(inner)] = body.items.as_slice() {
            if !inner.nested || inner.comment.is_some() {
                break;
            }
            header.push('.');
            header.push_str(&inner.name);
            body = inner;
        }
        if body.items.is_empty() {
            self.line(&format!("{header} {{ }}"));
        } else {
            self.block(&header, &body.items, |p, item| p.item(item));
        }
    }

    fn class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Constructor(ctor) => {
                self.line(&format!("constructor{};", Params(&ctor.params)));
            }
            ClassMember::Property(prop) => {
                self.comment(prop.comment.as_ref());
                let mut text = String::new();
                modifiers(&mut text, prop.visibility, prop.is_static, prop.readonly);
                text.push_str(&property_name(&prop.name));
                if prop.optional {
                    text.push('?');
                }
                if let Some(ty) = &prop.ty {
                    let _ = write!(text, ": {ty}");
                }
                text.push(';');
                self.line(&text);
            }
            ClassMember::Method(method) => {
                self.comment(method.comment.as_ref());
                let mut text = String::new();
                modifiers(&mut text, method.visibility, method.is_static, false);
                text.push_str(&property_name(&method.name));
                if method.optional {
                    text.push('?');
                }
                let _ = write!(
                    text,
                    "{}{}{};",
                    TypeParams(&method.type_params),
                    Params(&method.params),
                    ReturnAnnotation(method.return_type.as_ref())
                );
                self.line(&text);
            }
        }
    }

    fn interface_member(&mut self, member: &InterfaceMember) {
        match member {
            InterfaceMember::Property(prop) => {
                self.comment(prop.comment.as_ref());
                let text = format!(
                    "{}{}{}: {};",
                    if prop.readonly { "readonly " } else { "" },
                    property_name(&prop.name),
                    if prop.optional { "?" } else { "" },
                    prop.ty
                );
                self.line(&text);
            }
            InterfaceMember::Method(method) => {
                self.comment(method.comment.as_ref());
                let text = format!(
                    "{}{}{}{}{};",
                    property_name(&method.name),
                    if method.optional { "?" } else { "" },
                    TypeParams(&method.type_params),
                    Params(&method.params),
                    ReturnAnnotation(method.return_type.as_ref())
                );
                self.line(&text);
            }
        }
    }
}

fn declare(flag: bool) -> &'static str {
    if flag { "declare " } else { "" }
}

fn modifiers(out: &mut String, visibility: Option<Visibility>, is_static: bool, readonly: bool) {
    if let Some(vis) = visibility {
        let _ = write!(out, "{vis} ");
    }
    if is_static {
        out.push_str("static ");
    }
    if readonly {
        out.push_str("readonly ");
    }
}

/// Whether `name` can be written as a bare identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn property_name(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(quote(name))
    }
}

/// Render a double-quoted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

struct Joined<'a, T>(&'a [T], &'static str);

impl<T: fmt::Display> fmt::Display for Joined<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

struct TypeParams<'a>(&'a [TypeParam]);

impl fmt::Display for TypeParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (i, tp) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&tp.name)?;
            if let Some(constraint) = &tp.constraint {
                write!(f, " extends {constraint}")?;
            }
            if let Some(default) = &tp.default {
                write!(f, " = {default}")?;
            }
        }
        f.write_str(">")
    }
}

struct Params<'a>(&'a [Param]);

impl fmt::Display for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_params(f, None, self.0)?;
        f.write_str(")")
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, this: Option<&DtsType>, params: &[Param]) -> fmt::Result {
    let mut first = true;
    if let Some(this) = this {
        write!(f, "this: {this}")?;
        first = false;
    }
    for param in params {
        if !first {
            f.write_str(", ")?;
        }
        first = false;
        if param.rest {
            f.write_str("...")?;
        }
        f.write_str(&param.name)?;
        if param.optional && !param.rest {
            f.write_str("?")?;
        }
        write!(f, ": {}", param.ty)?;
    }
    Ok(())
}

struct ReturnAnnotation<'a>(Option<&'a DtsType>);

impl fmt::Display for ReturnAnnotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ty) => write!(f, ": {ty}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => f.write_str(&quote(s)),
            Literal::Number(n) => f.write_str(n),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Types that need parentheses when used as an array element or union member.
fn needs_parens(ty: &DtsType, in_union: bool) -> bool {
    match ty {
        DtsType::Function(_) => true,
        DtsType::Union(_) => !in_union,
        _ => false,
    }
}

fn write_wrapped(f: &mut fmt::Formatter<'_>, ty: &DtsType, in_union: bool) -> fmt::Result {
    if needs_parens(ty, in_union) {
        write!(f, "({ty})")
    } else {
        write!(f, "{ty}")
    }
}

impl fmt::Display for DtsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DtsType::Named { name, type_args } => {
                f.write_str(name)?;
                if !type_args.is_empty() {
                    write!(f, "<{}>", Joined(type_args, ", "))?;
                }
                Ok(())
            }
            DtsType::Primitive(p) => write!(f, "{p}"),
            DtsType::StringLiteral(s) => f.write_str(&quote(s)),
            DtsType::NumberLiteral(n) => f.write_str(n),
            DtsType::BooleanLiteral(b) => write!(f, "{b}"),
            DtsType::Union(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write_wrapped(f, ty, true)?;
                }
                Ok(())
            }
            DtsType::Function(func) => {
                f.write_str("(")?;
                write_params(f, func.this_param.as_deref(), &func.params)?;
                write!(f, ") => {}", func.return_type)
            }
            DtsType::Object(members) => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for member in members {
                    match member {
                        ObjectMember::Property { name, ty, optional } => {
                            write!(
                                f,
                                "{}{}: {}; ",
                                property_name(name),
                                if *optional { "?" } else { "" },
                                ty
                            )?;
                        }
                        ObjectMember::IndexSignature(sig) => {
                            write!(
                                f,
                                "[{}: {}]: {}; ",
                                sig.key_name, sig.key_type, sig.value_type
                            )?;
                        }
                    }
                }
                f.write_str("}")
            }
            DtsType::Array(inner) => {
                write_wrapped(f, inner, false)?;
                f.write_str("[]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> DtsType {
        DtsType::Primitive(Primitive::String)
    }

    fn number() -> DtsType {
        DtsType::Primitive(Primitive::Number)
    }

    #[test]
    fn test_print_declared_class_with_method() {
        let class = DtsItem::Class(DtsClass {
            name: "Foo".to_string(),
            type_params: vec![],
            extends: None,
            implements: vec![],
            members: vec![ClassMember::Method(ClassMethod {
                name: "bar".to_string(),
                type_params: vec![],
                params: vec![Param {
                    name: "x".to_string(),
                    ty: number(),
                    optional: true,
                    rest: false,
                }],
                return_type: Some(DtsType::Primitive(Primitive::Void)),
                optional: false,
                is_static: true,
                visibility: Some(Visibility::Protected),
                comment: None,
            })],
            declare: true,
            comment: None,
        });

        let out = print_item(&class, &PrintConfig::default());
        assert_eq!(
            out,
            "declare class Foo {\n    protected static bar(x?: number): void;\n}\n"
        );
    }

    #[test]
    fn test_print_const_enum() {
        let item = DtsItem::Enum(DtsEnum {
            name: "Color".to_string(),
            members: vec![
                EnumMember {
                    name: "RED".to_string(),
                    value: Some(Literal::String("red".to_string())),
                },
                EnumMember {
                    name: "BLUE".to_string(),
                    value: Some(Literal::String("blue".to_string())),
                },
            ],
            is_const: true,
            declare: true,
            comment: None,
        });

        let out = print_item(&item, &PrintConfig::default());
        assert_eq!(
            out,
            "declare const enum Color {\n    RED = \"red\",\n    BLUE = \"blue\"\n}\n"
        );
    }

    #[test]
    fn test_print_comment_indented_inside_namespace() {
        let item = DtsItem::Namespace(DtsNamespace {
            name: "ns".to_string(),
            items: vec![DtsItem::Variable(DtsVariable {
                name: "x".to_string(),
                kind: VarKind::Var,
                ty: Some(string()),
                initializer: None,
                declare: false,
                comment: Some(DocComment::new(vec!["The x.".to_string()])),
            })],
            nested: false,
            declare: true,
            comment: None,
        });

        let out = print_item(&item, &PrintConfig::default());
        assert_eq!(
            out,
            "declare namespace ns {\n    /**\n     * The x.\n     */\n    var x: string;\n}\n"
        );
    }

    #[test]
    fn test_nested_namespace_uses_dotted_name() {
        let inner = DtsNamespace {
            name: "b".to_string(),
            items: vec![DtsItem::Function(DtsFunction {
                name: "f".to_string(),
                type_params: vec![],
                params: vec![],
                return_type: Some(DtsType::Primitive(Primitive::Void)),
                declare: false,
                comment: None,
            })],
            nested: true,
            declare: false,
            comment: None,
        };
        let outer = DtsItem::Namespace(DtsNamespace {
            name: "a".to_string(),
            items: vec![DtsItem::Namespace(inner.clone())],
            nested: false,
            declare: true,
            comment: None,
        });

        let out = print_item(&outer, &PrintConfig::default());
        assert_eq!(out, "declare namespace a.b {\n    function f(): void;\n}\n");

        let not_nested = DtsItem::Namespace(DtsNamespace {
            name: "a".to_string(),
            items: vec![DtsItem::Namespace(DtsNamespace {
                nested: false,
                ..inner
            })],
            nested: false,
            declare: true,
            comment: None,
        });
        let out = print_item(&not_nested, &PrintConfig::default());
        assert!(out.contains("namespace b {"), "unexpected output:\n{out}");
    }

    #[test]
    fn test_type_display_parenthesizes() {
        let func = DtsType::Function(Box::new(FunctionType {
            params: vec![Param {
                name: "arg0".to_string(),
                ty: string(),
                optional: false,
                rest: false,
            }],
            return_type: Box::new(DtsType::Primitive(Primitive::Boolean)),
            this_param: None,
        }));
        let ty = DtsType::Array(Box::new(DtsType::union(vec![string(), func])));
        assert_eq!(ty.to_string(), "(string | ((arg0: string) => boolean))[]");
    }

    #[test]
    fn test_object_type_quotes_invalid_names() {
        let ty = DtsType::Object(vec![
            ObjectMember::Property {
                name: "content-type".to_string(),
                ty: string(),
                optional: true,
            },
            ObjectMember::IndexSignature(IndexSignature {
                key_name: "key".to_string(),
                key_type: string(),
                value_type: number(),
            }),
        ]);
        assert_eq!(
            ty.to_string(),
            "{ \"content-type\"?: string; [key: string]: number; }"
        );
    }

    #[test]
    fn test_print_items_separates_with_blank_line() {
        let alias = |name: &str| {
            DtsItem::TypeAlias(DtsTypeAlias {
                name: name.to_string(),
                type_params: vec![TypeParam::named("T")],
                ty: DtsType::named("T"),
                declare: true,
                comment: None,
            })
        };
        let out = print_items(&[alias("A"), alias("B")], &PrintConfig::default());
        assert_eq!(out, "declare type A<T> = T;\n\ndeclare type B<T> = T;\n\n");
    }

    #[test]
    fn test_union_flattens_and_dedups() {
        let ty = DtsType::union(vec![
            string(),
            DtsType::union(vec![number(), string()]),
        ]);
        assert_eq!(ty, DtsType::Union(vec![string(), number()]));
        assert_eq!(DtsType::union(vec![string()]), string());
    }
}
